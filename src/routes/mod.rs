use axum::http::HeaderValue;
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{auth::AuthenticatedAdmin, state::AppState};

pub mod archive;
pub mod auth;
pub mod finance;
pub mod health;
pub mod inventory;
pub mod reports;
pub mod residents;

/// Reply envelope for mutating endpoints, so callers can render either a JSON
/// API response or a formatted text reply from the same shape.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

pub fn create_router(state: AppState) -> Router<()> {
    let cors = if let Some(origins) = state.config.cors_allowed_origin.as_ref() {
        let headers: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|value| {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| {
                    trimmed
                        .parse::<HeaderValue>()
                        .expect("invalid CORS allowed origin")
                })
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(headers))
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/me", get(auth::me));

    let inventory_routes = Router::new()
        .route("/buildings", get(inventory::list_buildings))
        .route("/rooms", get(inventory::list_rooms))
        .route("/rooms/:id/beds", post(inventory::add_bed))
        .route("/beds/available", get(inventory::available_beds))
        .route(
            "/beds/:id",
            patch(inventory::update_bed).delete(inventory::remove_bed),
        );

    let residents_routes = Router::new()
        .route(
            "/",
            get(residents::list_residents).post(residents::create_resident),
        )
        .route(
            "/:id",
            get(residents::get_resident).patch(residents::update_resident),
        )
        .route("/:id/status", post(residents::set_status))
        .route("/:id/payments", get(finance::resident_payments));

    let assignments_routes = Router::new()
        .route("/", post(residents::assign_bed))
        .route("/:id/end", post(residents::end_assignment));

    let finance_routes = Router::new()
        .route(
            "/payments",
            get(finance::list_payments).post(finance::record_payment),
        )
        .route(
            "/expenses",
            get(finance::list_expenses).post(finance::record_expense),
        );

    let reports_routes = Router::new()
        .route("/statistics", get(reports::statistics))
        .route("/financial-summary", get(reports::financial_summary))
        .route("/occupancy-history", get(reports::occupancy_history))
        .route("/overdue", get(reports::overdue));

    let archive_routes = Router::new()
        .route("/", get(archive::list_archive))
        .route("/preview/:resident_id", get(archive::preview))
        .route("/resident", post(archive::archive_resident))
        .route("/restore/:archive_id", post(archive::restore_resident));

    let protected_state = state.clone();
    let protected_routes = Router::new()
        .nest("/api", inventory_routes.merge(finance_routes))
        .nest("/api/residents", residents_routes)
        .nest("/api/assignments", assignments_routes)
        .nest("/api/reports", reports_routes)
        .nest("/api/archive", archive_routes)
        .layer(middleware::from_extractor_with_state::<AuthenticatedAdmin, _>(protected_state));

    Router::new()
        .merge(protected_routes)
        .nest("/api/auth", auth_routes)
        .route("/api/health", get(health::health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
