use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use diesel::Connection;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::ledger::{
    assignment::{self, UnassignOutcome},
    finance, registry,
};
use crate::models::{Assignment, Bed, Resident};
use crate::state::AppState;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct ListResidentsQuery {
    pub status: Option<String>,
}

pub async fn list_residents(
    State(state): State<AppState>,
    Query(query): Query<ListResidentsQuery>,
) -> AppResult<Json<Vec<Resident>>> {
    let mut conn = state.db()?;
    let rows = registry::list_residents(&mut conn, query.status.as_deref())?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct CreateResidentRequest {
    pub name: String,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub guardian_phone: Option<String>,
    pub university: Option<String>,
    pub category: Option<String>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub rent_amount: Option<f64>,
    pub security_deposit: Option<f64>,
    pub notes: Option<String>,
}

pub async fn create_resident(
    State(state): State<AppState>,
    Json(payload): Json<CreateResidentRequest>,
) -> AppResult<Json<ApiResponse<Resident>>> {
    let mut conn = state.db()?;
    let fields = registry::ResidentFields {
        name: payload.name,
        phone: payload.phone,
        national_id: payload.national_id,
        guardian_phone: payload.guardian_phone,
        university: payload.university,
        category: payload.category,
        contract_start: payload.contract_start,
        contract_end: payload.contract_end,
        rent_amount: payload.rent_amount,
        security_deposit: payload.security_deposit,
        notes: payload.notes,
    };
    let resident = conn
        .transaction(|conn| {
            registry::create_resident(
                conn,
                fields,
                state.config.standard_bed_price,
                state.config.standard_deposit,
            )
        })
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok(
        format!("resident {} created", resident.name),
        resident,
    )))
}

#[derive(Serialize)]
pub struct ResidentFinancials {
    pub total_paid: f64,
    pub rent_paid: f64,
    pub deposit_paid: f64,
}

#[derive(Serialize)]
pub struct ResidentDetail {
    pub resident: Resident,
    pub current_bed: Option<Bed>,
    pub financials: ResidentFinancials,
}

pub async fn get_resident(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ResidentDetail>> {
    let mut conn = state.db()?;
    let resident = registry::get_resident(&mut conn, id)?;
    let current_bed = assignment::current_bed(&mut conn, id)?;
    let financials = ResidentFinancials {
        total_paid: finance::total_confirmed_payments(&mut conn, id, None)?,
        rent_paid: finance::total_confirmed_payments(&mut conn, id, Some("rent"))?,
        deposit_paid: finance::total_confirmed_payments(&mut conn, id, Some("deposit"))?,
    };
    Ok(Json(ResidentDetail {
        resident,
        current_bed,
        financials,
    }))
}

#[derive(Deserialize)]
pub struct UpdateResidentRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub guardian_phone: Option<String>,
    pub university: Option<String>,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub rent_amount: Option<f64>,
    pub security_deposit: Option<f64>,
    pub notes: Option<String>,
}

pub async fn update_resident(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateResidentRequest>,
) -> AppResult<Json<ApiResponse<Resident>>> {
    let mut conn = state.db()?;
    let update = registry::ResidentUpdate {
        name: payload.name,
        phone: payload.phone,
        national_id: payload.national_id,
        guardian_phone: payload.guardian_phone,
        university: payload.university,
        contract_start: payload.contract_start,
        contract_end: payload.contract_end,
        rent_amount: payload.rent_amount,
        security_deposit: payload.security_deposit,
        notes: payload.notes,
    };
    let resident = conn
        .transaction(|conn| registry::update_resident(conn, id, update))
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok("resident updated", resident)))
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SetStatusRequest>,
) -> AppResult<Json<ApiResponse<Resident>>> {
    let mut conn = state.db()?;
    let resident = conn
        .transaction(|conn| registry::set_status(conn, id, &payload.status))
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok(
        format!("resident is now {}", resident.status),
        resident,
    )))
}

#[derive(Deserialize)]
pub struct AssignBedRequest {
    pub resident_id: i32,
    pub bed_id: i32,
    pub start_date: Option<NaiveDate>,
}

pub async fn assign_bed(
    State(state): State<AppState>,
    Json(payload): Json<AssignBedRequest>,
) -> AppResult<Json<ApiResponse<Assignment>>> {
    let mut conn = state.db()?;
    let start_date = payload.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let created = assignment::assign(&mut conn, payload.resident_id, payload.bed_id, start_date)
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok("bed assigned", created)))
}

#[derive(Deserialize)]
pub struct EndAssignmentRequest {
    pub end_date: Option<NaiveDate>,
}

pub async fn end_assignment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<EndAssignmentRequest>,
) -> AppResult<Json<ApiResponse<Assignment>>> {
    let mut conn = state.db()?;
    let end_date = payload.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let outcome = assignment::unassign(&mut conn, id, end_date).map_err(AppError::from)?;
    let response = match outcome {
        UnassignOutcome::Ended(ended) => ApiResponse::ok("assignment ended", ended),
        UnassignOutcome::AlreadyEnded(existing) => {
            ApiResponse::ok("assignment already ended", existing)
        }
    };
    Ok(Json(response))
}
