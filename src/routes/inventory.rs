use axum::{
    extract::{Path, State},
    Json,
};
use diesel::Connection;
use serde::Deserialize;

use crate::error::{AppError, AppResult, LedgerError};
use crate::ledger::inventory;
use crate::models::Bed;
use crate::state::AppState;

use super::ApiResponse;

pub async fn list_buildings(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<inventory::BuildingOverview>>> {
    let mut conn = state.db()?;
    let overview = inventory::list_buildings(&mut conn)?;
    Ok(Json(overview))
}

pub async fn list_rooms(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<inventory::RoomOverview>>> {
    let mut conn = state.db()?;
    let overview = inventory::list_rooms(&mut conn)?;
    Ok(Json(overview))
}

pub async fn available_beds(State(state): State<AppState>) -> AppResult<Json<Vec<Bed>>> {
    let mut conn = state.db()?;
    let beds = inventory::available_beds(&mut conn)?;
    Ok(Json(beds))
}

#[derive(Deserialize)]
pub struct AddBedRequest {
    pub price: Option<f64>,
}

pub async fn add_bed(
    State(state): State<AppState>,
    Path(room_id): Path<i32>,
    Json(payload): Json<AddBedRequest>,
) -> AppResult<Json<ApiResponse<Bed>>> {
    let mut conn = state.db()?;
    let bed = conn
        .transaction(|conn| inventory::add_bed(conn, room_id, payload.price))
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok(
        format!("bed {} added", bed.bed_code),
        bed,
    )))
}

#[derive(Deserialize)]
pub struct UpdateBedRequest {
    pub price: Option<f64>,
    pub status: Option<String>,
}

pub async fn update_bed(
    State(state): State<AppState>,
    Path(bed_id): Path<i32>,
    Json(payload): Json<UpdateBedRequest>,
) -> AppResult<Json<ApiResponse<Bed>>> {
    let mut conn = state.db()?;
    let bed = conn
        .transaction(|conn| {
            inventory::update_bed(conn, bed_id, payload.price, payload.status.as_deref())
        })
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok(
        format!("bed {} updated", bed.bed_code),
        bed,
    )))
}

pub async fn remove_bed(
    State(state): State<AppState>,
    Path(bed_id): Path<i32>,
) -> AppResult<Json<ApiResponse<()>>> {
    let mut conn = state.db()?;
    let bed = conn
        .transaction::<_, LedgerError, _>(|conn| inventory::remove_bed(conn, bed_id))
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::message(format!(
        "bed {} removed",
        bed.bed_code
    ))))
}
