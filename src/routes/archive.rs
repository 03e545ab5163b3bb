use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::ledger::settlement;
use crate::models::{ArchiveRecord, Resident};
use crate::state::AppState;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct ArchiveListQuery {
    pub search: Option<String>,
}

pub async fn list_archive(
    State(state): State<AppState>,
    Query(query): Query<ArchiveListQuery>,
) -> AppResult<Json<Vec<ArchiveRecord>>> {
    let mut conn = state.db()?;
    let rows = settlement::list_archive(&mut conn, query.search.as_deref())?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub departure_date: Option<NaiveDate>,
}

pub async fn preview(
    State(state): State<AppState>,
    Path(resident_id): Path<i32>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<settlement::SettlementPreview>> {
    let departure = query
        .departure_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let mut conn = state.db()?;
    let preview = settlement::settlement_preview(&mut conn, resident_id, departure)?;
    Ok(Json(preview))
}

#[derive(Deserialize)]
pub struct ArchiveRequest {
    pub resident_id: i32,
    pub departure_date: Option<NaiveDate>,
    pub departure_reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct ArchiveOutcome {
    pub record: ArchiveRecord,
    pub settlement: settlement::Settlement,
}

pub async fn archive_resident(
    State(state): State<AppState>,
    Json(payload): Json<ArchiveRequest>,
) -> AppResult<Json<ApiResponse<ArchiveOutcome>>> {
    let departure = payload
        .departure_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let mut conn = state.db()?;
    let (record, settlement) = settlement::archive(
        &mut conn,
        payload.resident_id,
        departure,
        payload.departure_reason,
        payload.notes,
    )
    .map_err(AppError::from)?;

    let message = format!("resident {} archived", record.resident_name);
    Ok(Json(ApiResponse::ok(
        message,
        ArchiveOutcome { record, settlement },
    )))
}

#[derive(Serialize)]
pub struct RestoreOutcome {
    pub resident: Resident,
    /// Restoring never re-creates the old bed assignment; the bed may already
    /// belong to someone else. Callers must assign a bed explicitly.
    pub bed_restored: bool,
}

pub async fn restore_resident(
    State(state): State<AppState>,
    Path(archive_id): Path<i32>,
) -> AppResult<Json<ApiResponse<RestoreOutcome>>> {
    let mut conn = state.db()?;
    let (_record, resident) =
        settlement::restore(&mut conn, archive_id).map_err(AppError::from)?;

    let message = format!(
        "resident {} restored; previous bed assignment was not restored",
        resident.name
    );
    Ok(Json(ApiResponse::ok(
        message,
        RestoreOutcome {
            resident,
            bed_restored: false,
        },
    )))
}
