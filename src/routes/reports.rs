use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::ledger::finance;
use crate::models::Resident;
use crate::state::AppState;

pub async fn statistics(
    State(state): State<AppState>,
) -> AppResult<Json<finance::SystemStatistics>> {
    let mut conn = state.db()?;
    let stats = finance::system_statistics(&mut conn, state.config.standard_bed_price)?;
    Ok(Json(stats))
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub async fn financial_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<finance::FinancialSummary>> {
    let today = Utc::now().date_naive();
    let start = query
        .start_date
        .unwrap_or_else(|| today.with_day(1).expect("first of month"));
    let end = query.end_date.unwrap_or(today);

    let mut conn = state.db()?;
    let summary =
        finance::financial_summary(&mut conn, start, end, state.config.standard_bed_price)?;
    Ok(Json(summary))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub months: Option<u32>,
}

pub async fn occupancy_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<finance::MonthOccupancy>>> {
    let mut conn = state.db()?;
    let history = finance::occupancy_history(&mut conn, query.months.unwrap_or(6))?;
    Ok(Json(history))
}

#[derive(Deserialize)]
pub struct OverdueQuery {
    pub period: Option<String>,
}

#[derive(Serialize)]
pub struct OverdueResponse {
    pub period: String,
    pub residents: Vec<Resident>,
}

pub async fn overdue(
    State(state): State<AppState>,
    Query(query): Query<OverdueQuery>,
) -> AppResult<Json<OverdueResponse>> {
    let period = query.period.unwrap_or_else(finance::current_period);
    let mut conn = state.db()?;
    let residents = finance::overdue_residents(&mut conn, &period)?;
    Ok(Json(OverdueResponse { period, residents }))
}
