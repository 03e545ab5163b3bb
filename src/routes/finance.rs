use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use diesel::Connection;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::ledger::finance;
use crate::models::{Expense, Payment};
use crate::state::AppState;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct RecordPaymentRequest {
    pub resident_id: i32,
    pub amount: f64,
    pub payment_type: Option<String>,
    pub payment_date: NaiveDate,
    pub period: Option<String>,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

pub async fn record_payment(
    State(state): State<AppState>,
    Json(payload): Json<RecordPaymentRequest>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let mut conn = state.db()?;
    let input = finance::PaymentInput {
        resident_id: payload.resident_id,
        amount: payload.amount,
        payment_type: payload.payment_type,
        payment_date: payload.payment_date,
        period: payload.period,
        method: payload.method,
        notes: payload.notes,
        status: payload.status,
    };
    let payment = conn
        .transaction(|conn| finance::record_payment(conn, input))
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok("payment recorded", payment)))
}

#[derive(Deserialize)]
pub struct ListPaymentsQuery {
    pub resident_id: Option<i32>,
    pub period: Option<String>,
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> AppResult<Json<Vec<Payment>>> {
    let mut conn = state.db()?;
    let rows = finance::list_payments(&mut conn, query.resident_id, query.period.as_deref())?;
    Ok(Json(rows))
}

pub async fn resident_payments(
    State(state): State<AppState>,
    Path(resident_id): Path<i32>,
) -> AppResult<Json<Vec<Payment>>> {
    let mut conn = state.db()?;
    let rows = finance::resident_payments(&mut conn, resident_id)?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct RecordExpenseRequest {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub expense_date: NaiveDate,
    pub building_id: Option<i32>,
    pub room_id: Option<i32>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
}

pub async fn record_expense(
    State(state): State<AppState>,
    Json(payload): Json<RecordExpenseRequest>,
) -> AppResult<Json<ApiResponse<Expense>>> {
    let mut conn = state.db()?;
    let input = finance::ExpenseInput {
        description: payload.description,
        amount: payload.amount,
        category: payload.category,
        expense_date: payload.expense_date,
        building_id: payload.building_id,
        room_id: payload.room_id,
        receipt_number: payload.receipt_number,
        notes: payload.notes,
    };
    let expense = conn
        .transaction(|conn| finance::record_expense(conn, input))
        .map_err(AppError::from)?;
    Ok(Json(ApiResponse::ok("expense recorded", expense)))
}

pub async fn list_expenses(State(state): State<AppState>) -> AppResult<Json<Vec<Expense>>> {
    let mut conn = state.db()?;
    let rows = finance::list_expenses(&mut conn)?;
    Ok(Json(rows))
}
