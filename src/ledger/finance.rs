use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::{Expense, NewExpense, NewPayment, Payment, Resident};
use crate::schema::{assignments, beds, expenses, payments, residents};

use super::{registry, ACTIVE, CONFIRMED, OCCUPIED};

pub const PAYMENT_TYPES: [&str; 3] = ["rent", "deposit", "other"];
pub const PAYMENT_STATUSES: [&str; 3] = ["confirmed", "pending", "cancelled"];

pub fn period_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn current_period() -> String {
    period_of(Utc::now().date_naive())
}

/// Calendar-month window: inclusive start, exclusive end.
fn month_window(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("valid month end");
    (start, end)
}

fn shift_month_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - back as i32;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

#[derive(Debug)]
pub struct PaymentInput {
    pub resident_id: i32,
    pub amount: f64,
    pub payment_type: Option<String>,
    pub payment_date: NaiveDate,
    pub period: Option<String>,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

/// Payments are append-only. A wrong entry is corrected by recording another
/// payment (or a cancelled one), never by editing the row.
pub fn record_payment(
    conn: &mut SqliteConnection,
    input: PaymentInput,
) -> Result<Payment, LedgerError> {
    if input.amount <= 0.0 {
        return Err(LedgerError::validation("amount must be positive"));
    }

    let payment_type = input.payment_type.unwrap_or_else(|| "rent".to_string());
    if !PAYMENT_TYPES.contains(&payment_type.as_str()) {
        return Err(LedgerError::validation(format!(
            "payment type must be one of {PAYMENT_TYPES:?}"
        )));
    }

    let status = input.status.unwrap_or_else(|| CONFIRMED.to_string());
    if !PAYMENT_STATUSES.contains(&status.as_str()) {
        return Err(LedgerError::validation(format!(
            "payment status must be one of {PAYMENT_STATUSES:?}"
        )));
    }

    registry::get_resident(conn, input.resident_id)?;

    let payment = diesel::insert_into(payments::table)
        .values(NewPayment {
            resident_id: input.resident_id,
            amount: input.amount,
            payment_type,
            payment_date: input.payment_date,
            period: input.period,
            method: input.method,
            notes: input.notes,
            status,
        })
        .returning(Payment::as_returning())
        .get_result(conn)?;

    Ok(payment)
}

#[derive(Debug)]
pub struct ExpenseInput {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub expense_date: NaiveDate,
    pub building_id: Option<i32>,
    pub room_id: Option<i32>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
}

pub fn record_expense(
    conn: &mut SqliteConnection,
    input: ExpenseInput,
) -> Result<Expense, LedgerError> {
    if input.description.trim().is_empty() {
        return Err(LedgerError::validation("description is required"));
    }
    if input.amount <= 0.0 {
        return Err(LedgerError::validation("amount must be positive"));
    }

    let expense = diesel::insert_into(expenses::table)
        .values(NewExpense {
            description: input.description.trim().to_string(),
            amount: input.amount,
            category: input.category,
            expense_date: input.expense_date,
            building_id: input.building_id,
            room_id: input.room_id,
            receipt_number: input.receipt_number,
            notes: input.notes,
        })
        .returning(Expense::as_returning())
        .get_result(conn)?;

    Ok(expense)
}

pub fn resident_payments(
    conn: &mut SqliteConnection,
    resident_id: i32,
) -> Result<Vec<Payment>, LedgerError> {
    Ok(payments::table
        .filter(payments::resident_id.eq(resident_id))
        .order(payments::payment_date.desc())
        .load(conn)?)
}

pub fn list_payments(
    conn: &mut SqliteConnection,
    resident_id: Option<i32>,
    period: Option<&str>,
) -> Result<Vec<Payment>, LedgerError> {
    let mut query = payments::table
        .order(payments::payment_date.desc())
        .into_boxed();
    if let Some(resident_id) = resident_id {
        query = query.filter(payments::resident_id.eq(resident_id));
    }
    if let Some(period) = period {
        query = query.filter(payments::period.eq(period.to_string()));
    }
    Ok(query.load(conn)?)
}

pub fn total_confirmed_payments(
    conn: &mut SqliteConnection,
    resident_id: i32,
    payment_type: Option<&str>,
) -> Result<f64, LedgerError> {
    let query = payments::table
        .filter(payments::resident_id.eq(resident_id))
        .filter(payments::status.eq(CONFIRMED))
        .select(sum(payments::amount));
    let total: Option<f64> = match payment_type {
        Some(ty) => query
            .filter(payments::payment_type.eq(ty))
            .get_result(conn)?,
        None => query.get_result(conn)?,
    };
    Ok(total.unwrap_or(0.0))
}

#[derive(Debug, Serialize)]
pub struct SystemStatistics {
    pub total_beds: i64,
    pub occupied_beds: i64,
    pub available_beds: i64,
    pub active_residents: i64,
    pub expected_revenue: f64,
    pub actual_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub occupancy_rate: f64,
}

pub fn system_statistics(
    conn: &mut SqliteConnection,
    standard_bed_price: f64,
) -> Result<SystemStatistics, LedgerError> {
    let total_beds: i64 = beds::table.count().get_result(conn)?;
    let occupied_beds: i64 = beds::table
        .filter(beds::status.eq(OCCUPIED))
        .count()
        .get_result(conn)?;
    let active_residents: i64 = residents::table
        .filter(residents::status.eq(ACTIVE))
        .count()
        .get_result(conn)?;

    let today = Utc::now().date_naive();
    let period = period_of(today);
    let actual_revenue: Option<f64> = payments::table
        .filter(payments::period.eq(&period))
        .filter(payments::status.eq(CONFIRMED))
        .select(sum(payments::amount))
        .get_result(conn)?;
    let actual_revenue = actual_revenue.unwrap_or(0.0);

    let (month_start, month_end) = month_window(today.year(), today.month());
    let total_expenses: Option<f64> = expenses::table
        .filter(expenses::expense_date.ge(month_start))
        .filter(expenses::expense_date.lt(month_end))
        .select(sum(expenses::amount))
        .get_result(conn)?;
    let total_expenses = total_expenses.unwrap_or(0.0);

    let occupancy_rate = if total_beds > 0 {
        occupied_beds as f64 / total_beds as f64 * 100.0
    } else {
        0.0
    };

    Ok(SystemStatistics {
        total_beds,
        occupied_beds,
        available_beds: total_beds - occupied_beds,
        active_residents,
        expected_revenue: total_beds as f64 * standard_bed_price,
        actual_revenue,
        total_expenses,
        net_profit: actual_revenue - total_expenses,
        occupancy_rate,
    })
}

/// Active residents with no confirmed rent payment for the period. This is an
/// existence check: a partial or deposit-only payment does not clear a
/// resident for the month.
pub fn overdue_residents(
    conn: &mut SqliteConnection,
    period: &str,
) -> Result<Vec<Resident>, LedgerError> {
    let active: Vec<Resident> = residents::table
        .filter(residents::status.eq(ACTIVE))
        .order(residents::name.asc())
        .load(conn)?;

    let paid_ids: Vec<i32> = payments::table
        .filter(payments::period.eq(period))
        .filter(payments::payment_type.eq("rent"))
        .filter(payments::status.eq(CONFIRMED))
        .select(payments::resident_id)
        .distinct()
        .load(conn)?;
    let paid: HashSet<i32> = paid_ids.into_iter().collect();

    Ok(active
        .into_iter()
        .filter(|resident| !paid.contains(&resident.id))
        .collect())
}

#[derive(Debug, Default, Serialize)]
pub struct LineTotal {
    pub count: usize,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct FinancialSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub expected_revenue: f64,
    pub collection_rate: f64,
    pub payments_breakdown: BTreeMap<String, LineTotal>,
    pub expenses_breakdown: BTreeMap<String, LineTotal>,
}

pub fn financial_summary(
    conn: &mut SqliteConnection,
    start_date: NaiveDate,
    end_date: NaiveDate,
    standard_bed_price: f64,
) -> Result<FinancialSummary, LedgerError> {
    if end_date < start_date {
        return Err(LedgerError::validation("end date is before start date"));
    }

    let window_payments: Vec<Payment> = payments::table
        .filter(payments::payment_date.ge(start_date))
        .filter(payments::payment_date.le(end_date))
        .filter(payments::status.eq(CONFIRMED))
        .load(conn)?;
    let window_expenses: Vec<Expense> = expenses::table
        .filter(expenses::expense_date.ge(start_date))
        .filter(expenses::expense_date.le(end_date))
        .load(conn)?;

    let mut payments_breakdown: BTreeMap<String, LineTotal> = BTreeMap::new();
    let mut total_revenue = 0.0;
    for payment in &window_payments {
        let key = if PAYMENT_TYPES.contains(&payment.payment_type.as_str()) {
            payment.payment_type.clone()
        } else {
            "other".to_string()
        };
        let line = payments_breakdown.entry(key).or_default();
        line.count += 1;
        line.amount += payment.amount;
        total_revenue += payment.amount;
    }

    let mut expenses_breakdown: BTreeMap<String, LineTotal> = BTreeMap::new();
    let mut total_expenses = 0.0;
    for expense in &window_expenses {
        let line = expenses_breakdown.entry(expense.category.clone()).or_default();
        line.count += 1;
        line.amount += expense.amount;
        total_expenses += expense.amount;
    }

    let total_beds: i64 = beds::table.count().get_result(conn)?;
    let expected_revenue = total_beds as f64 * standard_bed_price;
    let collection_rate = if expected_revenue > 0.0 {
        total_revenue / expected_revenue * 100.0
    } else {
        0.0
    };

    Ok(FinancialSummary {
        start_date,
        end_date,
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses,
        expected_revenue,
        collection_rate,
        payments_breakdown,
        expenses_breakdown,
    })
}

#[derive(Debug, Serialize)]
pub struct MonthOccupancy {
    pub month: String,
    pub occupied_beds: i64,
    pub total_beds: i64,
    pub occupancy_rate: f64,
    pub rent_revenue: f64,
}

/// Occupancy and rent revenue for each of the last `months` calendar months,
/// oldest first. An assignment counts for a month if its stay overlaps it.
pub fn occupancy_history(
    conn: &mut SqliteConnection,
    months: u32,
) -> Result<Vec<MonthOccupancy>, LedgerError> {
    let months = months.clamp(1, 24);
    let total_beds: i64 = beds::table.count().get_result(conn)?;
    let today = Utc::now().date_naive();

    let mut history = Vec::with_capacity(months as usize);
    for back in 0..months {
        let (year, month) = shift_month_back(today.year(), today.month(), back);
        let (month_start, month_end) = month_window(year, month);

        let occupied: i64 = assignments::table
            .filter(assignments::start_date.lt(month_end))
            .filter(
                assignments::end_date
                    .is_null()
                    .or(assignments::end_date.ge(month_start)),
            )
            .count()
            .get_result(conn)?;

        let revenue: Option<f64> = payments::table
            .filter(payments::payment_date.ge(month_start))
            .filter(payments::payment_date.lt(month_end))
            .filter(payments::payment_type.eq("rent"))
            .filter(payments::status.eq(CONFIRMED))
            .select(sum(payments::amount))
            .get_result(conn)?;

        let occupancy_rate = if total_beds > 0 {
            occupied as f64 / total_beds as f64 * 100.0
        } else {
            0.0
        };

        history.push(MonthOccupancy {
            month: format!("{year:04}-{month:02}"),
            occupied_beds: occupied,
            total_beds,
            occupancy_rate,
            rent_revenue: revenue.unwrap_or(0.0),
        });
    }

    history.reverse();
    Ok(history)
}

pub fn list_expenses(conn: &mut SqliteConnection) -> Result<Vec<Expense>, LedgerError> {
    Ok(expenses::table
        .order(expenses::expense_date.desc())
        .load(conn)?)
}

#[cfg(test)]
mod tests {
    use super::{month_window, period_of, shift_month_back};
    use chrono::NaiveDate;

    #[test]
    fn periods_are_year_month() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();
        assert_eq!(period_of(date), "2025-08");
    }

    #[test]
    fn month_windows_cover_year_boundaries() {
        let (start, end) = month_window(2025, 12);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn shifting_months_walks_backwards_across_years() {
        assert_eq!(shift_month_back(2025, 8, 0), (2025, 8));
        assert_eq!(shift_month_back(2025, 8, 7), (2025, 1));
        assert_eq!(shift_month_back(2025, 8, 8), (2024, 12));
        assert_eq!(shift_month_back(2025, 1, 13), (2023, 12));
    }
}
