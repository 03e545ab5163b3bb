use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::*;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = buildings)]
pub struct Building {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub total_rooms: i32,
    pub total_beds: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = buildings)]
pub struct NewBuilding<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub total_rooms: i32,
    pub total_beds: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = rooms)]
pub struct Room {
    pub id: i32,
    pub building_id: i32,
    pub room_number: i32,
    pub room_type: String,
    pub total_beds: i32,
    pub price_per_bed: f64,
    pub monthly_revenue: f64,
    pub room_code: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = rooms)]
pub struct NewRoom {
    pub building_id: i32,
    pub room_number: i32,
    pub room_type: String,
    pub total_beds: i32,
    pub price_per_bed: f64,
    pub monthly_revenue: f64,
    pub room_code: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = beds)]
pub struct Bed {
    pub id: i32,
    pub building_id: i32,
    pub room_id: i32,
    pub bed_number: i32,
    pub bed_code: String,
    pub price: f64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = beds)]
pub struct NewBed {
    pub building_id: i32,
    pub room_id: i32,
    pub bed_number: i32,
    pub bed_code: String,
    pub price: f64,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = residents)]
pub struct Resident {
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub guardian_phone: Option<String>,
    pub university: Option<String>,
    pub category: String,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub departure_date: Option<NaiveDate>,
    pub rent_amount: f64,
    pub security_deposit: f64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = residents)]
pub struct NewResident {
    pub name: String,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub guardian_phone: Option<String>,
    pub university: Option<String>,
    pub category: String,
    pub contract_start: Option<NaiveDate>,
    pub contract_end: Option<NaiveDate>,
    pub rent_amount: f64,
    pub security_deposit: f64,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = assignments)]
#[diesel(belongs_to(Resident))]
#[diesel(belongs_to(Bed))]
pub struct Assignment {
    pub id: i32,
    pub resident_id: i32,
    pub bed_id: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = assignments)]
pub struct NewAssignment {
    pub resident_id: i32,
    pub bed_id: i32,
    pub start_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = payments)]
#[diesel(belongs_to(Resident))]
pub struct Payment {
    pub id: i32,
    pub resident_id: i32,
    pub amount: f64,
    pub payment_type: String,
    pub payment_date: NaiveDate,
    pub period: Option<String>,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPayment {
    pub resident_id: i32,
    pub amount: f64,
    pub payment_type: String,
    pub payment_date: NaiveDate,
    pub period: Option<String>,
    pub method: Option<String>,
    pub notes: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = expenses)]
pub struct Expense {
    pub id: i32,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub expense_date: NaiveDate,
    pub building_id: Option<i32>,
    pub room_id: Option<i32>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = expenses)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub expense_date: NaiveDate,
    pub building_id: Option<i32>,
    pub room_id: Option<i32>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = archive_records)]
pub struct ArchiveRecord {
    pub id: i32,
    pub resident_id: i32,
    pub resident_name: String,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub bed_code: Option<String>,
    pub departure_date: NaiveDate,
    pub departure_reason: Option<String>,
    pub total_payments: f64,
    pub rent_payments: f64,
    pub deposit_payments: f64,
    pub total_rent_due: f64,
    pub security_deposit: f64,
    pub final_balance: f64,
    pub refund_amount: f64,
    pub months_stayed: i32,
    pub notes: Option<String>,
    pub archived_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = archive_records)]
pub struct NewArchiveRecord {
    pub resident_id: i32,
    pub resident_name: String,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub bed_code: Option<String>,
    pub departure_date: NaiveDate,
    pub departure_reason: Option<String>,
    pub total_payments: f64,
    pub rent_payments: f64,
    pub deposit_payments: f64,
    pub total_rent_due: f64,
    pub security_deposit: f64,
    pub final_balance: f64,
    pub refund_amount: f64,
    pub months_stayed: i32,
    pub notes: Option<String>,
}
