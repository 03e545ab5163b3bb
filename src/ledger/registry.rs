use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::LedgerError;
use crate::models::{NewResident, Resident};
use crate::schema::residents;

use super::{ACTIVE, ARCHIVED};

#[derive(Debug, Default)]
pub struct ResidentFields {
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

#[derive(Debug, Default)]
pub struct ResidentUpdate {
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

pub fn get_resident(conn: &mut SqliteConnection, id: i32) -> Result<Resident, LedgerError> {
    residents::table
        .find(id)
        .first(conn)
        .optional()?
        .ok_or(LedgerError::NotFound("resident"))
}

pub fn list_residents(
    conn: &mut SqliteConnection,
    status: Option<&str>,
) -> Result<Vec<Resident>, LedgerError> {
    let query = residents::table.order(residents::name.asc());
    let rows = match status {
        Some(status) => query.filter(residents::status.eq(status)).load(conn)?,
        None => query.load(conn)?,
    };
    Ok(rows)
}

/// Rent and deposit fall back to the operator's standard per-bed price and
/// standard deposit when the intake form leaves them blank.
pub fn create_resident(
    conn: &mut SqliteConnection,
    fields: ResidentFields,
    standard_bed_price: f64,
    standard_deposit: f64,
) -> Result<Resident, LedgerError> {
    let name = fields.name.trim();
    if name.is_empty() {
        return Err(LedgerError::validation("name is required"));
    }

    let category = fields.category.unwrap_or_else(|| "student".to_string());
    if !matches!(category.as_str(), "student" | "employee") {
        return Err(LedgerError::validation(
            "category must be 'student' or 'employee'",
        ));
    }

    let rent_amount = fields.rent_amount.unwrap_or(standard_bed_price);
    let security_deposit = fields.security_deposit.unwrap_or(standard_deposit);
    if rent_amount <= 0.0 || security_deposit < 0.0 {
        return Err(LedgerError::validation("rent and deposit must be positive"));
    }

    let resident = diesel::insert_into(residents::table)
        .values(NewResident {
            name: name.to_string(),
            phone: fields.phone,
            national_id: fields.national_id,
            guardian_phone: fields.guardian_phone,
            university: fields.university,
            category,
            contract_start: fields.contract_start,
            contract_end: fields.contract_end,
            rent_amount,
            security_deposit,
            status: ACTIVE.to_string(),
            notes: fields.notes,
        })
        .returning(Resident::as_returning())
        .get_result(conn)?;

    Ok(resident)
}

/// Contact and contract edits only. Payments and assignments are records of
/// their own and never change through here.
pub fn update_resident(
    conn: &mut SqliteConnection,
    id: i32,
    update: ResidentUpdate,
) -> Result<Resident, LedgerError> {
    let resident = get_resident(conn, id)?;

    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(LedgerError::validation("name must not be empty"));
        }
    }
    if matches!(update.rent_amount, Some(amount) if amount <= 0.0) {
        return Err(LedgerError::validation("rent must be positive"));
    }

    diesel::update(residents::table.find(resident.id))
        .set((
            residents::name.eq(update
                .name
                .map(|n| n.trim().to_string())
                .unwrap_or(resident.name)),
            residents::phone.eq(update.phone.or(resident.phone)),
            residents::national_id.eq(update.national_id.or(resident.national_id)),
            residents::guardian_phone.eq(update.guardian_phone.or(resident.guardian_phone)),
            residents::university.eq(update.university.or(resident.university)),
            residents::contract_start.eq(update.contract_start.or(resident.contract_start)),
            residents::contract_end.eq(update.contract_end.or(resident.contract_end)),
            residents::rent_amount.eq(update.rent_amount.unwrap_or(resident.rent_amount)),
            residents::security_deposit.eq(update
                .security_deposit
                .unwrap_or(resident.security_deposit)),
            residents::notes.eq(update.notes.or(resident.notes)),
        ))
        .execute(conn)?;

    get_resident(conn, id)
}

/// The only legal transitions are active <-> archived. Setting the current
/// status again is a no-op.
pub fn set_status(
    conn: &mut SqliteConnection,
    id: i32,
    status: &str,
) -> Result<Resident, LedgerError> {
    if !matches!(status, ACTIVE | ARCHIVED) {
        return Err(LedgerError::validation(format!(
            "status must be '{ACTIVE}' or '{ARCHIVED}'"
        )));
    }

    let resident = get_resident(conn, id)?;
    if resident.status == status {
        return Ok(resident);
    }

    diesel::update(residents::table.find(id))
        .set(residents::status.eq(status))
        .execute(conn)?;

    get_resident(conn, id)
}
