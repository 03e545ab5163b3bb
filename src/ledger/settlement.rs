use chrono::{Datelike, NaiveDate};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::{ArchiveRecord, NewArchiveRecord, Resident};
use crate::schema::{archive_records, beds, payments, residents};

use super::{assignment, finance, registry, ACTIVE, ARCHIVED, CONFIRMED};

/// Whole-month count between two dates, with the operator's rounding rule: a
/// started month counts as a full month (`end.day >= start.day` adds one), and
/// any stay is at least one month. This bias directly affects money owed, so
/// it must not be "improved".
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut months = i64::from(end.year() - start.year()) * 12
        + i64::from(end.month() as i32 - start.month() as i32);
    if end.day() >= start.day() {
        months += 1;
    }
    months.max(1)
}

#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    pub total_payments: f64,
    pub rent_payments: f64,
    pub deposit_payments: f64,
    pub total_rent_due: f64,
    pub security_deposit: f64,
    pub rent_balance: f64,
    pub final_balance: f64,
    pub refund_amount: f64,
    pub months_stayed: i64,
}

/// The settlement arithmetic, separated from storage. A rent shortfall is
/// covered from the deposit; only the part the deposit cannot cover remains a
/// debt (negative final balance). With rent fully paid the deposit comes back
/// whole and any overpayment is a credit owed to the resident.
pub(crate) fn resolve_balance(rent_balance: f64, deposit_payments: f64) -> (f64, f64) {
    if rent_balance < 0.0 {
        let remaining_deposit = deposit_payments + rent_balance;
        let refund = remaining_deposit.max(0.0);
        let final_balance = if remaining_deposit < 0.0 {
            rent_balance
        } else {
            0.0
        };
        (refund, final_balance)
    } else {
        (deposit_payments, rent_balance)
    }
}

/// Computes the departing resident's settlement without touching any state.
/// Idempotent: the same payments and dates always produce the same figures.
pub fn final_balance(
    conn: &mut SqliteConnection,
    resident: &Resident,
    departure_date: NaiveDate,
) -> Result<Settlement, LedgerError> {
    let total_payments = finance::total_confirmed_payments(conn, resident.id, None)?;
    let rent_payments = finance::total_confirmed_payments(conn, resident.id, Some("rent"))?;
    let deposit_payments = finance::total_confirmed_payments(conn, resident.id, Some("deposit"))?;

    // Months stayed anchor: the contract start, or failing that the first
    // confirmed rent payment. With neither there is nothing to charge.
    let stay_start = match resident.contract_start {
        Some(start) => Some(start),
        None => payments::table
            .filter(payments::resident_id.eq(resident.id))
            .filter(payments::payment_type.eq("rent"))
            .filter(payments::status.eq(CONFIRMED))
            .order(payments::payment_date.asc())
            .select(payments::payment_date)
            .first::<NaiveDate>(conn)
            .optional()?,
    };

    let (months_stayed, total_rent_due) = match stay_start {
        Some(start) => {
            let months = months_between(start, departure_date);
            (months, months as f64 * resident.rent_amount)
        }
        None => (0, 0.0),
    };

    let rent_balance = rent_payments - total_rent_due;
    let (refund_amount, final_balance) = resolve_balance(rent_balance, deposit_payments);

    Ok(Settlement {
        total_payments,
        rent_payments,
        deposit_payments,
        total_rent_due,
        security_deposit: resident.security_deposit,
        rent_balance,
        final_balance,
        refund_amount,
        months_stayed,
    })
}

#[derive(Debug, Serialize)]
pub struct SettlementPreview {
    pub resident: Resident,
    pub current_bed_code: Option<String>,
    pub settlement: Settlement,
}

pub fn settlement_preview(
    conn: &mut SqliteConnection,
    resident_id: i32,
    departure_date: NaiveDate,
) -> Result<SettlementPreview, LedgerError> {
    let resident = registry::get_resident(conn, resident_id)?;
    if resident.status == ARCHIVED {
        return Err(LedgerError::conflict("resident is already archived"));
    }

    let settlement = final_balance(conn, &resident, departure_date)?;
    let current_bed = assignment::current_bed(conn, resident_id)?;

    Ok(SettlementPreview {
        resident,
        current_bed_code: current_bed.map(|bed| bed.bed_code),
        settlement,
    })
}

/// Settles and archives a departing resident in one transaction: compute the
/// balance, end the active assignment (freeing the bed), snapshot an archive
/// record, and flip the resident to archived. Any failure rolls the whole
/// thing back.
pub fn archive(
    conn: &mut SqliteConnection,
    resident_id: i32,
    departure_date: NaiveDate,
    departure_reason: Option<String>,
    notes: Option<String>,
) -> Result<(ArchiveRecord, Settlement), LedgerError> {
    conn.transaction(|conn| {
        let resident = registry::get_resident(conn, resident_id)?;
        if resident.status == ARCHIVED {
            return Err(LedgerError::conflict(format!(
                "resident {} is already archived",
                resident.name
            )));
        }

        let settlement = final_balance(conn, &resident, departure_date)?;

        let mut last_bed_code = None;
        if let Some(active) = assignment::active_assignment(conn, resident_id)? {
            last_bed_code = beds::table
                .find(active.bed_id)
                .select(beds::bed_code)
                .first::<String>(conn)
                .optional()?;
            match assignment::unassign(conn, active.id, departure_date)? {
                assignment::UnassignOutcome::Ended(_)
                | assignment::UnassignOutcome::AlreadyEnded(_) => {}
            }
        }

        let record = diesel::insert_into(archive_records::table)
            .values(NewArchiveRecord {
                resident_id: resident.id,
                resident_name: resident.name.clone(),
                phone: resident.phone.clone(),
                national_id: resident.national_id.clone(),
                bed_code: last_bed_code,
                departure_date,
                departure_reason,
                total_payments: settlement.total_payments,
                rent_payments: settlement.rent_payments,
                deposit_payments: settlement.deposit_payments,
                total_rent_due: settlement.total_rent_due,
                security_deposit: settlement.security_deposit,
                final_balance: settlement.final_balance,
                refund_amount: settlement.refund_amount,
                months_stayed: settlement.months_stayed as i32,
                notes,
            })
            .returning(ArchiveRecord::as_returning())
            .get_result(conn)?;

        diesel::update(residents::table.find(resident.id))
            .set((
                residents::status.eq(ARCHIVED),
                residents::departure_date.eq(Some(departure_date)),
            ))
            .execute(conn)?;

        Ok((record, settlement))
    })
}

/// Reactivates an archived resident and deletes the archive record. The old
/// bed assignment is NOT restored (the bed may be someone else's by now); the
/// caller must surface that and re-assign explicitly.
pub fn restore(
    conn: &mut SqliteConnection,
    archive_id: i32,
) -> Result<(ArchiveRecord, Resident), LedgerError> {
    conn.transaction(|conn| {
        let record: ArchiveRecord = archive_records::table
            .find(archive_id)
            .first(conn)
            .optional()?
            .ok_or(LedgerError::NotFound("archive record"))?;

        let resident = registry::get_resident(conn, record.resident_id)?;

        diesel::update(residents::table.find(resident.id))
            .set((
                residents::status.eq(ACTIVE),
                residents::departure_date.eq(None::<NaiveDate>),
            ))
            .execute(conn)?;

        diesel::delete(archive_records::table.find(record.id)).execute(conn)?;

        let resident = registry::get_resident(conn, resident.id)?;
        Ok((record, resident))
    })
}

pub fn list_archive(
    conn: &mut SqliteConnection,
    search: Option<&str>,
) -> Result<Vec<ArchiveRecord>, LedgerError> {
    let query = archive_records::table.order(archive_records::archived_at.desc());
    let rows = match search {
        Some(needle) if !needle.trim().is_empty() => {
            let pattern = format!("%{}%", needle.trim());
            query
                .filter(archive_records::resident_name.like(pattern))
                .load(conn)?
        }
        _ => query.load(conn)?,
    };
    Ok(rows)
}
