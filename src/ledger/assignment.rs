use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::LedgerError;
use crate::models::{Assignment, Bed, NewAssignment};
use crate::schema::{assignments, beds};

use super::{registry, ACTIVE, ARCHIVED, AVAILABLE, ENDED, OCCUPIED};

/// Outcome of `unassign`. Ending an assignment twice is not a failure; the
/// caller just learns nothing happened.
#[derive(Debug)]
pub enum UnassignOutcome {
    Ended(Assignment),
    AlreadyEnded(Assignment),
}

pub fn active_assignment(
    conn: &mut SqliteConnection,
    resident_id: i32,
) -> Result<Option<Assignment>, LedgerError> {
    Ok(assignments::table
        .filter(assignments::resident_id.eq(resident_id))
        .filter(assignments::status.eq(ACTIVE))
        .first(conn)
        .optional()?)
}

pub fn current_bed(
    conn: &mut SqliteConnection,
    resident_id: i32,
) -> Result<Option<Bed>, LedgerError> {
    let bed = assignments::table
        .inner_join(beds::table)
        .filter(assignments::resident_id.eq(resident_id))
        .filter(assignments::status.eq(ACTIVE))
        .select(Bed::as_select())
        .first(conn)
        .optional()?;
    Ok(bed)
}

/// Moves a resident onto a bed. A prior active assignment is ended (its bed
/// freed, end date = the new start date), never deleted, so the history of
/// stays survives room switches.
pub fn assign(
    conn: &mut SqliteConnection,
    resident_id: i32,
    bed_id: i32,
    start_date: NaiveDate,
) -> Result<Assignment, LedgerError> {
    conn.transaction(|conn| {
        let resident = registry::get_resident(conn, resident_id)?;
        if resident.status == ARCHIVED {
            return Err(LedgerError::conflict(format!(
                "resident {} is archived",
                resident.name
            )));
        }

        let bed: Bed = beds::table
            .find(bed_id)
            .first(conn)
            .optional()?
            .ok_or(LedgerError::NotFound("bed"))?;
        if bed.status != AVAILABLE {
            return Err(LedgerError::conflict(format!(
                "bed {} is not available ({})",
                bed.bed_code, bed.status
            )));
        }

        if let Some(previous) = active_assignment(conn, resident_id)? {
            diesel::update(assignments::table.find(previous.id))
                .set((
                    assignments::status.eq(ENDED),
                    assignments::end_date.eq(Some(start_date)),
                ))
                .execute(conn)?;
            diesel::update(beds::table.find(previous.bed_id))
                .set(beds::status.eq(AVAILABLE))
                .execute(conn)?;
        }

        diesel::update(beds::table.find(bed.id))
            .set(beds::status.eq(OCCUPIED))
            .execute(conn)?;

        let assignment = diesel::insert_into(assignments::table)
            .values(NewAssignment {
                resident_id,
                bed_id,
                start_date,
                status: ACTIVE.to_string(),
            })
            .returning(Assignment::as_returning())
            .get_result(conn)?;

        Ok(assignment)
    })
}

pub fn unassign(
    conn: &mut SqliteConnection,
    assignment_id: i32,
    end_date: NaiveDate,
) -> Result<UnassignOutcome, LedgerError> {
    conn.transaction(|conn| {
        let assignment: Assignment = assignments::table
            .find(assignment_id)
            .first(conn)
            .optional()?
            .ok_or(LedgerError::NotFound("assignment"))?;

        if assignment.status == ENDED {
            return Ok(UnassignOutcome::AlreadyEnded(assignment));
        }

        diesel::update(assignments::table.find(assignment.id))
            .set((
                assignments::status.eq(ENDED),
                assignments::end_date.eq(Some(end_date)),
            ))
            .execute(conn)?;
        diesel::update(beds::table.find(assignment.bed_id))
            .set(beds::status.eq(AVAILABLE))
            .execute(conn)?;

        let updated = assignments::table.find(assignment.id).first(conn)?;
        Ok(UnassignOutcome::Ended(updated))
    })
}
