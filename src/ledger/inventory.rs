use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::{Bed, Building, NewBed, NewBuilding, NewRoom, Room};
use crate::schema::{beds, buildings, rooms};

use super::{AVAILABLE, MAINTENANCE, OCCUPIED};

/// Bed codes follow the `{building}{room:02}{bed}` scheme, e.g. `K6012` for
/// building K6, room 1, bed 2. Codes are generated and never parsed back;
/// the unique index on `beds.bed_code` catches any collision.
pub fn bed_code(building_code: &str, room_number: i32, bed_number: i32) -> String {
    format!("{building_code}{room_number:02}{bed_number}")
}

pub fn room_code(building_code: &str, room_number: i32) -> String {
    format!("{building_code}{room_number:02}")
}

#[derive(Debug, Serialize)]
pub struct BuildingOverview {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub total_rooms: i32,
    pub total_beds: i32,
    pub occupied_beds: i64,
}

#[derive(Debug, Serialize)]
pub struct RoomOverview {
    pub id: i32,
    pub building_code: String,
    pub room_number: i32,
    pub room_code: String,
    pub room_type: String,
    pub total_beds: i32,
    pub occupied_beds: i64,
    pub available_beds: i64,
    pub price_per_bed: f64,
    pub monthly_revenue: f64,
}

pub fn list_buildings(conn: &mut SqliteConnection) -> Result<Vec<BuildingOverview>, LedgerError> {
    let building_rows: Vec<Building> = buildings::table.order(buildings::code.asc()).load(conn)?;

    let mut overview = Vec::with_capacity(building_rows.len());
    for building in building_rows {
        let occupied: i64 = beds::table
            .filter(beds::building_id.eq(building.id))
            .filter(beds::status.eq(OCCUPIED))
            .count()
            .get_result(conn)?;
        overview.push(BuildingOverview {
            id: building.id,
            code: building.code,
            name: building.name,
            total_rooms: building.total_rooms,
            total_beds: building.total_beds,
            occupied_beds: occupied,
        });
    }

    Ok(overview)
}

pub fn list_rooms(conn: &mut SqliteConnection) -> Result<Vec<RoomOverview>, LedgerError> {
    let rows: Vec<(Room, String)> = rooms::table
        .inner_join(buildings::table)
        .select((Room::as_select(), buildings::code))
        .order(rooms::room_code.asc())
        .load(conn)?;

    let mut overview = Vec::with_capacity(rows.len());
    for (room, building_code) in rows {
        let occupied: i64 = beds::table
            .filter(beds::room_id.eq(room.id))
            .filter(beds::status.eq(OCCUPIED))
            .count()
            .get_result(conn)?;
        let available: i64 = beds::table
            .filter(beds::room_id.eq(room.id))
            .filter(beds::status.eq(AVAILABLE))
            .count()
            .get_result(conn)?;
        overview.push(RoomOverview {
            id: room.id,
            building_code,
            room_number: room.room_number,
            room_code: room.room_code,
            room_type: room.room_type,
            total_beds: room.total_beds,
            occupied_beds: occupied,
            available_beds: available,
            price_per_bed: room.price_per_bed,
            monthly_revenue: room.monthly_revenue,
        });
    }

    Ok(overview)
}

pub fn available_beds(conn: &mut SqliteConnection) -> Result<Vec<Bed>, LedgerError> {
    Ok(beds::table
        .filter(beds::status.eq(AVAILABLE))
        .order(beds::bed_code.asc())
        .load(conn)?)
}

/// Appends a bed to a room: bed number = capacity + 1, room revenue and both
/// bed counters move together with the insert.
pub fn add_bed(
    conn: &mut SqliteConnection,
    room_id: i32,
    price: Option<f64>,
) -> Result<Bed, LedgerError> {
    let room: Room = rooms::table
        .find(room_id)
        .first(conn)
        .optional()?
        .ok_or(LedgerError::NotFound("room"))?;
    let building: Building = buildings::table.find(room.building_id).first(conn)?;

    let bed_number = room.total_beds + 1;
    let code = bed_code(&building.code, room.room_number, bed_number);

    let duplicate: Option<Bed> = beds::table
        .filter(beds::bed_code.eq(&code))
        .first(conn)
        .optional()?;
    if duplicate.is_some() {
        return Err(LedgerError::conflict(format!(
            "bed code {code} already exists"
        )));
    }

    let price = price.unwrap_or(room.price_per_bed);
    if price <= 0.0 {
        return Err(LedgerError::validation("price must be positive"));
    }

    let bed: Bed = diesel::insert_into(beds::table)
        .values(NewBed {
            building_id: room.building_id,
            room_id: room.id,
            bed_number,
            bed_code: code,
            price,
            status: AVAILABLE.to_string(),
        })
        .returning(Bed::as_returning())
        .get_result(conn)?;

    let new_total = room.total_beds + 1;
    diesel::update(rooms::table.find(room.id))
        .set((
            rooms::total_beds.eq(new_total),
            rooms::monthly_revenue.eq(f64::from(new_total) * room.price_per_bed),
        ))
        .execute(conn)?;
    diesel::update(buildings::table.find(building.id))
        .set(buildings::total_beds.eq(building.total_beds + 1))
        .execute(conn)?;

    Ok(bed)
}

pub fn remove_bed(conn: &mut SqliteConnection, bed_id: i32) -> Result<Bed, LedgerError> {
    let bed: Bed = beds::table
        .find(bed_id)
        .first(conn)
        .optional()?
        .ok_or(LedgerError::NotFound("bed"))?;

    if bed.status == OCCUPIED {
        return Err(LedgerError::conflict(format!(
            "bed {} is occupied and cannot be removed",
            bed.bed_code
        )));
    }

    let room: Room = rooms::table.find(bed.room_id).first(conn)?;
    let building: Building = buildings::table.find(bed.building_id).first(conn)?;

    diesel::delete(beds::table.find(bed.id)).execute(conn)?;

    let new_total = room.total_beds - 1;
    diesel::update(rooms::table.find(room.id))
        .set((
            rooms::total_beds.eq(new_total),
            rooms::monthly_revenue.eq(f64::from(new_total) * room.price_per_bed),
        ))
        .execute(conn)?;
    diesel::update(buildings::table.find(building.id))
        .set(buildings::total_beds.eq(building.total_beds - 1))
        .execute(conn)?;

    Ok(bed)
}

/// Price edits and the available/maintenance toggle. Occupancy is owned by the
/// assignment ledger, so `occupied` can never be set here.
pub fn update_bed(
    conn: &mut SqliteConnection,
    bed_id: i32,
    price: Option<f64>,
    status: Option<&str>,
) -> Result<Bed, LedgerError> {
    let bed: Bed = beds::table
        .find(bed_id)
        .first(conn)
        .optional()?
        .ok_or(LedgerError::NotFound("bed"))?;

    if let Some(price) = price {
        if price <= 0.0 {
            return Err(LedgerError::validation("price must be positive"));
        }
        diesel::update(beds::table.find(bed.id))
            .set(beds::price.eq(price))
            .execute(conn)?;
    }

    if let Some(status) = status {
        if !matches!(status, AVAILABLE | MAINTENANCE) {
            return Err(LedgerError::validation(format!(
                "status must be '{AVAILABLE}' or '{MAINTENANCE}'"
            )));
        }
        if bed.status == OCCUPIED {
            return Err(LedgerError::conflict(format!(
                "bed {} is occupied; end its assignment first",
                bed.bed_code
            )));
        }
        diesel::update(beds::table.find(bed.id))
            .set(beds::status.eq(status))
            .execute(conn)?;
    }

    Ok(beds::table.find(bed.id).first(conn)?)
}

/// Provisions the canonical two-building inventory (K6 and K7, 13 double rooms
/// each). Safe to call repeatedly; existing rows are left alone.
pub fn setup_initial_inventory(
    conn: &mut SqliteConnection,
    standard_bed_price: f64,
) -> Result<(), LedgerError> {
    conn.transaction(|conn| {
        for (code, name) in [("K6", "Building K6"), ("K7", "Building K7")] {
            let existing: Option<Building> = buildings::table
                .filter(buildings::code.eq(code))
                .first(conn)
                .optional()?;
            let building = match existing {
                Some(building) => building,
                None => diesel::insert_into(buildings::table)
                    .values(NewBuilding {
                        code,
                        name,
                        total_rooms: 13,
                        total_beds: 26,
                    })
                    .returning(Building::as_returning())
                    .get_result(conn)?,
            };

            for room_number in 1..=13 {
                let code = room_code(&building.code, room_number);
                let existing: Option<Room> = rooms::table
                    .filter(rooms::room_code.eq(&code))
                    .first(conn)
                    .optional()?;
                let room = match existing {
                    Some(room) => room,
                    None => diesel::insert_into(rooms::table)
                        .values(NewRoom {
                            building_id: building.id,
                            room_number,
                            room_type: "double".to_string(),
                            total_beds: 2,
                            price_per_bed: standard_bed_price,
                            monthly_revenue: 2.0 * standard_bed_price,
                            room_code: code,
                        })
                        .returning(Room::as_returning())
                        .get_result(conn)?,
                };

                for bed_number in 1..=room.total_beds {
                    let code = bed_code(&building.code, room_number, bed_number);
                    let existing: Option<Bed> = beds::table
                        .filter(beds::bed_code.eq(&code))
                        .first(conn)
                        .optional()?;
                    if existing.is_none() {
                        diesel::insert_into(beds::table)
                            .values(NewBed {
                                building_id: building.id,
                                room_id: room.id,
                                bed_number,
                                bed_code: code,
                                price: standard_bed_price,
                                status: AVAILABLE.to_string(),
                            })
                            .execute(conn)?;
                    }
                }
            }
        }
        Ok(())
    })
}
