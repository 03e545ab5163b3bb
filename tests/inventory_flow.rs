mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{body_json, body_to_vec, TestApp};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
struct BuildingOverview {
    id: i32,
    code: String,
    total_rooms: i32,
    total_beds: i32,
    occupied_beds: i64,
}

#[derive(Deserialize)]
struct RoomOverview {
    id: i32,
    room_code: String,
    total_beds: i32,
    available_beds: i64,
}

#[derive(Deserialize)]
struct BedInfo {
    id: i32,
    bed_code: String,
    status: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    message: String,
    data: Option<T>,
}

async fn buildings(app: &TestApp, token: &str) -> Result<Vec<BuildingOverview>> {
    let response = app.get("/api/buildings", Some(token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_vec(response.into_body()).await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn rooms(app: &TestApp, token: &str) -> Result<Vec<RoomOverview>> {
    let response = app.get("/api/rooms", Some(token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_vec(response.into_body()).await?;
    Ok(serde_json::from_slice(&body)?)
}

#[tokio::test]
async fn seeded_inventory_has_two_buildings_of_52_beds() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let buildings = buildings(&app, &token).await?;
    assert_eq!(buildings.len(), 2);
    for building in &buildings {
        assert_eq!(building.total_rooms, 13);
        assert_eq!(building.total_beds, 26);
        assert_eq!(building.occupied_beds, 0);
    }
    assert_eq!(buildings[0].code, "K6");
    assert_eq!(buildings[1].code, "K7");

    let response = app.get("/api/beds/available", Some(&token)).await?;
    let body = body_to_vec(response.into_body()).await?;
    let beds: Vec<BedInfo> = serde_json::from_slice(&body)?;
    assert_eq!(beds.len(), 52);
    assert!(beds.iter().any(|bed| bed.bed_code == "K6011"));
    assert!(beds.iter().any(|bed| bed.bed_code == "K7132"));

    Ok(())
}

#[tokio::test]
async fn adding_and_removing_a_bed_moves_the_counters() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let first_room = rooms(&app, &token).await?.remove(0);
    assert_eq!(first_room.room_code, "K601");
    assert_eq!(first_room.total_beds, 2);

    let response = app
        .post_json(
            &format!("/api/rooms/{}/beds", first_room.id),
            &json!({ "price": 60.0 }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_vec(response.into_body()).await?;
    let envelope: Envelope<BedInfo> = serde_json::from_slice(&body)?;
    assert!(envelope.success);
    let new_bed = envelope.data.unwrap();
    assert_eq!(new_bed.bed_code, "K6013");
    assert_eq!(new_bed.status, "available");

    let room = rooms(&app, &token).await?.remove(0);
    assert_eq!(room.total_beds, 3);
    let k6 = buildings(&app, &token).await?.remove(0);
    assert_eq!(k6.total_beds, 27);

    let response = app
        .delete(&format!("/api/beds/{}", new_bed.id), Some(&token))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let room = rooms(&app, &token).await?.remove(0);
    assert_eq!(room.total_beds, 2);
    let k6 = buildings(&app, &token).await?.remove(0);
    assert_eq!(k6.total_beds, 26);

    Ok(())
}

#[tokio::test]
async fn occupied_beds_cannot_be_removed_or_flagged_for_maintenance() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let create = app
        .post_json("/api/residents", &json!({ "name": "Fatima" }), Some(&token))
        .await?;
    let created = body_json(create.into_body()).await?;
    let resident_id = created["data"]["id"].as_i64().unwrap();

    let response = app.get("/api/beds/available", Some(&token)).await?;
    let body = body_to_vec(response.into_body()).await?;
    let beds: Vec<BedInfo> = serde_json::from_slice(&body)?;
    let bed = &beds[0];

    let assign = app
        .post_json(
            "/api/assignments",
            &json!({
                "resident_id": resident_id,
                "bed_id": bed.id,
                "start_date": "2025-08-01"
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(assign.status(), StatusCode::OK);

    let response = app
        .delete(&format!("/api/beds/{}", bed.id), Some(&token))
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .patch_json(
            &format!("/api/beds/{}", bed.id),
            &json!({ "status": "maintenance" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The counters did not move.
    let k6 = buildings(&app, &token).await?.remove(0);
    assert_eq!(k6.total_beds, 26);
    assert_eq!(k6.occupied_beds, 1);

    Ok(())
}

#[tokio::test]
async fn a_maintenance_bed_is_not_assignable() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let response = app.get("/api/beds/available", Some(&token)).await?;
    let body = body_to_vec(response.into_body()).await?;
    let beds: Vec<BedInfo> = serde_json::from_slice(&body)?;
    let bed = &beds[0];

    let response = app
        .patch_json(
            &format!("/api/beds/{}", bed.id),
            &json!({ "status": "maintenance" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let create = app
        .post_json("/api/residents", &json!({ "name": "Aisha" }), Some(&token))
        .await?;
    let created = body_json(create.into_body()).await?;
    let resident_id = created["data"]["id"].as_i64().unwrap();

    let assign = app
        .post_json(
            "/api/assignments",
            &json!({
                "resident_id": resident_id,
                "bed_id": bed.id,
                "start_date": "2025-08-01"
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(assign.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn statistics_on_an_empty_inventory_do_not_divide_by_zero() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.login_token().await?;

    let response = app.get("/api/reports/statistics", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response.into_body()).await?;
    assert_eq!(stats["total_beds"].as_i64(), Some(0));
    assert_eq!(stats["occupancy_rate"].as_f64(), Some(0.0));

    let response = app
        .get("/api/reports/occupancy-history?months=3", Some(&token))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response.into_body()).await?;
    let months = history.as_array().unwrap();
    assert_eq!(months.len(), 3);
    for month in months {
        assert_eq!(month["total_beds"].as_i64(), Some(0));
        assert_eq!(month["occupancy_rate"].as_f64(), Some(0.0));
    }

    Ok(())
}
