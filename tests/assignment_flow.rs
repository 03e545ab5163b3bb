mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{body_json, TestApp};
use serde_json::json;

async fn create_resident(app: &TestApp, token: &str, name: &str) -> Result<i64> {
    let response = app
        .post_json("/api/residents", &json!({ "name": name }), Some(token))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await?;
    Ok(body["data"]["id"].as_i64().unwrap())
}

async fn available_bed_ids(app: &TestApp, token: &str) -> Result<Vec<i64>> {
    let response = app.get("/api/beds/available", Some(token)).await?;
    let body = body_json(response.into_body()).await?;
    Ok(body
        .as_array()
        .unwrap()
        .iter()
        .map(|bed| bed["id"].as_i64().unwrap())
        .collect())
}

#[tokio::test]
async fn assigning_a_bed_marks_it_occupied() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let resident_id = create_resident(&app, &token, "Nour").await?;
    let beds = available_bed_ids(&app, &token).await?;
    let bed_id = beds[0];

    let response = app
        .post_json(
            "/api/assignments",
            &json!({
                "resident_id": resident_id,
                "bed_id": bed_id,
                "start_date": "2025-03-01"
            }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await?;
    assert_eq!(body["success"].as_bool(), Some(true));
    assert_eq!(body["data"]["bed_id"].as_i64(), Some(bed_id));
    assert_eq!(body["data"]["status"].as_str(), Some("active"));

    let remaining = available_bed_ids(&app, &token).await?;
    assert_eq!(remaining.len(), beds.len() - 1);
    assert!(!remaining.contains(&bed_id));

    let response = app
        .get(&format!("/api/residents/{resident_id}"), Some(&token))
        .await?;
    let detail = body_json(response.into_body()).await?;
    assert_eq!(detail["current_bed"]["id"].as_i64(), Some(bed_id));
    assert_eq!(detail["current_bed"]["status"].as_str(), Some("occupied"));

    Ok(())
}

#[tokio::test]
async fn an_occupied_bed_rejects_a_second_resident() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let first = create_resident(&app, &token, "Nour").await?;
    let second = create_resident(&app, &token, "Rania").await?;
    let bed_id = available_bed_ids(&app, &token).await?[0];

    let response = app
        .post_json(
            "/api/assignments",
            &json!({ "resident_id": first, "bed_id": bed_id, "start_date": "2025-03-01" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_json(
            "/api/assignments",
            &json!({ "resident_id": second, "bed_id": bed_id, "start_date": "2025-03-02" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn reassigning_a_resident_frees_the_old_bed() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let resident_id = create_resident(&app, &token, "Nour").await?;
    let beds = available_bed_ids(&app, &token).await?;
    let (first_bed, second_bed) = (beds[0], beds[1]);

    for (bed_id, start_date) in [(first_bed, "2025-03-01"), (second_bed, "2025-05-01")] {
        let response = app
            .post_json(
                "/api/assignments",
                &json!({
                    "resident_id": resident_id,
                    "bed_id": bed_id,
                    "start_date": start_date
                }),
                Some(&token),
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // The first bed came back into the pool, only the second is held.
    let remaining = available_bed_ids(&app, &token).await?;
    assert!(remaining.contains(&first_bed));
    assert!(!remaining.contains(&second_bed));

    let response = app
        .get(&format!("/api/residents/{resident_id}"), Some(&token))
        .await?;
    let detail = body_json(response.into_body()).await?;
    assert_eq!(detail["current_bed"]["id"].as_i64(), Some(second_bed));

    Ok(())
}

#[tokio::test]
async fn ending_an_assignment_twice_is_not_an_error() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let resident_id = create_resident(&app, &token, "Nour").await?;
    let bed_id = available_bed_ids(&app, &token).await?[0];

    let response = app
        .post_json(
            "/api/assignments",
            &json!({ "resident_id": resident_id, "bed_id": bed_id, "start_date": "2025-03-01" }),
            Some(&token),
        )
        .await?;
    let body = body_json(response.into_body()).await?;
    let assignment_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .post_json(
            &format!("/api/assignments/{assignment_id}/end"),
            &json!({ "end_date": "2025-06-15" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await?;
    assert_eq!(body["message"].as_str(), Some("assignment ended"));
    assert_eq!(body["data"]["end_date"].as_str(), Some("2025-06-15"));

    assert!(available_bed_ids(&app, &token).await?.contains(&bed_id));

    let response = app
        .post_json(
            &format!("/api/assignments/{assignment_id}/end"),
            &json!({ "end_date": "2025-06-16" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response.into_body()).await?;
    assert_eq!(body["message"].as_str(), Some("assignment already ended"));
    // The original end date stands.
    assert_eq!(body["data"]["end_date"].as_str(), Some("2025-06-15"));

    Ok(())
}

#[tokio::test]
async fn archived_residents_cannot_take_a_bed() -> Result<()> {
    let app = TestApp::new()?;
    app.seed_inventory()?;
    let token = app.login_token().await?;

    let resident_id = create_resident(&app, &token, "Nour").await?;
    let response = app
        .post_json(
            &format!("/api/residents/{resident_id}/status"),
            &json!({ "status": "archived" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bed_id = available_bed_ids(&app, &token).await?[0];
    let response = app
        .post_json(
            "/api/assignments",
            &json!({ "resident_id": resident_id, "bed_id": bed_id, "start_date": "2025-03-01" }),
            Some(&token),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    Ok(())
}
