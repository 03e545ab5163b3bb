mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{body_to_vec, TestApp, ADMIN_USERNAME};
use serde::Deserialize;
use serde_json::json;

#[tokio::test]
async fn login_rejects_bad_credentials() -> Result<()> {
    let app = TestApp::new()?;

    let response = app
        .post_json(
            "/api/auth/login",
            &json!({ "username": ADMIN_USERNAME, "password": "wrong" }),
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_json(
            "/api/auth/login",
            &json!({ "username": "someone-else", "password": "admin123" }),
            None,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn ledger_routes_require_a_token() -> Result<()> {
    let app = TestApp::new()?;

    let response = app.get("/api/residents", None).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.get("/api/reports/statistics", Some("not-a-token")).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Health stays open.
    let response = app.get("/api/health", None).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn login_issues_a_usable_token() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.login_token().await?;

    let response = app.get("/api/auth/me", Some(&token)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    #[derive(Deserialize)]
    struct Me {
        username: String,
    }
    let body = body_to_vec(response.into_body()).await?;
    let me: Me = serde_json::from_slice(&body)?;
    assert_eq!(me.username, ADMIN_USERNAME);

    Ok(())
}
