mod common;

use anyhow::Result;
use axum::{body::Body, http::Request, http::StatusCode};
use serde_json::json;
use uuid::Uuid;

fn user_created(key: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post("/webhooks/auth/user-created")
        .header("apikey", key)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn requires_the_service_role_key() -> Result<()> {
    let app = common::TestApp::new();
    let payload = json!({ "user_id": Uuid::new_v4(), "email": "ana@example.com" });

    let (status, body) = app.send_json(user_created(common::ANON_KEY, payload.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let request = Request::post("/webhooks/auth/user-created")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))?;
    let (status, _) = app.send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn provisions_one_organization_per_user() -> Result<()> {
    let app = common::TestApp::new();
    let user_id = Uuid::new_v4();
    let payload = json!({ "user_id": user_id, "email": "ana@example.com" });

    let (status, first) = app.send_json(user_created(common::SERVICE_KEY, payload.clone())).await?;
    assert_eq!(status, StatusCode::OK, "{}", first);
    assert_eq!(first["success"], true);
    assert_eq!(first["data"]["owner_id"], user_id.to_string());
    assert!(first["data"]["name"].as_str().unwrap().contains("ana"));

    // redelivered events land on the same organization
    let (status, second) = app.send_json(user_created(common::SERVICE_KEY, payload)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["id"], first["data"]["id"]);
    Ok(())
}

#[tokio::test]
async fn explicit_name_wins_over_email() -> Result<()> {
    let app = common::TestApp::new();
    let payload = json!({ "user_id": Uuid::new_v4(), "email": "ana@example.com", "name": "  Acme  " });

    let (_, body) = app.send_json(user_created(common::SERVICE_KEY, payload)).await?;
    assert_eq!(body["data"]["name"], "Acme");
    Ok(())
}

#[tokio::test]
async fn malformed_events_are_rejected() -> Result<()> {
    let app = common::TestApp::new();

    let (status, body) = app
        .send_json(user_created(common::SERVICE_KEY, json!({ "user_id": "not-a-uuid" })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
