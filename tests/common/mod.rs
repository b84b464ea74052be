#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use scaffold_api::auth::{generate_jwt, Claims};
use scaffold_api::config::{AppConfig, BackendConfig, StorageKind};
use scaffold_api::handlers;
use scaffold_api::repositories::MemoryBackend;
use scaffold_api::{AppState, RequestContext};

pub const ANON_KEY: &str = "test-anon-key";
pub const SERVICE_KEY: &str = "test-service-key";

/// In-process app over the in-memory backend; requests go through the real router.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development(BackendConfig {
            api_url: "http://localhost:3000".to_string(),
            anon_key: ANON_KEY.to_string(),
            service_role_key: SERVICE_KEY.to_string(),
        });
        config.database.storage = StorageKind::Memory;

        let state = AppState::with_backend(config, Arc::new(MemoryBackend::new()), None);
        let router = handlers::router(state.clone());
        Self { state, router }
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        generate_jwt(&self.state.config.security.jwt_secret, &Claims::new(user_id, 1)).unwrap()
    }

    /// Registers a user through the webhook and returns their id and organization id.
    pub async fn register_user(&self, name: &str) -> Result<(Uuid, Uuid)> {
        let user_id = Uuid::new_v4();
        let request = Request::post("/webhooks/auth/user-created")
            .header("apikey", SERVICE_KEY)
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "user_id": user_id, "name": name }).to_string(),
            ))?;
        let (status, body) = self.send_json(request).await?;
        anyhow::ensure!(status == StatusCode::OK, "registration failed: {}", body);

        let org_id = body["data"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| anyhow::anyhow!("missing organization id: {}", body))?;
        Ok((user_id, org_id))
    }

    pub fn user_context(&self, user_id: Uuid) -> RequestContext {
        RequestContext::user(user_id)
    }

    pub async fn send(&self, request: Request<Body>) -> Result<(StatusCode, String)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        Ok((status, String::from_utf8(bytes.to_vec())?))
    }

    pub async fn send_json(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let (status, body) = self.send(request).await?;
        Ok((status, serde_json::from_str(&body)?))
    }
}
