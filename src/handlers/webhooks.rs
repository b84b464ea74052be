use axum::{extract::State, response::Response, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::services::OrganizationService;
use crate::state::AppState;

/// Payload sent by the authentication provider after sign-up
#[derive(Debug, Deserialize)]
pub struct UserCreatedEvent {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// POST /webhooks/auth/user-created - give the new user an organization
pub async fn user_created(State(state): State<AppState>, Json(payload): Json<Value>) -> Result<Response, ApiError> {
    let event: UserCreatedEvent =
        serde_json::from_value(payload).map_err(|e| ApiError::bad_request(format!("Invalid event: {}", e)))?;

    let name = match event.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => OrganizationService::default_name(event.email.as_deref()),
    };

    tracing::info!("Received user-created event for {}", event.user_id);
    let result = state
        .actions
        .provision_organization(&RequestContext::service(), event.user_id, &name)
        .await;
    Ok(result.into_response())
}
