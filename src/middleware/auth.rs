use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::validate_jwt;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "apikey";

/// Authenticated user extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl AuthUser {
    pub fn context(&self) -> RequestContext {
        RequestContext::user(self.user_id)
    }
}

/// Accepts requests carrying the public anonymous key (or the service key)
pub async fn require_anon_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = extract_api_key(&headers)?;
    let backend = &state.config.backend;
    if key != backend.anon_key && key != backend.service_role_key {
        tracing::warn!("Rejected request with unknown API key");
        return Err(ApiError::unauthorized("Invalid API key"));
    }
    Ok(next.run(request).await)
}

/// Accepts only the private elevated key
pub async fn require_service_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = extract_api_key(&headers)?;
    if key != state.config.backend.service_role_key {
        tracing::warn!("Rejected elevated request without the service role key");
        return Err(ApiError::forbidden("Service role key required"));
    }
    Ok(next.run(request).await)
}

/// Validates the bearer JWT and injects [`AuthUser`]
pub async fn require_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&state.config.security.jwt_secret, &token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    request.extensions_mut().insert(AuthUser { user_id: claims.sub });
    Ok(next.run(request).await)
}

fn extract_api_key(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Missing apikey header"))
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_required() {
        let mut headers = HeaderMap::new();
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_jwt_from_headers(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap_err(), "Empty JWT token");

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def");
    }

    #[test]
    fn api_key_header_must_be_present() {
        let mut headers = HeaderMap::new();
        assert!(extract_api_key(&headers).is_err());
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("anon"));
        assert_eq!(extract_api_key(&headers).unwrap(), "anon");
    }
}
