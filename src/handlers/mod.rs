//! HTTP surface: only externally initiated calls (webhooks) and file
//! downloads. Internal mutations go through [`crate::actions`] in process.

pub mod downloads;
pub mod system;
pub mod webhooks;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{require_anon_key, require_service_key, require_user};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = if state.config.security.enable_cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Public
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(webhook_routes(state.clone()))
        .merge(download_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn webhook_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/webhooks/auth/user-created", post(webhooks::user_created))
        .route_layer(middleware::from_fn_with_state(state, require_service_key))
}

fn download_routes(state: AppState) -> Router<AppState> {
    // layers run outside-in: api key first, then the bearer token
    Router::new()
        .route("/downloads/examples.csv", get(downloads::examples_csv))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user))
        .route_layer(middleware::from_fn_with_state(state, require_anon_key))
}
