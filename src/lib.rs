pub mod actions;
pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repositories;
pub mod services;
pub mod state;
pub mod validation;

pub use actions::{ActionResult, Actions};
pub use context::RequestContext;
pub use state::AppState;
