pub mod auth;
pub mod response;

pub use auth::{require_anon_key, require_service_key, require_user, AuthUser};
pub use response::ApiResponse;
