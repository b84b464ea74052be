pub mod auth;
pub mod examples;
pub mod org;
