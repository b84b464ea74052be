pub mod client;
pub mod manager;
pub mod models;

pub use client::{DataClient, Privilege};
pub use manager::{DatabaseError, DatabaseManager};
