//! Per-entity data access.
//!
//! Each trait exposes exactly the access patterns the actions and services
//! use. Single-row lookups return `Ok(None)` when nothing matches; every
//! other storage failure becomes `RepositoryError` with the underlying
//! message attached.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::client::Privilege;
use crate::database::models::{Example, NewExample, Organization, UpdateExampleInput};
use crate::database::DatabaseError;

pub use memory::MemoryBackend;
pub use postgres::PgBackend;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    Missing { entity: &'static str, id: Uuid },

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organization>>;

    async fn find_by_owner(&self, owner_id: Uuid) -> RepositoryResult<Option<Organization>>;

    async fn create(&self, owner_id: Uuid, name: &str) -> RepositoryResult<Organization>;

    async fn rename(&self, id: Uuid, name: &str) -> RepositoryResult<Organization>;
}

#[async_trait]
pub trait ExampleRepository: Send + Sync {
    /// Active examples of an organization, newest first
    async fn list_active(&self, organization_id: Uuid) -> RepositoryResult<Vec<Example>>;

    /// Includes soft-deleted rows
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Example>>;

    async fn insert(&self, new: &NewExample) -> RepositoryResult<Example>;

    async fn update(&self, id: Uuid, input: &UpdateExampleInput) -> RepositoryResult<Example>;

    /// Soft delete: flips `is_active` and returns the row
    async fn deactivate(&self, id: Uuid) -> RepositoryResult<Example>;
}

/// Source of repositories bound to a privilege level.
pub trait Backend: Send + Sync {
    fn organizations(&self, privilege: Privilege) -> Arc<dyn OrganizationRepository>;

    fn examples(&self, privilege: Privilege) -> Arc<dyn ExampleRepository>;
}
