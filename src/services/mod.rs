pub mod example_service;
pub mod organization_service;

use thiserror::Error;

use crate::repositories::RepositoryError;

pub use example_service::ExampleService;
pub use organization_service::OrganizationService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
