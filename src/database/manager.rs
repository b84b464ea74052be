use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid role name: {0}")]
    InvalidRoleName(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the lazily created connection pool to the application database.
///
/// Cloning is cheap; all clones share the same pool once it exists.
#[derive(Clone)]
pub struct DatabaseManager {
    connection_string: String,
    settings: DatabaseConfig,
    pool: Arc<OnceCell<PgPool>>,
}

impl DatabaseManager {
    pub fn new(connection_string: impl Into<String>, settings: DatabaseConfig) -> Result<Self, DatabaseError> {
        let connection_string = connection_string.into();
        Self::validate_connection_string(&connection_string)?;
        if !Self::is_valid_role_name(&settings.rls_role) {
            return Err(DatabaseError::InvalidRoleName(settings.rls_role.clone()));
        }

        Ok(Self {
            connection_string,
            settings,
            pool: Arc::new(OnceCell::new()),
        })
    }

    /// Build from `DATABASE_URL`
    pub fn from_env(settings: DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        Self::new(url, settings)
    }

    /// Get the pool, connecting on first use
    pub async fn pool(&self) -> Result<PgPool, DatabaseError> {
        let pool = self
            .pool
            .get_or_try_init(|| async {
                let pool = PgPoolOptions::new()
                    .max_connections(self.settings.max_connections)
                    .acquire_timeout(Duration::from_secs(self.settings.connection_timeout))
                    .connect(&self.connection_string)
                    .await?;
                info!("Created database pool ({} max connections)", self.settings.max_connections);
                Ok::<_, DatabaseError>(pool)
            })
            .await?;
        Ok(pool.clone())
    }

    pub fn rls_role(&self) -> &str {
        &self.settings.rls_role
    }

    /// Pings the database to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool if it was ever opened (e.g., on shutdown)
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }

    fn validate_connection_string(connection_string: &str) -> Result<(), DatabaseError> {
        let url = url::Url::parse(connection_string).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Role names are interpolated into `SET LOCAL ROLE`, so only [a-z0-9_] is accepted.
    fn is_valid_role_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }
}
