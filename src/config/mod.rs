use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub domain: DomainConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    Postgres,
    Memory,
}

/// The three values every deployment must provide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Public base URL of the API (links, CORS origin)
    pub api_url: String,
    /// Public anonymous key, sent by browser-side callers in the `apikey` header
    pub anon_key: String,
    /// Private elevated key, only known to trusted server-side callers
    #[serde(skip_serializing)]
    pub service_role_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub storage: StorageKind,
    pub max_connections: u32,
    pub connection_timeout: u64,
    /// Role assumed by user-scoped sessions so row-level policies apply
    pub rls_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    pub markup_factor: Decimal,
}

impl AppConfig {
    /// Load profile defaults for `APP_ENV`, apply overrides and require the backend keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let backend = BackendConfig {
            api_url: required("APP_API_URL")?,
            anon_key: required("APP_ANON_KEY")?,
            service_role_key: required("APP_SERVICE_ROLE_KEY")?,
        };

        let config = match environment {
            Environment::Production => Self::production(backend),
            Environment::Staging => Self::staging(backend),
            Environment::Development => Self::development(backend),
        }
        .with_env_overrides()?;

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = env::var("APP_STORAGE") {
            self.database.storage = match v.as_str() {
                "memory" => StorageKind::Memory,
                "postgres" => StorageKind::Postgres,
                other => {
                    return Err(ConfigError::Invalid {
                        name: "APP_STORAGE",
                        reason: format!("expected 'postgres' or 'memory', got '{}'", other),
                    })
                }
            };
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RLS_ROLE") {
            self.database.rls_role = v;
        }

        if let Ok(v) = env::var("APP_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        if let Ok(v) = env::var("APP_MARKUP_FACTOR") {
            self.domain.markup_factor = Decimal::from_str(&v).map_err(|e| ConfigError::Invalid {
                name: "APP_MARKUP_FACTOR",
                reason: e.to_string(),
            })?;
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.backend.api_url).map_err(|e| ConfigError::Invalid {
            name: "APP_API_URL",
            reason: e.to_string(),
        })?;

        if self.domain.markup_factor <= Decimal::ZERO {
            return Err(ConfigError::Invalid {
                name: "APP_MARKUP_FACTOR",
                reason: "must be positive".to_string(),
            });
        }

        if self.environment != Environment::Development && self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("APP_JWT_SECRET"));
        }

        Ok(())
    }

    pub fn development(backend: BackendConfig) -> Self {
        Self {
            environment: Environment::Development,
            backend,
            database: DatabaseConfig {
                storage: StorageKind::Postgres,
                max_connections: 10,
                connection_timeout: 30,
                rls_role: "authenticated".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: "development-secret".to_string(),
                enable_cors: true,
            },
            domain: DomainConfig::default(),
        }
    }

    fn staging(backend: BackendConfig) -> Self {
        Self {
            environment: Environment::Staging,
            backend,
            database: DatabaseConfig {
                storage: StorageKind::Postgres,
                max_connections: 20,
                connection_timeout: 10,
                rls_role: "authenticated".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                enable_cors: true,
            },
            domain: DomainConfig::default(),
        }
    }

    fn production(backend: BackendConfig) -> Self {
        Self {
            environment: Environment::Production,
            backend,
            database: DatabaseConfig {
                storage: StorageKind::Postgres,
                max_connections: 50,
                connection_timeout: 5,
                rls_role: "authenticated".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                enable_cors: false,
            },
            domain: DomainConfig::default(),
        }
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        // 1.1
        Self { markup_factor: Decimal::new(11, 1) }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

// Read once per process, after the binary has loaded `.env`
static CONFIG: Lazy<Result<AppConfig, String>> =
    Lazy::new(|| AppConfig::from_env().map_err(|e| e.to_string()));

/// Process-wide config for binaries; library code receives `AppConfig` explicitly.
pub fn config() -> Result<&'static AppConfig, ConfigError> {
    CONFIG.as_ref().map_err(|reason| ConfigError::Invalid {
        name: "environment",
        reason: reason.clone(),
    })
}
