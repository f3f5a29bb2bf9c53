use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub table_name: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout: u64,
    /// Deadline for a single backend call.
    pub operation_timeout_ms: u64,
    /// Upper bound on items returned by one scan call.
    pub scan_page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// JSON Web Key Set used to verify bearer token signatures.
    pub jwks_url: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Deadline for fetching the key set at startup.
    pub jwks_timeout_ms: u64,
    /// Read group claims without checking the signature. Never enable
    /// outside local development.
    pub allow_unverified_tokens: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JWKS URL '{0}'")]
    InvalidJwksUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("ARTICLES_TABLE") {
            self.database.table_name = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_OPERATION_TIMEOUT_MS") {
            self.database.operation_timeout_ms = v.parse().unwrap_or(self.database.operation_timeout_ms);
        }
        if let Ok(v) = env::var("DATABASE_SCAN_PAGE_SIZE") {
            self.database.scan_page_size = v.parse().unwrap_or(self.database.scan_page_size);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("AUTH_JWKS_URL") {
            self.security.jwks_url = non_empty(v);
        }
        if let Ok(v) = env::var("AUTH_ISSUER") {
            self.security.issuer = non_empty(v);
        }
        if let Ok(v) = env::var("AUTH_AUDIENCE") {
            self.security.audience = non_empty(v);
        }
        if let Ok(v) = env::var("AUTH_JWKS_TIMEOUT_MS") {
            self.security.jwks_timeout_ms = v.parse().unwrap_or(self.security.jwks_timeout_ms);
        }
        if let Ok(v) = env::var("AUTH_ALLOW_UNVERIFIED_TOKENS") {
            self.security.allow_unverified_tokens = v.parse().unwrap_or(self.security.allow_unverified_tokens);
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(jwks_url) = &self.security.jwks_url {
            url::Url::parse(jwks_url).map_err(|_| ConfigError::InvalidJwksUrl(jwks_url.clone()))?;
        }
        if self.database.scan_page_size == 0 {
            return Err(ConfigError::Zero("DATABASE_SCAN_PAGE_SIZE"));
        }
        if self.database.operation_timeout_ms == 0 {
            return Err(ConfigError::Zero("DATABASE_OPERATION_TIMEOUT_MS"));
        }
        if self.security.jwks_timeout_ms == 0 {
            return Err(ConfigError::Zero("AUTH_JWKS_TIMEOUT_MS"));
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                table_name: "articles".to_string(),
                max_connections: 10,
                connection_timeout: 30,
                operation_timeout_ms: 10_000,
                scan_page_size: 100,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                jwks_url: None,
                issuer: None,
                audience: None,
                jwks_timeout_ms: 5_000,
                allow_unverified_tokens: false,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                table_name: "articles".to_string(),
                max_connections: 20,
                connection_timeout: 10,
                operation_timeout_ms: 5_000,
                scan_page_size: 500,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                jwks_url: None,
                issuer: None,
                audience: None,
                jwks_timeout_ms: 5_000,
                allow_unverified_tokens: false,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                table_name: "articles".to_string(),
                max_connections: 50,
                connection_timeout: 5,
                operation_timeout_ms: 3_000,
                scan_page_size: 1000,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                jwks_url: None,
                issuer: None,
                audience: None,
                jwks_timeout_ms: 5_000,
                allow_unverified_tokens: false,
            },
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
