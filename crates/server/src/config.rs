//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NOVAMART_DATABASE_URL` - `PostgreSQL` connection string
//!   (falls back to the generic `DATABASE_URL`)
//!
//! ## Optional
//! - `NOVAMART_HOST` - Bind address (default: 127.0.0.1)
//! - `NOVAMART_PORT` - Listen port (default: 5000)
//! - `NOVAMART_CORS_ORIGIN` - Allowed browser origin (default: <http://localhost:5173>)
//! - `NOVAMART_UPLOADS_DIR` - Directory served at `/uploads` (default: uploads)
//! - `NOVAMART_TOKEN_TTL_DAYS` - Bearer token lifetime in days (default: 7)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Default bearer token lifetime, matching the original 7-day credential.
const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Marketplace server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Browser origin allowed by CORS
    pub cors_origin: String,
    /// Directory of uploaded product images, served at `/uploads`
    pub uploads_dir: String,
    /// Bearer token lifetime in days
    pub token_ttl_days: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("NOVAMART_DATABASE_URL")?;
        let host = get_env_or_default("NOVAMART_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("NOVAMART_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("NOVAMART_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("NOVAMART_PORT".to_string(), e.to_string()))?;
        let cors_origin = get_env_or_default("NOVAMART_CORS_ORIGIN", "http://localhost:5173");
        let uploads_dir = get_env_or_default("NOVAMART_UPLOADS_DIR", "uploads");
        let token_ttl_days = get_env_or_default(
            "NOVAMART_TOKEN_TTL_DAYS",
            &DEFAULT_TOKEN_TTL_DAYS.to_string(),
        )
        .parse::<i64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("NOVAMART_TOKEN_TTL_DAYS".to_string(), e.to_string())
        })?;

        if token_ttl_days < 1 {
            return Err(ConfigError::InvalidEnvVar(
                "NOVAMART_TOKEN_TTL_DAYS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            cors_origin,
            uploads_dir,
            token_ttl_days,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            cors_origin: "http://localhost:5173".to_string(),
            uploads_dir: "uploads".to_string(),
            token_ttl_days: 7,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_get_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("NOVAMART_DOES_NOT_EXIST", "fallback"),
            "fallback"
        );
    }
}
