// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Invalid values that would break startup are errors; tunables fall back to defaults

use std::env;
use std::num::ParseIntError;
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

use planforge_config::{constants, env_or, env_parse, env_secret};

pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_REQUEST_DEADLINE_SECS: u64 = 180;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid request deadline: must be at least one second")]
    InvalidDeadline,
    #[error("Invalid CORS origin {0:?}: expected an http(s) origin")]
    InvalidCorsOrigin(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub cors_origin: HeaderValue,
    pub database_url: String,
    pub db_max_connections: u32,
    pub request_deadline: Duration,
    pub dev_user: Option<String>,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var(constants::PORT) {
            Ok(raw) => raw.trim().parse::<u16>()?,
            Err(_) => DEFAULT_PORT,
        };

        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let deadline_secs = env_parse(
            constants::PLANFORGE_REQUEST_DEADLINE_SECS,
            DEFAULT_REQUEST_DEADLINE_SECS,
        );
        if deadline_secs == 0 {
            return Err(ConfigError::InvalidDeadline);
        }

        let cors_origin =
            parse_cors_origin(&env_or(constants::CORS_ORIGIN, DEFAULT_CORS_ORIGIN))?;

        Ok(Config {
            port,
            host: env_or(constants::PLANFORGE_HOST, DEFAULT_HOST),
            cors_origin,
            database_url: env_or(constants::PLANFORGE_DATABASE_URL, &default_database_url()),
            db_max_connections: env_parse(
                constants::PLANFORGE_DB_MAX_CONNECTIONS,
                DEFAULT_DB_MAX_CONNECTIONS,
            ),
            request_deadline: Duration::from_secs(deadline_secs),
            dev_user: env_secret(constants::PLANFORGE_DEV_USER),
            session_ttl_hours: env_parse(
                constants::PLANFORGE_SESSION_TTL_HOURS,
                DEFAULT_SESSION_TTL_HOURS,
            ),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_database_url() -> String {
    format!("sqlite://{}", planforge_core::database_file().display())
}

/// Credentialed CORS needs one exact origin; wildcards and malformed values are rejected
pub fn parse_cors_origin(raw: &str) -> Result<HeaderValue, ConfigError> {
    let invalid = || ConfigError::InvalidCorsOrigin(raw.to_string());
    let origin = raw.trim().trim_end_matches('/');
    let host = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .ok_or_else(invalid)?;
    if host.is_empty() || host.contains(['*', '/']) {
        return Err(invalid());
    }
    HeaderValue::from_str(origin).map_err(|_| invalid())
}
