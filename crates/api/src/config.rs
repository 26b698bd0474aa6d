//! Process configuration, read once at startup.
//!
//! Constructing [`AppConfig`] performs the fatal signing checks: a process
//! that fails here never starts serving, so configuration errors cannot
//! degrade individual requests.

use thiserror::Error;

use signet_auth::{ConfigError, TokenConfig};

pub const ENV_SECRET: &str = "SIGNET_SECRET";
pub const ENV_ISSUER: &str = "SIGNET_ISSUER";
pub const ENV_AUDIENCE: &str = "SIGNET_AUDIENCE";
pub const ENV_EXPIRATION_HOURS: &str = "SIGNET_EXPIRATION_HOURS";
pub const ENV_BIND_ADDR: &str = "SIGNET_BIND_ADDR";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a whole number of hours, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error(transparent)]
    Token(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: TokenConfig,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppConfigError> {
        let secret = require(ENV_SECRET)?;
        let issuer = require(ENV_ISSUER)?;
        let audience = require(ENV_AUDIENCE)?;

        let hours_raw = require(ENV_EXPIRATION_HOURS)?;
        let hours: i64 = hours_raw
            .parse()
            .map_err(|_| AppConfigError::InvalidNumber {
                name: ENV_EXPIRATION_HOURS,
                value: hours_raw,
            })?;

        let token = TokenConfig::new(secret.into_bytes(), issuer, audience, hours)?;
        let bind_addr =
            std::env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self { token, bind_addr })
    }
}

fn require(name: &'static str) -> Result<String, AppConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppConfigError::Missing(name)),
    }
}
