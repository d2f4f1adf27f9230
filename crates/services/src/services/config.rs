use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Shared secret for verifying the hosted auth provider's tokens.
    pub auth_secret: String,
    /// CRM webhook endpoint; sync is disabled when unset.
    pub crm_webhook_url: Option<String>,
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidVar("PORT", raw))?,
            Err(_) => 3001,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://rackcity.db".to_string());
        let auth_secret =
            env::var("AUTH_JWT_SECRET").map_err(|_| ConfigError::MissingVar("AUTH_JWT_SECRET"))?;
        let crm_webhook_url = env::var("CRM_WEBHOOK_URL").ok().filter(|v| !v.is_empty());
        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty());

        Ok(Self {
            host,
            port,
            database_url,
            auth_secret,
            crm_webhook_url,
            cors_origin,
        })
    }
}
