use std::env;

use log::{info, warn};
use thiserror::Error;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "dhanlaxmi-saree-sadan";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSecret,

    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),
}

/// Process settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub mongodb_uri: String,
    pub mongodb_uri_set: bool,
    pub database: String,
    pub nextauth_url: Option<String>,
    pub api_base_url: Option<String>,
    pub environment: String,
    pub port: u16,
    pub hostname: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::MissingSecret)?;

        let mongodb_uri = get("MONGODB_URI");
        let mongodb_uri_set = mongodb_uri.is_some();
        let mongodb_uri = mongodb_uri.unwrap_or_else(|| {
            warn!("MONGODB_URI not set, using default: {DEFAULT_MONGODB_URI}");
            DEFAULT_MONGODB_URI.to_string()
        });

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => {
                info!("PORT not set, using default: 3000");
                3000
            }
        };

        Ok(Config {
            jwt_secret,
            mongodb_uri,
            mongodb_uri_set,
            database: get("MONGODB_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            nextauth_url: get("NEXTAUTH_URL"),
            api_base_url: get("API_BASE_URL"),
            environment: get("NODE_ENV").unwrap_or_else(|| "development".to_string()),
            port,
            hostname: get("HOSTNAME").unwrap_or_else(|| "0.0.0.0".to_string()),
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.hostname.clone(), self.port)
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some("test-secret-for-session-tokens".to_string()),
        "NODE_ENV" => Some("test".to_string()),
        _ => None,
    })
    .unwrap()
}
