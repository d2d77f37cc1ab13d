use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Port used when neither `BIND_ADDRESS` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 8080;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),

    #[error("Invalid REQUEST_TIMEOUT_SECONDS: {0}")]
    InvalidTimeout(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    ///
    /// `BIND_ADDRESS` takes precedence over `PORT`.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = match (vars.get("BIND_ADDRESS"), vars.get("PORT")) {
            (Some(address), _) => address.clone(),
            (None, Some(port)) => {
                let port: u16 = port
                    .parse()
                    .map_err(|e| ConfigError::InvalidPort(format!("{}: {}", port, e)))?;
                format!("0.0.0.0:{}", port)
            }
            (None, None) => format!("0.0.0.0:{}", DEFAULT_PORT),
        };

        let request_timeout_seconds = match vars.get("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => {
                let seconds: u64 = raw
                    .parse()
                    .map_err(|e| ConfigError::InvalidTimeout(format!("{}: {}", raw, e)))?;
                if seconds == 0 {
                    return Err(ConfigError::InvalidTimeout(
                        "must be greater than zero".to_string(),
                    ));
                }
                seconds
            }
            None => DEFAULT_REQUEST_TIMEOUT_SECONDS,
        };

        Ok(Config {
            bind_address,
            request_timeout_seconds,
        })
    }
}
