//! Runtime configuration read from the environment

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

pub const API_URL_VAR: &str = "LEDGER_API_URL";
pub const API_TOKEN_VAR: &str = "LEDGER_API_TOKEN";
pub const TIMEOUT_VAR: &str = "LEDGER_HTTP_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
    #[error("{var} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote service root. `None` means the in-memory service is used.
    pub api_url: Option<Url>,
    pub api_token: Option<String>,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load from the process environment (after `.env` has been applied)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get(API_URL_VAR)
            .map(|raw| {
                Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
                    var: API_URL_VAR,
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let timeout = get(TIMEOUT_VAR)
            .map(|raw| match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout {
                    var: TIMEOUT_VAR,
                    value: raw,
                }),
            })
            .transpose()?;

        Ok(Self {
            api_url,
            api_token: get(API_TOKEN_VAR),
            timeout,
        })
    }
}
