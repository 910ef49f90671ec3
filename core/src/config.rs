//! Client configuration loaded from the environment.

use std::time::Duration;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "TICKETLINE_BASE_URL";
pub const TOKEN_VAR: &str = "TICKETLINE_TOKEN";
pub const TIMEOUT_VAR: &str = "TICKETLINE_TIMEOUT_MS";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let base_url = var(BASE_URL_VAR).ok_or(ConfigError::Missing(BASE_URL_VAR))?;
        let bearer_token = var(TOKEN_VAR);
        let timeout = match var(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid {
                    name: TIMEOUT_VAR,
                    expected: "an integer number of milliseconds",
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url,
            bearer_token,
            timeout,
        })
    }
}
