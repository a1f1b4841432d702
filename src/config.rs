//! Server configuration, resolved from environment variables.

use std::net::{AddrParseError, SocketAddr};
use thiserror::Error;

pub const ADDR_ENV: &str = "USER_DIRECTORY_ADDR";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "user_directory=info,tower_http=info";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {var} value `{value}`: {source}")]
    InvalidAddr {
        var: &'static str,
        value: String,
        source: AddrParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let Some(value) = lookup(ADDR_ENV) else {
            return Ok(Self::default());
        };

        let bind_addr = value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                var: ADDR_ENV,
                value: value.clone(),
                source,
            })?;

        Ok(Self { bind_addr })
    }
}
