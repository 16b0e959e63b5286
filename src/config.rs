//! Server configuration read from the environment.

use log::warn;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 5;
const MIN_SECRET_LEN: usize = 32;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("MOVIE_RATINGS_SECRET must be at least 32 bytes, got {0}")]
    SecretTooShort(usize),
    #[error("invalid MOVIE_RATINGS_API_TIMEOUT_SECS: {0:?}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub api_url: String,
    pub secret: Vec<u8>,
    pub api_timeout: Duration,
}

impl Config {
    /// Optional variables:
    /// - `MOVIE_RATINGS_BIND`: listen address
    /// - `MOVIE_RATINGS_API_URL`: backend base URL
    /// - `MOVIE_RATINGS_SECRET`: identity cookie key, 32 bytes or more
    /// - `MOVIE_RATINGS_API_TIMEOUT_SECS`: backend request timeout
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup("MOVIE_RATINGS_BIND").unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let api_url = lookup("MOVIE_RATINGS_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let secret = match lookup("MOVIE_RATINGS_SECRET") {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(ConfigError::SecretTooShort(secret.len()))
            }
            Some(secret) => secret.into_bytes(),
            None => {
                warn!("MOVIE_RATINGS_SECRET not set, using development key");
                vec![0u8; MIN_SECRET_LEN]
            }
        };

        let api_timeout = match lookup("MOVIE_RATINGS_API_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        };

        Ok(Config {
            bind,
            api_url,
            secret,
            api_timeout,
        })
    }
}
