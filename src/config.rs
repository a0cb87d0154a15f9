// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local use.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base path of the public demo API the console manages.
pub const DEFAULT_API_URL: &str = "https://reqres.in/api";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const SESSION_FILE_NAME: &str = "session.json";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote API base path (no trailing slash)
    pub api_url: String,
    /// Value for the `x-api-key` header, if the API wants one
    pub api_key: Option<String>,
    /// File holding the persisted session token
    pub session_file: PathBuf,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// How long `is_loading` stays set after a list request completes
    pub loading_delay: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8080/api".to_string(),
            api_key: None,
            session_file: env::temp_dir().join("employwise-test").join(SESSION_FILE_NAME),
            request_timeout: Duration::from_secs(5),
            loading_delay: Duration::ZERO,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("EMPLOYWISE_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let api_key = env::var("EMPLOYWISE_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let session_file = match env::var("EMPLOYWISE_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_file()?,
        };

        let request_timeout = Duration::from_secs(parse_u64(
            "EMPLOYWISE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?);
        let loading_delay = Duration::from_millis(parse_u64("EMPLOYWISE_LOADING_DELAY_MS", 0)?);

        Ok(Self {
            api_url,
            api_key,
            session_file,
            request_timeout,
            loading_delay,
        })
    }
}

/// `<config dir>/employwise/session.json`
fn default_session_file() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::Missing("EMPLOYWISE_SESSION_FILE"))?;
    Ok(base.join("employwise").join(SESSION_FILE_NAME))
}

fn parse_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
