//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `CARTWHEEL_API_URL` - Storefront API root (default: `http://localhost:5000`)
//! - `CARTWHEEL_STATE_PATH` - Saved cart/wishlist/session file (default: `.cartwheel/state.json`)
//! - `CARTWHEEL_TIMEOUT_SECS` - Per-request timeout (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_STATE_PATH: &str = ".cartwheel/state.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Storefront API root
    pub api_url: Url,
    /// Where the session token, cart and wishlist are persisted
    pub state_path: PathBuf,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api_url = env_or("CARTWHEEL_API_URL", DEFAULT_API_URL);
        let api_url = Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CARTWHEEL_API_URL", e.to_string()))?;

        let state_path = PathBuf::from(env_or("CARTWHEEL_STATE_PATH", DEFAULT_STATE_PATH));

        let timeout = match std::env::var("CARTWHEEL_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("CARTWHEEL_TIMEOUT_SECS", e.to_string())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            state_path,
            timeout: Duration::from_secs(timeout),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
