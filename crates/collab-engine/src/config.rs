//! Engine configuration.
//!
//! Loads configuration from environment variables, with defaults suitable
//! for production use.

use std::env;
use std::time::Duration;

/// Sync engine configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// How long an inbound typing observation stays live, in milliseconds
    pub typing_ttl_ms: u64,
    /// Page size used when a query requests size 0
    pub default_page_size: u32,
    /// Upper bound applied to requested page sizes and recent-feed limits
    pub max_page_size: u32,
    /// Capacity of the inbound recent-message feed
    pub recent_capacity: usize,
}

// Default value functions
fn default_typing_ttl_ms() -> u64 {
    3000
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_recent_capacity() -> usize {
    50
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            typing_ttl_ms: default_typing_ttl_ms(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            recent_capacity: default_recent_capacity(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset or unparsable values fall back to
    /// the defaults. Cross-field consistency is still checked.
    ///
    /// # Errors
    /// Returns an error if the resulting configuration is inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            typing_ttl_ms: env::var("COLLAB_TYPING_TTL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_typing_ttl_ms),
            default_page_size: env::var("COLLAB_DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_page_size),
            max_page_size: env::var("COLLAB_MAX_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_page_size),
            recent_capacity: env::var("COLLAB_RECENT_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_recent_capacity),
        };

        config.validate()?;
        Ok(config)
    }

    /// Typing TTL as a [`Duration`]
    #[must_use]
    pub fn typing_ttl(&self) -> Duration {
        Duration::from_millis(self.typing_ttl_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.typing_ttl_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "COLLAB_TYPING_TTL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::InvalidValue(
                "COLLAB_DEFAULT_PAGE_SIZE",
                format!("must be in 1..={}", self.max_page_size),
            ));
        }
        if self.recent_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "COLLAB_RECENT_CAPACITY",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
