//! Application configuration loaded from environment variables.
//!
//! Configuration is read once at startup, validated, and treated as immutable
//! for the lifetime of the process.
//!
//! ## Variables
//!
//! - `DATABASE_URL` - SQLite connection string (default: `sqlite://shortlink.db?mode=rwc`)
//! - `LINK_TTL_HOURS` - Lifetime of a new link in hours (default: 24)
//! - `DEFAULT_MAX_CLICKS` - Click budget when none is given at creation (default: 3)
//! - `CLEANUP_INTERVAL_SECONDS` - Period of the background expiry sweep (default: 60)
//! - `RUST_LOG` - Log level (default: `info`)
//!
//! A `.env` file in the working directory is honored via `dotenvy`.

use anyhow::{Result, bail};
use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Lifetime of newly created links, in hours. Must be positive.
    pub ttl_hours: u32,
    /// Click budget applied when the caller does not supply one. Must be positive.
    pub default_max_clicks: u32,
    /// Period of the background expiry sweep, in seconds. Must be positive.
    pub cleanup_interval_seconds: u64,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three integer settings parses to zero.
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://shortlink.db?mode=rwc".to_string());

        let ttl_hours = env::var("LINK_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        let default_max_clicks = env::var("DEFAULT_MAX_CLICKS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let cleanup_interval_seconds = env::var("CLEANUP_INTERVAL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        if ttl_hours == 0 {
            bail!("LINK_TTL_HOURS must be positive");
        }
        if default_max_clicks == 0 {
            bail!("DEFAULT_MAX_CLICKS must be positive");
        }
        if cleanup_interval_seconds == 0 {
            bail!("CLEANUP_INTERVAL_SECONDS must be positive");
        }

        Ok(Self {
            database_url,
            ttl_hours,
            default_max_clicks,
            cleanup_interval_seconds,
            log_level,
        })
    }
}

impl Default for Config {
    /// Defaults used by tests; mirrors `from_env` with no variables set,
    /// except for an in-memory database.
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            ttl_hours: 24,
            default_max_clicks: 3,
            cleanup_interval_seconds: 60,
            log_level: "info".to_string(),
        }
    }
}
