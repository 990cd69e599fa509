//! Service configuration
//!
//! Loaded from built-in defaults overridden by `TRACKER_*` environment
//! variables, e.g. `TRACKER_BIND_ADDRESS=127.0.0.1:9000`. Database settings
//! come from `common::database::DatabaseConfig`.

use anyhow::Result;
use ::config::{Config, Environment};
use serde::Deserialize;

/// Secret used when none is configured; only fit for local development
pub const DEV_JWT_SECRET: &str = "bug-tracker-development-secret";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_level: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session lifetime in seconds
    pub session_ttl_seconds: u64,
    /// Insert demo users and bugs into an empty database at startup
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .set_default("bind_address", "0.0.0.0:8080")?
            .set_default("log_level", "info")?
            .set_default("jwt_secret", DEV_JWT_SECRET)?
            .set_default("session_ttl_seconds", 28_800_i64)?
            .set_default("seed_demo_data", false)?
            .add_source(Environment::with_prefix("TRACKER").try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        if config.session_ttl_seconds == 0 {
            anyhow::bail!("TRACKER_SESSION_TTL_SECONDS must be greater than zero");
        }
        Ok(config)
    }

    /// Whether sessions would be signed with the published development secret
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
