//! Application configuration module
//!
//! Typed settings for the sync core, read from the environment with the
//! `config` crate. A `.env` file is honoured for local runs.
//!
//! # Example
//!
//! ```no_run
//! use thesis_sync::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Syncing against {}", config.api.base_url);
//! ```

mod api;
mod connectivity;
mod error;
mod storage;
mod telemetry;

pub use api::ApiConfig;
pub use connectivity::ConnectivityConfig;
pub use error::{ConfigError, ValidationError};
pub use storage::StorageConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

use crate::adapters::network::HttpProbeConfig;

/// Root configuration of the sync core
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Remote API (base URL, timeout, user agent)
    pub api: ApiConfig,

    /// Local cache and session file locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reachability probe
    #[serde(default)]
    pub connectivity: ConnectivityConfig,

    /// Log filter and format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Reads `THESIS_SYNC__*` variables, after merging a `.env` file when one
    /// exists.
    ///
    /// Sections nest on `__`, so `THESIS_SYNC__API__BASE_URL` fills
    /// `api.base_url`. Numbers and booleans are parsed from their text.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("THESIS_SYNC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks every section; the first invalid value wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.storage.validate()?;
        self.connectivity.validate()?;
        Ok(())
    }

    /// Reachability probe settings.
    pub fn probe(&self) -> HttpProbeConfig {
        self.connectivity.probe(&self.api.base_url)
    }
}
