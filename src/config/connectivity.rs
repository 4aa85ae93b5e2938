//! Connectivity probe configuration

use serde::Deserialize;
use std::time::Duration;

use super::api::is_http_url;
use super::error::ValidationError;
use crate::adapters::network::HttpProbeConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityConfig {
    /// URL probed with `HEAD`; the API base URL when unset
    pub probe_url: Option<String>,

    #[serde(default = "default_probe_interval")]
    pub probe_interval_secs: u64,
}

impl ConnectivityConfig {
    /// Probe settings, falling back to `api_base_url`.
    pub fn probe(&self, api_base_url: &str) -> HttpProbeConfig {
        let url = self.probe_url.as_deref().unwrap_or(api_base_url);
        HttpProbeConfig::new(url).with_interval(Duration::from_secs(self.probe_interval_secs))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.probe_interval_secs == 0 {
            return Err(ValidationError::InvalidProbeInterval);
        }
        match &self.probe_url {
            Some(url) if !is_http_url(url) => Err(ValidationError::InvalidProbeUrl),
            _ => Ok(()),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_url: None,
            probe_interval_secs: default_probe_interval(),
        }
    }
}

fn default_probe_interval() -> u64 {
    10
}
