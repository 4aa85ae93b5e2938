//! HTTP probe network monitor.
//!
//! Treats the API as reachable when a `HEAD` to the probe URL gets any HTTP
//! response at all. A registered listener is a polling task that reports
//! only transitions; dropping the handle aborts the task.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::foundation::RemoteError;
use crate::ports::{ListenerHandle, NetworkMonitor, ReachabilityCallback};

/// Configuration for the HTTP probe.
#[derive(Debug, Clone)]
pub struct HttpProbeConfig {
    pub probe_url: String,
    pub interval: Duration,
    /// Per-probe timeout.
    pub timeout: Duration,
}

impl HttpProbeConfig {
    pub fn new(probe_url: impl Into<String>) -> Self {
        Self {
            probe_url: probe_url.into(),
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(3),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct HttpProbeNetwork {
    config: HttpProbeConfig,
    client: Client,
}

impl HttpProbeNetwork {
    pub fn new(config: HttpProbeConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::network(format!("failed to build probe client: {}", e)))?;
        Ok(Self { config, client })
    }

    async fn probe(client: &Client, url: &str) -> bool {
        match client.head(url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!(url, error = %e, "connectivity probe failed");
                false
            }
        }
    }
}

#[async_trait]
impl NetworkMonitor for HttpProbeNetwork {
    async fn is_reachable(&self) -> bool {
        Self::probe(&self.client, &self.config.probe_url).await
    }

    fn register(&self, callback: ReachabilityCallback) -> ListenerHandle {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("no Tokio runtime; connectivity changes will not be reported");
                return ListenerHandle::new(|| {});
            }
        };

        let client = self.client.clone();
        let url = self.config.probe_url.clone();
        let period = self.config.interval;
        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let mut last: Option<bool> = None;
            loop {
                ticker.tick().await;
                let online = Self::probe(&client, &url).await;
                if last != Some(online) {
                    last = Some(online);
                    callback(online);
                }
            }
        });

        ListenerHandle::new(move || task.abort())
    }
}
