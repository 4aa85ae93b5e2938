//! Network Monitor Adapters
//!
//! - **HttpProbeNetwork** - Polls the API with `HEAD` requests
//! - **ManualNetwork** - Reachability set by the host (testing, platform bridges)

mod http_probe;
mod manual;

pub use http_probe::{HttpProbeConfig, HttpProbeNetwork};
pub use manual::ManualNetwork;
