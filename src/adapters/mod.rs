//! Adapters - Implementations of port interfaces.
//!
//! - `network` - Connectivity monitors (manual, HTTP probe)
//! - `remote` - reqwest transport and API sources
//! - `storage` - In-memory and JSON-file caches and key/value stores

pub mod network;
pub mod remote;
pub mod storage;
