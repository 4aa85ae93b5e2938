//! Storage Adapters
//!
//! Implementations of the `EntityCache` and `KeyValueStore` ports.
//!
//! ## Available Adapters
//!
//! - **FileEntityCache** - One JSON table per entity kind on disk
//! - **InMemoryEntityCache** - Entity table in memory (testing/development)
//! - **FileKeyValueStore** - Durable session storage as a JSON object
//! - **InMemoryKeyValueStore** - Volatile session storage (testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileEntityCache, FileKeyValueStore};
//!
//! let theses: FileEntityCache<Thesis> = FileEntityCache::new("./data/cache");
//! let session = FileKeyValueStore::new("./data/session.json");
//! ```

mod file_entity_cache;
mod file_key_value_store;
mod in_memory_entity_cache;
mod in_memory_key_value_store;

pub use file_entity_cache::FileEntityCache;
pub use file_key_value_store::FileKeyValueStore;
pub use in_memory_entity_cache::InMemoryEntityCache;
pub use in_memory_key_value_store::InMemoryKeyValueStore;

use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::foundation::CacheError;

/// Replaces `path` with `bytes` via a synced temp file and a rename.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp, path).await?;
    Ok(())
}
