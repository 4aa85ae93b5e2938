//! Local storage configuration

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::ValidationError;

/// Where cached entities and the session live on disk
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON table per entity kind
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Session file name, relative to `data_dir`
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl StorageConfig {
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(&self.session_file)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = Path::new(&self.session_file);
        if self.session_file.trim().is_empty() || name.components().count() != 1 {
            return Err(ValidationError::InvalidSessionFile);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session_file: default_session_file(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_session_file() -> String {
    "session.json".to_string()
}
