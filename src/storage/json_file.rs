use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::shared::AppError;

/// File-backed implementation of KeyValueStore. Each key maps to one
/// `<key>.json` file under the data directory, written whole on every
/// save. Missing or unparseable files load as absent so a corrupt
/// document degrades to an empty collection instead of a crash.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::Storage(format!("creating data dir {:?}: {}", dir, e)))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<Value>, AppError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, "No persisted document");
                return Ok(None);
            }
            Err(e) => {
                return Err(AppError::Storage(format!("reading {:?}: {}", path, e)));
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Persisted document is corrupt, treating as absent");
                Ok(None)
            }
        }
    }

    async fn save(&self, key: &str, value: Value) -> Result<(), AppError> {
        let path = self.path_for(key);
        let bytes = serde_json::to_vec_pretty(&value)
            .map_err(|e| AppError::Storage(format!("serializing {}: {}", key, e)))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("writing {:?}: {}", path, e)))?;
        debug!(key = %key, "Document saved");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("removing {:?}: {}", path, e))),
        }
    }
}
