//! Whole-document JSON file storage

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::domain::DomainError;

/// A JSON document persisted as one file
///
/// Every read-modify-write runs under a single writer lock, so concurrent
/// updates through the same store never lose each other's changes. Writes go
/// to a sibling temp file first and are renamed into place, so readers take
/// no lock and always see a whole document.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default + Send,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored document; a missing or empty file reads as the default
    pub async fn load(&self) -> Result<T, DomainError> {
        Ok(self.load_optional().await?.unwrap_or_default())
    }

    /// Stored document, `None` when nothing was written yet
    pub async fn load_optional(&self) -> Result<Option<T>, DomainError> {
        self.read().await
    }

    /// Replace the stored document
    pub async fn save(&self, value: &T) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        self.write(value).await
    }

    /// Read, mutate and write back atomically with respect to other writers
    pub async fn update<R, F>(&self, mutate: F) -> Result<R, DomainError>
    where
        F: FnOnce(&mut T) -> R + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;

        let mut value = self.read().await?.unwrap_or_default();
        let result = mutate(&mut value);
        self.write(&value).await?;

        Ok(result)
    }

    async fn read(&self) -> Result<Option<T>, DomainError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            DomainError::storage(format!("Corrupt JSON in {}: {}", self.path.display(), e))
        })
    }

    async fn write(&self, value: &T) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| DomainError::storage(format!("Failed to serialize document: {}", e)))?;

        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, bytes).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;

        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            DomainError::storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
