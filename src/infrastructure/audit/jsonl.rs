use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::DomainError;
use crate::domain::audit::{AuditLog, ClassificationLogEntry};

/// Audit log stored as one JSON object per line
///
/// Appends never rewrite earlier lines. Blank lines are skipped on read.
#[derive(Debug)]
pub struct JsonlAuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }
        Ok(())
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> DomainError {
        DomainError::storage(format!("Failed to {} {}: {}", action, self.path.display(), e))
    }
}

#[async_trait]
impl AuditLog for JsonlAuditLog {
    async fn append(&self, entry: &ClassificationLogEntry) -> Result<(), DomainError> {
        let mut line = serde_json::to_vec(entry)
            .map_err(|e| DomainError::storage(format!("Failed to serialize log entry: {}", e)))?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        self.ensure_parent().await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error("open", e))?;

        file.write_all(&line)
            .await
            .map_err(|e| self.io_error("append to", e))?;
        file.flush().await.map_err(|e| self.io_error("flush", e))
    }

    async fn read_all(&self) -> Result<Vec<ClassificationLogEntry>, DomainError> {
        let _guard = self.lock.lock().await;

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error("read", e)),
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).map_err(|e| {
                    DomainError::storage(format!(
                        "Malformed log entry at {}:{}: {}",
                        self.path.display(),
                        i + 1,
                        e
                    ))
                })
            })
            .collect()
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        self.ensure_parent().await?;

        tokio::fs::write(&self.path, b"")
            .await
            .map_err(|e| self.io_error("truncate", e))
    }

    /// A missing file is fine; an existing one must open for reading
    async fn check(&self) -> Result<(), DomainError> {
        match tokio::fs::File::open(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("open", e)),
        }
    }
}
