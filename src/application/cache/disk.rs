//! Disk tier: one JSON file per entry under `<root>/<namespace>/`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;

use super::entry::{CacheEntry, Namespace};
use crate::error::CacheError;

pub(crate) struct DiskTier {
    root: PathBuf,
}

impl DiskTier {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, namespace: Namespace) -> PathBuf {
        self.root.join(namespace.as_str())
    }

    fn entry_path(&self, namespace: Namespace, hash: &str) -> PathBuf {
        self.namespace_dir(namespace).join(format!("{hash}.json"))
    }

    /// Read an entry. Missing files are `Ok(None)`; expiry is the caller's
    /// concern.
    pub(crate) async fn read(
        &self,
        namespace: Namespace,
        hash: &str,
    ) -> Result<Option<CacheEntry>, CacheError> {
        let bytes = match fs::read(self.entry_path(namespace, hash)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Write an entry via temp file and rename.
    pub(crate) async fn write(&self, hash: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        let dir = self.namespace_dir(entry.namespace);
        fs::create_dir_all(&dir).await?;

        let path = self.entry_path(entry.namespace, hash);
        let temp_path = path.with_extension("tmp");
        let json = serde_json::to_vec(entry)?;

        if let Err(e) = fs::write(&temp_path, &json).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    pub(crate) async fn remove(&self, namespace: Namespace, hash: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(namespace, hash)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    pub(crate) async fn clear(&self, namespace: Namespace) -> Result<(), CacheError> {
        match fs::remove_dir_all(self.namespace_dir(namespace)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Delete expired and unreadable entries in one namespace. Returns the
    /// number of files removed.
    pub(crate) async fn sweep(
        &self,
        namespace: Namespace,
        now: DateTime<Utc>,
    ) -> Result<usize, CacheError> {
        let mut dir = match fs::read_dir(self.namespace_dir(namespace)).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(file) = dir.next_entry().await? {
            let path = file.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let stale = match fs::read(&path).await {
                Ok(bytes) => serde_json::from_slice::<CacheEntry>(&bytes)
                    .map(|entry| entry.is_expired(now))
                    .unwrap_or(true),
                Err(_) => true,
            };
            if stale && fs::remove_file(&path).await.is_ok() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
