//! Alert store backed by a single JSON file.
//!
//! The file is the only copy of the alerts. Every read loads it and every
//! change is a locked read-modify-write, so a long-running scheduler and
//! one-shot CLI commands can share one file. Writes go through a temp file
//! and a rename, so a crash leaves either the old or the new contents on
//! disk and readers never see a partial file.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{AlertId, OwnerId, PriceAlert};
use crate::error::{Error, Result};
use crate::port::outbound::store::AlertStore;

/// Current alert file format version.
const FILE_VERSION: u32 = 1;

/// How long a writer waits for another process to release the lock.
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const LOCK_POLL: Duration = Duration::from_millis(20);
/// A lock file older than this was left behind by a dead process.
const STALE_LOCK_AGE: Duration = Duration::from_secs(30);

type AlertMap = HashMap<AlertId, PriceAlert>;

#[derive(Debug, Serialize, Deserialize)]
struct AlertFile {
    version: u32,
    alerts: Vec<PriceAlert>,
}

/// Durable alert store, safe to share between processes on one host.
pub struct JsonFileAlertStore {
    path: PathBuf,
    lock_path: PathBuf,
    // Serializes writers inside this process; the lock file covers the rest.
    writer: Mutex<()>,
}

/// Exclusive lock held as a sibling `.lock` file. Removed on drop.
struct FileLock {
    path: PathBuf,
}

impl FileLock {
    async fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let started = tokio::time::Instant::now();
        loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .await
            {
                Ok(_) => {
                    return Ok(Self {
                        path: path.to_path_buf(),
                    })
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if is_stale(path).await {
                        warn!(path = %path.display(), "Removing stale alert lock");
                        let _ = fs::remove_file(path).await;
                        continue;
                    }
                    if started.elapsed() >= LOCK_TIMEOUT {
                        return Err(Error::Storage(format!(
                            "timed out waiting for {}",
                            path.display()
                        )));
                    }
                    tokio::time::sleep(LOCK_POLL).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

async fn is_stale(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path).await else {
        return false;
    };
    metadata
        .modified()
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age > STALE_LOCK_AGE)
}

impl JsonFileAlertStore {
    /// Open the store, checking that an existing file is readable. A
    /// missing file is an empty store; the file is created on the first
    /// write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let alerts = load(&path).await?;
        info!(path = %path.display(), alerts = alerts.len(), "Alert store opened");

        let mut lock_path = path.clone().into_os_string();
        lock_path.push(".lock");
        Ok(Self {
            path,
            lock_path: PathBuf::from(lock_path),
            writer: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current file, apply `change` and write the result back if
    /// `change` reports a modification. Runs under both locks.
    async fn modify<T>(&self, change: impl FnOnce(&mut AlertMap) -> (T, bool)) -> Result<T> {
        let _writer = self.writer.lock().await;
        let _lock = FileLock::acquire(&self.lock_path).await?;

        let mut alerts = load(&self.path).await?;
        let (result, changed) = change(&mut alerts);
        if changed {
            self.persist(&alerts).await?;
        }
        Ok(result)
    }

    async fn persist(&self, alerts: &AlertMap) -> Result<()> {
        let file = AlertFile {
            version: FILE_VERSION,
            alerts: sorted(alerts.values().cloned().collect()),
        };
        let json = serde_json::to_vec_pretty(&file)?;

        let temp_path = self.path.with_extension("tmp");
        if let Err(e) = fs::write(&temp_path, &json).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        debug!(path = %self.path.display(), alerts = file.alerts.len(), "Alert file written");
        Ok(())
    }
}

async fn load(path: &Path) -> Result<AlertMap> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(e.into()),
    };
    let file: AlertFile = serde_json::from_slice(&bytes)?;
    if file.version != FILE_VERSION {
        return Err(Error::Storage(format!(
            "unsupported alert file version {} in {}",
            file.version,
            path.display()
        )));
    }
    Ok(file.alerts.into_iter().map(|alert| (alert.id, alert)).collect())
}

fn sorted(mut alerts: Vec<PriceAlert>) -> Vec<PriceAlert> {
    alerts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    alerts
}

#[async_trait]
impl AlertStore for JsonFileAlertStore {
    async fn insert(&self, alert: &PriceAlert) -> Result<()> {
        let inserted = self
            .modify(|alerts| {
                if alerts.contains_key(&alert.id) {
                    return (false, false);
                }
                alerts.insert(alert.id, alert.clone());
                (true, true)
            })
            .await?;
        if !inserted {
            return Err(Error::Storage(format!("alert {} already exists", alert.id)));
        }
        Ok(())
    }

    async fn update(&self, alert: &PriceAlert) -> Result<bool> {
        self.modify(|alerts| match alerts.get_mut(&alert.id) {
            // Deactivation is final, even if another process got there first.
            Some(existing) if existing.active => {
                *existing = alert.clone();
                (true, true)
            }
            _ => (false, false),
        })
        .await
    }

    async fn get(&self, id: &AlertId) -> Result<Option<PriceAlert>> {
        Ok(load(&self.path).await?.remove(id))
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<PriceAlert>> {
        let alerts = load(&self.path).await?;
        Ok(sorted(
            alerts
                .into_values()
                .filter(|alert| &alert.owner_id == owner)
                .collect(),
        ))
    }

    async fn list_active(&self) -> Result<Vec<PriceAlert>> {
        let alerts = load(&self.path).await?;
        Ok(sorted(alerts.into_values().filter(|alert| alert.active).collect()))
    }

    async fn delete(&self, id: &AlertId) -> Result<bool> {
        self.modify(|alerts| {
            let removed = alerts.remove(id).is_some();
            (removed, removed)
        })
        .await
    }

    async fn prune_inactive(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.modify(|alerts| {
            let before = alerts.len();
            alerts.retain(|_, alert| alert.active || alert.settled_at() >= cutoff);
            let removed = before - alerts.len();
            (removed, removed > 0)
        })
        .await
    }
}
