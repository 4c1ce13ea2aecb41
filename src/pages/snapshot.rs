//! Dated JSON snapshots
//!
//! A snapshot is the page payload plus the epoch-millisecond timestamp it
//! was written at, stored as one pretty-printed JSON file. It is reused
//! while younger than the TTL and overwritten wholesale otherwise.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::AppError;
use crate::metrics::{CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};

/// Payload fields plus `cached: epoch_ms`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    #[serde(flatten)]
    pub data: T,
    pub cached: i64,
}

/// One snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    /// Label used in logs and metrics
    name: &'static str,
    path: PathBuf,
    ttl: Duration,
}

impl SnapshotStore {
    pub fn new(name: &'static str, path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            name,
            path: path.into(),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A snapshot stays valid while `cached + ttl` lies in the future
    pub fn is_fresh(&self, cached: i64, now: DateTime<Utc>) -> bool {
        cached.saturating_add(self.ttl.num_milliseconds()) > now.timestamp_millis()
    }

    /// Read the snapshot if it exists and is still fresh
    ///
    /// A missing, unreadable or stale file is a miss.
    pub async fn read_fresh<T: DeserializeOwned>(&self, now: DateTime<Utc>) -> Option<Snapshot<T>> {
        let snapshot = match self.read::<T>().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::debug!(cache = self.name, "No snapshot on disk");
                CACHE_MISSES_TOTAL.with_label_values(&[self.name]).inc();
                return None;
            }
            Err(error) => {
                tracing::warn!(
                    cache = self.name,
                    path = %self.path.display(),
                    %error,
                    "Ignoring unreadable snapshot"
                );
                CACHE_MISSES_TOTAL.with_label_values(&[self.name]).inc();
                return None;
            }
        };

        if self.is_fresh(snapshot.cached, now) {
            tracing::debug!(cache = self.name, cached = snapshot.cached, "Snapshot hit");
            CACHE_HITS_TOTAL.with_label_values(&[self.name]).inc();
            Some(snapshot)
        } else {
            tracing::debug!(cache = self.name, cached = snapshot.cached, "Snapshot expired");
            CACHE_MISSES_TOTAL.with_label_values(&[self.name]).inc();
            None
        }
    }

    /// Stamp `data` with `now` and overwrite the snapshot file
    pub async fn write<T: Serialize>(
        &self,
        data: T,
        now: DateTime<Utc>,
    ) -> Result<Snapshot<T>, AppError> {
        let snapshot = Snapshot {
            data,
            cached: now.timestamp_millis(),
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(&self.path, bytes).await?;

        tracing::info!(cache = self.name, path = %self.path.display(), "Snapshot written");
        Ok(snapshot)
    }

    async fn read<T: DeserializeOwned>(&self) -> Result<Option<Snapshot<T>>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
