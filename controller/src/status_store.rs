use std::path::PathBuf;

use thermd_common::{atomic_file::write_atomic, HeaterStatus};
use thiserror::Error;

/// The single-slot record local consumers read to learn the latest decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRecord {
    pub status: HeaterStatus,
    /// Epoch seconds.
    pub timestamp: i64,
}

impl StatusRecord {
    fn render(&self) -> String {
        format!("{} : {}", self.status.as_str(), self.timestamp)
    }

    fn parse(raw: &str) -> Option<Self> {
        let (status, timestamp) = raw.split_once(':')?;
        Some(Self {
            status: HeaterStatus::parse(status)?,
            timestamp: timestamp.trim().parse().ok()?,
        })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("status file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("status file {} is not a status record", path.display())]
    Malformed { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct StatusStore {
    path: PathBuf,
}

impl StatusStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Overwrites the record. Readers see the previous record or this one, never a torn write.
    ///
    /// The synced write runs on the blocking pool so the loop's runtime thread
    /// keeps servicing timers and signals.
    pub async fn persist(&self, record: StatusRecord) -> Result<(), StoreError> {
        let path = self.path.clone();
        let contents = record.render();
        tokio::task::spawn_blocking(move || write_atomic(&path, contents.as_bytes()))
            .await
            .map_err(std::io::Error::other)
            .and_then(|written| written)
            .map_err(|source| self.io(source))
    }

    pub async fn read(&self) -> Result<StatusRecord, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| self.io(source))?;
        StatusRecord::parse(&raw).ok_or_else(|| StoreError::Malformed {
            path: self.path.clone(),
        })
    }

    fn io(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
