//! Leaderboard store backed by a JSON file on disk.
//!
//! DESIGN
//! ======
//! The leaderboard is a flat JSON array of `{name, score}` rows, written
//! pretty-printed. A missing or unparseable file reads as an empty board.
//! Appends are read-modify-write, serialized by an async mutex so concurrent
//! `/submit_score` calls cannot lose rows. Each write lands in a staging file
//! that is renamed over the board, so a reader never sees a partial file.
//!
//! Rows are stored in submission order; ranking happens on read.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;
use wire::LeaderboardEntry;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("leaderboard io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LeaderboardStore {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), write_lock: Arc::new(Mutex::new(())) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every stored row in submission order.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures other than a missing file.
    pub async fn load(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "leaderboard file unreadable; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Top `limit` rows, highest score first. Ties keep submission order.
    ///
    /// # Errors
    ///
    /// See [`LeaderboardStore::load`].
    pub async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut entries = self.load().await?;
        rank(&mut entries, limit);
        Ok(entries)
    }

    /// Append one row and persist the whole board.
    ///
    /// The board is written to a sibling temp file and renamed over the
    /// target, so readers see either the old board or the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub async fn append(&self, entry: LeaderboardEntry) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.push(entry);
        let body = serde_json::to_vec_pretty(&entries)?;

        let staging = self.staging_path();
        tokio::fs::write(&staging, body).await?;
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                warn!(error = %cleanup, path = %staging.display(), "failed to remove staging file");
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(OsString::from).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Sort descending by score (stable) and keep the first `limit` rows.
fn rank(entries: &mut Vec<LeaderboardEntry>, limit: usize) {
    entries.sort_by_key(|e| std::cmp::Reverse(e.score));
    entries.truncate(limit);
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
