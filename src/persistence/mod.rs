//! Persistence of user progress and paused sessions
//!
//! The session never touches storage directly. The play mode talks to a
//! [`ProgressStore`]; failures are logged and play continues in memory.

pub mod json_store;
pub mod memory;
pub mod records;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
pub use records::{SessionSnapshot, UserProgress};

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

/// Errors raised by a [`ProgressStore`]
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt record in {path:?}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("saved game cannot be restored: {0}")]
    Invalid(String),
}

/// Storage for per-user progress and an optional paused session.
///
/// Records are keyed by username and writes are last-write-wins. A user with
/// no stored record is not an error: progress defaults to level 1 and the
/// snapshot is absent.
pub trait ProgressStore {
    fn load_progress(&self, username: &str) -> Result<UserProgress, PersistenceError>;

    fn save_progress(&mut self, username: &str, level: u32) -> Result<(), PersistenceError>;

    fn load_snapshot(&self, username: &str) -> Result<Option<SessionSnapshot>, PersistenceError>;

    fn save_snapshot(
        &mut self,
        username: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), PersistenceError>;

    /// Forget the paused session, if any
    fn clear_snapshot(&mut self, username: &str) -> Result<(), PersistenceError>;
}

/// Load progress, falling back to level 1 when the record can't be read
pub fn load_progress_or_default<S: ProgressStore + ?Sized>(
    store: &S,
    username: &str,
) -> UserProgress {
    store.load_progress(username).unwrap_or_else(|err| {
        warn!(username, error = %err, "could not load progress, starting at level 1");
        UserProgress::new(username)
    })
}

/// Load the paused session, treating an unreadable record as absent
pub fn load_snapshot_or_none<S: ProgressStore + ?Sized>(
    store: &S,
    username: &str,
) -> Option<SessionSnapshot> {
    match store.load_snapshot(username) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(username, error = %err, "could not load saved game, ignoring it");
            None
        }
    }
}
