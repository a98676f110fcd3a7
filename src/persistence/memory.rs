use std::collections::HashMap;

use super::{PersistenceError, ProgressStore, SessionSnapshot, UserProgress};

/// Keeps records for the lifetime of the process only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    progress: HashMap<String, u32>,
    snapshots: HashMap<String, SessionSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn load_progress(&self, username: &str) -> Result<UserProgress, PersistenceError> {
        Ok(UserProgress {
            username: username.to_string(),
            current_level: self.progress.get(username).copied().unwrap_or(1),
        })
    }

    fn save_progress(&mut self, username: &str, level: u32) -> Result<(), PersistenceError> {
        self.progress.insert(username.to_string(), level);
        Ok(())
    }

    fn load_snapshot(&self, username: &str) -> Result<Option<SessionSnapshot>, PersistenceError> {
        Ok(self.snapshots.get(username).cloned())
    }

    fn save_snapshot(
        &mut self,
        username: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), PersistenceError> {
        self.snapshots.insert(username.to_string(), snapshot.clone());
        Ok(())
    }

    fn clear_snapshot(&mut self, username: &str) -> Result<(), PersistenceError> {
        self.snapshots.remove(username);
        Ok(())
    }
}
