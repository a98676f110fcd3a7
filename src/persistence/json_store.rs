use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{PersistenceError, ProgressStore, SessionSnapshot, UserProgress};

/// Stores each user's records as pretty-printed JSON files in one directory:
/// `<user>.progress.json` and `<user>.snapshot.json`.
///
/// File names only keep `[A-Za-z0-9_-]` from the username, so two names can
/// share a file. The username inside the record decides: a record written
/// for someone else reads as absent.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| PersistenceError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_stem(username: &str) -> String {
        let stem: String = username
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() { "_".to_string() } else { stem }
    }

    fn progress_path(&self, username: &str) -> PathBuf {
        self.dir
            .join(format!("{}.progress.json", Self::file_stem(username)))
    }

    fn snapshot_path(&self, username: &str) -> PathBuf {
        self.dir
            .join(format!("{}.snapshot.json", Self::file_stem(username)))
    }

    fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| PersistenceError::Corrupt {
                path: path.to_path_buf(),
                source,
            })
    }

    fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(record)?;
        fs::write(path, json).map_err(|source| PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = ?path, "record written");
        Ok(())
    }
}

impl ProgressStore for JsonFileStore {
    fn load_progress(&self, username: &str) -> Result<UserProgress, PersistenceError> {
        let record: Option<UserProgress> = Self::read_record(&self.progress_path(username))?;
        Ok(record
            .filter(|progress| progress.username == username)
            .unwrap_or_else(|| UserProgress::new(username)))
    }

    fn save_progress(&mut self, username: &str, level: u32) -> Result<(), PersistenceError> {
        let progress = UserProgress {
            username: username.to_string(),
            current_level: level,
        };
        Self::write_record(&self.progress_path(username), &progress)
    }

    fn load_snapshot(&self, username: &str) -> Result<Option<SessionSnapshot>, PersistenceError> {
        let record: Option<SessionSnapshot> = Self::read_record(&self.snapshot_path(username))?;
        Ok(record.filter(|snapshot| snapshot.username == username))
    }

    fn save_snapshot(
        &mut self,
        username: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), PersistenceError> {
        Self::write_record(&self.snapshot_path(username), snapshot)
    }

    fn clear_snapshot(&mut self, username: &str) -> Result<(), PersistenceError> {
        let path = self.snapshot_path(username);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Write { path, source }),
        }
    }
}
