use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("failed to read progress file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("progress file {} holds {value:?}, expected an entry index", path.display())]
    Parse {
        path: PathBuf,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("failed to write progress file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Cursor persisted as a single integer in a text file.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved cursor, or `None` when nothing was saved yet.
    pub fn load(&self) -> Result<Option<usize>, ProgressError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| ProgressError::Read {
            path: self.path.clone(),
            source,
        })?;
        let value = raw.trim();
        value
            .parse::<usize>()
            .map(Some)
            .map_err(|source| ProgressError::Parse {
                path: self.path.clone(),
                value: value.to_string(),
                source,
            })
    }

    pub fn save(&self, cursor: usize) -> Result<(), ProgressError> {
        fs::write(&self.path, cursor.to_string()).map_err(|source| ProgressError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_and_tolerates_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join(".annotation_progress"));
        assert_eq!(store.load().unwrap(), None);

        store.save(42).unwrap();
        assert_eq!(store.load().unwrap(), Some(42));

        fs::write(store.path(), " 7\n").unwrap();
        assert_eq!(store.load().unwrap(), Some(7));
    }

    #[test]
    fn garbage_is_reported_with_its_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join(".annotation_progress"));
        fs::write(store.path(), "-3").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("\"-3\""));
    }
}
