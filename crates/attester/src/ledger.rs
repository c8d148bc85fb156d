use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use attest_types::Entry;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ledger {} is not a JSON array of entries: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write ledger {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Annotated entries keyed by definition, mirrored to a JSON file.
///
/// Entries keep the position of their first insertion. Every [`upsert`]
/// rewrites the whole file; when that write fails the in-memory state still
/// holds the change.
///
/// [`upsert`]: Ledger::upsert
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    entries: Vec<Entry>,
    slots: HashMap<String, usize>,
}

impl Ledger {
    /// Open the ledger at `path`; a missing file is an empty ledger.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let mut ledger = Self {
            path,
            entries: Vec::new(),
            slots: HashMap::new(),
        };
        if !ledger.path.exists() {
            debug!("no ledger at {}, starting empty", ledger.path.display());
            return Ok(ledger);
        }

        let raw = fs::read_to_string(&ledger.path).map_err(|source| LedgerError::Read {
            path: ledger.path.clone(),
            source,
        })?;
        let stored: Vec<Entry> =
            serde_json::from_str(&raw).map_err(|source| LedgerError::Decode {
                path: ledger.path.clone(),
                source,
            })?;
        for entry in stored {
            ledger.insert(entry);
        }
        info!(
            "loaded {} annotated entries from {}",
            ledger.entries.len(),
            ledger.path.display()
        );
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lookup(&self, definition: &str) -> Option<&Entry> {
        self.slots.get(definition).map(|&slot| &self.entries[slot])
    }

    /// Insert or replace `entry`, then persist the full ledger.
    pub fn upsert(&mut self, entry: Entry) -> Result<(), LedgerError> {
        self.insert(entry);
        self.save()
    }

    /// Overwrite the ledger file with every entry, 4-space indented.
    pub fn save(&self) -> Result<(), LedgerError> {
        let persist = |source: io::Error| LedgerError::Persist {
            path: self.path.clone(),
            source,
        };
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.entries
            .serialize(&mut ser)
            .map_err(|e| persist(io::Error::from(e)))?;
        fs::write(&self.path, buf).map_err(persist)?;
        debug!("wrote {} entries to {}", self.entries.len(), self.path.display());
        Ok(())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, entry: Entry) {
        match self.slots.get(&entry.definition) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.slots
                    .insert(entry.definition.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::open(dir.path().join("annotated.json")).unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.lookup("foneme").is_none());
    }

    #[test]
    fn upsert_replaces_in_place_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.json");
        let mut ledger = Ledger::open(&path).unwrap();
        ledger
            .upsert(Entry::new("foneme").with_tag("cit", "a"))
            .unwrap();
        ledger.upsert(Entry::new("teeme")).unwrap();
        ledger
            .upsert(Entry::new("foneme").with_tag("cit", "b"))
            .unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].tags["cit"], "b");

        let reopened = Ledger::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.lookup("foneme").unwrap().tags["cit"], "b");
        assert_eq!(reopened.entries()[1].definition, "teeme");
    }

    #[test]
    fn writes_four_space_indent_and_raw_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.json");
        let mut ledger = Ledger::open(&path).unwrap();
        ledger
            .upsert(Entry::new("açaí").with_tag("sujs", "ele"))
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n    {\n        \"d\": \"açaí\""));
    }

    #[test]
    fn duplicate_definitions_on_disk_keep_the_last_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.json");
        fs::write(
            &path,
            r#"[{"d": "x", "tags": {"a": "1"}}, {"d": "y"}, {"d": "x", "tags": {"a": "2"}}]"#,
        )
        .unwrap();
        let ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].tags["a"], "2");
    }

    #[test]
    fn unwritable_path_fails_but_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("annotated.json");
        let mut ledger = Ledger::open(&path).unwrap();
        let err = ledger.upsert(Entry::new("foneme")).unwrap_err();
        assert!(matches!(err, LedgerError::Persist { .. }));
        assert!(ledger.lookup("foneme").is_some());
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotated.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Ledger::open(&path).unwrap_err(),
            LedgerError::Decode { .. }
        ));
    }
}
