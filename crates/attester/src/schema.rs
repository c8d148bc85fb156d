use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use attest_types::TagSchema;
use thiserror::Error;
use tracing::info;

use crate::console::CommandSource;

/// Ends interactive tag-name collection.
pub const SCHEMA_SENTINEL: &str = "done";

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read tag schema {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("tag schema {} is not a list of tag names: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write tag schema {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] attest_types::SchemaError),
    #[error("failed to read tag names: {0}")]
    Input(#[source] io::Error),
}

/// Required-tag list persisted as a JSON array.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    path: PathBuf,
}

impl SchemaStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<TagSchema>, SchemaError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| SchemaError::Read {
            path: self.path.clone(),
            source,
        })?;
        let schema = serde_json::from_str(&raw).map_err(|source| SchemaError::Decode {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(schema))
    }

    pub fn save(&self, schema: &TagSchema) -> Result<(), SchemaError> {
        let write = |source: io::Error| SchemaError::Write {
            path: self.path.clone(),
            source,
        };
        let body = serde_json::to_string(schema).map_err(|e| write(io::Error::from(e)))?;
        fs::write(&self.path, body).map_err(write)
    }

    /// Ask for tag names one per line until [`SCHEMA_SENTINEL`] or end of
    /// input, then persist them.
    pub fn collect(&self, source: &mut dyn CommandSource) -> Result<TagSchema, SchemaError> {
        source.show("Set tags in the desired order. Type 'done' when finished.");
        let mut names: Vec<String> = Vec::new();
        loop {
            let Some(line) = source
                .next_line("Enter tag (or 'done' to finish): ")
                .map_err(SchemaError::Input)?
            else {
                break;
            };
            let name = line.trim();
            if name.eq_ignore_ascii_case(SCHEMA_SENTINEL) {
                break;
            }
            if name.is_empty() {
                source.show("Tag names cannot be empty.");
                continue;
            }
            names.push(name.to_string());
        }

        let schema = TagSchema::new(names)?;
        self.save(&schema)?;
        info!("saved tag order to {}", self.path.display());
        Ok(schema)
    }

    /// Saved schema if any; otherwise `preset` (when non-empty) or an
    /// interactive collection. The result is persisted either way.
    pub fn load_or_init(
        &self,
        preset: &[String],
        source: &mut dyn CommandSource,
    ) -> Result<TagSchema, SchemaError> {
        if let Some(schema) = self.load()? {
            source.show(&format!("Loaded required tags: {schema}"));
            return Ok(schema);
        }
        let preset = parse_tag_list(preset);
        if !preset.is_empty() {
            let schema = TagSchema::new(preset)?;
            self.save(&schema)?;
            source.show(&format!("Required tags set to: {schema}"));
            return Ok(schema);
        }
        self.collect(source)
    }
}

/// Split comma-separated tag lists, trimming and dropping empty pieces.
pub fn parse_tag_list<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .flat_map(|chunk| chunk.as_ref().split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedSource;

    #[test]
    fn collects_until_sentinel_and_rejects_blank_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path().join(".required_tags"));
        let mut source = ScriptedSource::new(["cit", "", "  sujs ", "sujp", "DONE", "ignored"]);

        let schema = store.collect(&mut source).unwrap();
        assert_eq!(schema.names(), &["cit", "sujs", "sujp"]);
        assert!(source.saw("cannot be empty"));
        assert_eq!(source.remaining(), 1);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"["cit","sujs","sujp"]"#);
        assert_eq!(store.load().unwrap(), Some(schema));
    }

    #[test]
    fn saved_schema_wins_over_preset() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path().join(".required_tags"));
        fs::write(store.path(), r#"["cit"]"#).unwrap();

        let mut source = ScriptedSource::new(Vec::<String>::new());
        let schema = store
            .load_or_init(&["sujs,sujp".to_string()], &mut source)
            .unwrap();
        assert_eq!(schema.names(), &["cit"]);
        assert!(source.saw("Loaded required tags: cit"));
    }

    #[test]
    fn preset_is_used_and_saved_when_nothing_is_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path().join(".required_tags"));
        let mut source = ScriptedSource::new(Vec::<String>::new());
        let schema = store
            .load_or_init(&["cit, sujs".to_string(), ",sujp".to_string()], &mut source)
            .unwrap();
        assert_eq!(schema.names(), &["cit", "sujs", "sujp"]);
        assert_eq!(store.load().unwrap().unwrap(), schema);
    }

    #[test]
    fn empty_names_on_disk_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path().join(".required_tags"));
        fs::write(store.path(), r#"["cit", ""]"#).unwrap();
        assert!(matches!(store.load(), Err(SchemaError::Decode { .. })));
    }
}
