//! Load dictionary corpora and select the entries worth annotating.
//!
//! A corpus is a JSON array of entry objects (see [`attest_types::Entry`]),
//! usually gzip-compressed (`dict-conjugated.json.gz`). It is read once and
//! then only queried. [`Pattern`] picks the ordered subsequence of entries
//! whose definition matches a regular expression and renders matches with
//! terminal highlighting.
//!
//! # Example
//! ```no_run
//! use attest_corpus::{Corpus, Pattern};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let corpus = Corpus::load("dict-conjugated.json.gz")?;
//! let pattern = Pattern::default_morpheme();
//! for entry in pattern.filter(corpus.entries()) {
//!     println!("{}", pattern.highlight(&entry.definition));
//! }
//! # Ok(()) }
//! ```

pub mod pattern;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use attest_types::Entry;
use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::{debug, info};

pub use pattern::{DEFAULT_MORPHEME_PATTERN, Pattern, PatternError};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),
    #[error("corpus is not a JSON array of entries: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read-only, in-memory corpus.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<Entry>,
}

impl Corpus {
    /// Load a corpus file. Files ending in `.gz` are decompressed on the fly.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let gzipped = path.extension().and_then(|s| s.to_str()) == Some("gz");
        debug!("opening corpus {} (gzip: {gzipped})", path.display());

        let corpus = if gzipped {
            Self::from_reader(GzDecoder::new(file))?
        } else {
            Self::from_reader(file)?
        };
        info!("loaded {} entries from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, CorpusError> {
        let entries: Vec<Entry> = serde_json::from_reader(BufReader::new(reader))?;
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_json_array() {
        let raw = br#"[{"d": "foneme"}, {"d": "casa", "tags": {"cit": "c1(A, 2)"}}]"#;
        let corpus = Corpus::from_reader(&raw[..]).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.entries()[1].tags["cit"], "c1(A, 2)");
    }

    #[test]
    fn rejects_non_array_payload() {
        let err = Corpus::from_reader(&br#"{"d": "foneme"}"#[..]).unwrap_err();
        assert!(matches!(err, CorpusError::Decode(_)));
    }
}
