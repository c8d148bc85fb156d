use attest_types::Entry;
use regex::{Captures, Regex};
use thiserror::Error;
use yansi::Paint;

/// Any word (Latin-1 letters, apostrophes, brackets and quotes included)
/// ending in `eme` with no word character after it.
pub const DEFAULT_MORPHEME_PATTERN: &str =
    r#"([\wÀ-ÖØ-öø-ÿ'()\-\[\]{}"“”‘’]*?)eme\b"#;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("invalid pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Compiled matching rule over entry definitions.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(raw: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(raw).map_err(|source| PatternError::Invalid {
            pattern: raw.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn default_morpheme() -> Self {
        Self {
            regex: Regex::new(DEFAULT_MORPHEME_PATTERN).expect("default pattern compiles"),
        }
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Entries whose definition contains a match, in corpus order.
    pub fn filter(&self, entries: &[Entry]) -> Vec<Entry> {
        entries
            .iter()
            .filter(|entry| self.is_match(&entry.definition))
            .cloned()
            .collect()
    }

    /// Wrap every match in yellow. Plain text when painting is disabled.
    pub fn highlight(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |caps: &Captures<'_>| {
                Paint::yellow(&caps[0]).to_string()
            })
            .into_owned()
    }
}
