//! Shared types for annotating dictionary corpora.
//!
//! An [`Entry`] is a corpus record: a definition string plus a mapping of tag
//! names to values. Corpus files store the definition under the short key
//! `"d"`; every other field of a record is carried along untouched so that
//! annotated entries can be written back without losing information.
//!
//! A [`TagSchema`] is the ordered list of tag names an entry must carry before
//! it counts as annotated, and a [`CitationRecord`] is the view of an entry's
//! tags used for same-subject / different-subject statistics.
//!
//! ```rust
//! use attest_types::{CitationRecord, CitationTags, Entry, TagSchema};
//!
//! let mut entry = Entry::new("foneme: som da fala");
//! entry.tags.insert("cit".into(), "c1(Anchieta, 1595)".into());
//! entry.tags.insert("sujs".into(), "X".into());
//!
//! let schema = TagSchema::new(["cit", "sujs", "sujp"]).unwrap();
//! assert_eq!(schema.missing(&entry.tags), vec!["sujp"]);
//!
//! let record = CitationRecord::from_entry(&entry, &CitationTags::default()).unwrap();
//! assert_eq!(record.relation(), None);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Tag name to tag value. Sorted so serialized output is stable.
pub type Tags = BTreeMap<String, String>;

/// A corpus record keyed by its definition text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "d", alias = "definition")]
    pub definition: String,
    #[serde(default)]
    pub tags: Tags,
    /// Remaining corpus fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            tags: Tags::new(),
            extra: Map::new(),
        }
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("required tag names must not be empty")]
    EmptyName,
}

/// Ordered, immutable list of required tag names.
///
/// Empty names are rejected; repeated names keep their first position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TagSchema {
    names: Vec<String>,
}

impl TagSchema {
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if !out.contains(&name) {
                out.push(name);
            }
        }
        Ok(Self { names: out })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Required names absent from `tags`, in schema order.
    pub fn missing<'a>(&'a self, tags: &Tags) -> Vec<&'a str> {
        self.names
            .iter()
            .filter(|name| !tags.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl TryFrom<Vec<String>> for TagSchema {
    type Error = SchemaError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<TagSchema> for Vec<String> {
    fn from(schema: TagSchema) -> Self {
        schema.names
    }
}

impl fmt::Display for TagSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(", "))
    }
}

/// Names of the tags that carry citation data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitationTags {
    pub citation: String,
    pub subordinate_subject: String,
    pub predicate_subject: String,
}

impl Default for CitationTags {
    fn default() -> Self {
        Self {
            citation: "cit".to_string(),
            subordinate_subject: "sujs".to_string(),
            predicate_subject: "sujp".to_string(),
        }
    }
}

/// Whether the subordinate and predicate subjects of a citation coincide.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SubjectRelation {
    Same,
    Different,
}

impl fmt::Display for SubjectRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubjectRelation::Same => "SS",
            SubjectRelation::Different => "DS",
        })
    }
}

/// Citation view of an annotated entry. Empty tag values count as absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CitationRecord<'a> {
    pub citation: &'a str,
    pub subordinate_subject: Option<&'a str>,
    pub predicate_subject: Option<&'a str>,
}

impl<'a> CitationRecord<'a> {
    /// Returns `None` when the entry has no citation.
    pub fn from_entry(entry: &'a Entry, names: &CitationTags) -> Option<Self> {
        let get = |name: &str| {
            entry
                .tags
                .get(name)
                .map(String::as_str)
                .filter(|v| !v.is_empty())
        };
        Some(Self {
            citation: get(&names.citation)?,
            subordinate_subject: get(&names.subordinate_subject),
            predicate_subject: get(&names.predicate_subject),
        })
    }

    /// Classification, available only when both subjects are tagged.
    pub fn relation(&self) -> Option<SubjectRelation> {
        match (self.subordinate_subject, self.predicate_subject) {
            (Some(s), Some(p)) if s == p => Some(SubjectRelation::Same),
            (Some(_), Some(_)) => Some(SubjectRelation::Different),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_reads_short_and_long_definition_keys() {
        let short: Entry = serde_json::from_str(r#"{"d": "foneme"}"#).unwrap();
        assert_eq!(short.definition, "foneme");
        assert!(short.tags.is_empty());

        let long: Entry =
            serde_json::from_str(r#"{"definition": "casa", "tags": {"cit": "x"}}"#).unwrap();
        assert_eq!(long.definition, "casa");
        assert_eq!(long.tags["cit"], "x");
    }

    #[test]
    fn entry_keeps_unknown_fields() {
        let raw = r#"{"d": "foneme", "w": "fonema", "c": [1, 2]}"#;
        let entry: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.extra["w"], "fonema");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["d"], "foneme");
        assert_eq!(back["w"], "fonema");
        assert_eq!(back["c"][1], 2);
        assert!(back["tags"].as_object().unwrap().is_empty());
    }

    #[test]
    fn schema_rejects_empty_names_and_collapses_repeats() {
        assert_eq!(TagSchema::new(["cit", ""]), Err(SchemaError::EmptyName));
        let schema = TagSchema::new(["cit", "sujs", "cit"]).unwrap();
        assert_eq!(schema.names(), &["cit".to_string(), "sujs".to_string()]);
        assert!(serde_json::from_str::<TagSchema>(r#"["a", ""]"#).is_err());
    }

    #[test]
    fn missing_tags_follow_schema_order() {
        let schema = TagSchema::new(["sujp", "cit", "sujs"]).unwrap();
        let entry = Entry::new("x").with_tag("cit", "c");
        assert_eq!(schema.missing(&entry.tags), vec!["sujp", "sujs"]);
        let full = entry.with_tag("sujs", "a").with_tag("sujp", "b");
        assert!(schema.missing(&full.tags).is_empty());
    }

    #[test]
    fn citation_relation_needs_both_subjects() {
        let names = CitationTags::default();
        let entry = Entry::new("x")
            .with_tag("cit", "c1(A, 1)")
            .with_tag("sujs", "X")
            .with_tag("sujp", "X");
        let record = CitationRecord::from_entry(&entry, &names).unwrap();
        assert_eq!(record.relation(), Some(SubjectRelation::Same));

        let different = entry.clone().with_tag("sujp", "Y");
        let record = CitationRecord::from_entry(&different, &names).unwrap();
        assert_eq!(record.relation(), Some(SubjectRelation::Different));

        let blank = entry.clone().with_tag("sujp", "");
        let record = CitationRecord::from_entry(&blank, &names).unwrap();
        assert_eq!(record.relation(), None);

        assert!(CitationRecord::from_entry(&Entry::new("y"), &names).is_none());
    }
}
