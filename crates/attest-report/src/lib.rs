//! Descriptive statistics over annotated citations.
//!
//! Each annotated entry may carry a citation tag (`cit`) and two subject tags
//! (`sujs` for the subordinate clause, `sujp` for the predicate). The report
//! counts unique citations, classifies each one as same-subject (SS) or
//! different-subject (DS), and breaks the counts down by citation source.
//!
//! # How it works
//! 1. Skip entries without a citation; keep the first entry per citation text.
//! 2. Derive the source key from the first parenthesised group of the
//!    citation: its first two `", "`-separated tokens.
//! 3. Classify citations where both subject tags are present.
//! 4. Express SS/DS counts as percentages of the unique citation count.
//!
//! # Example
//! ```
//! use attest_report::aggregate;
//! use attest_types::{CitationTags, Entry};
//!
//! let entries = vec![
//!     Entry::new("a").with_tag("cit", "c1(SourceA, p2)").with_tag("sujs", "X").with_tag("sujp", "X"),
//!     Entry::new("b").with_tag("cit", "c2(SourceB, p3)").with_tag("sujs", "X").with_tag("sujp", "Y"),
//! ];
//! let report = aggregate(&entries, &CitationTags::default());
//! assert_eq!(report.statistics.total_unique_citations, 2);
//! assert_eq!(report.statistics.same_subject_frequency_pct, 50.0);
//! ```

pub mod render;

use std::collections::{HashMap, HashSet};

use attest_types::{CitationRecord, CitationTags, Entry, SubjectRelation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub use render::{
    DEFAULT_SOURCES_CAPTION, DEFAULT_SOURCES_LABEL, DEFAULT_SUMMARY_CAPTION,
    DEFAULT_SUMMARY_LABEL, render_latex_macros, render_latex_sources, render_latex_summary,
    render_source_table, render_summary,
};

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("parenthetical regex compiles"));

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Statistics {
    pub total_unique_citations: usize,
    pub same_subject_count: usize,
    pub different_subject_count: usize,
    pub same_subject_frequency_pct: f64,
    pub different_subject_frequency_pct: f64,
    /// DS is more frequent than SS.
    pub conjunctive_marks_ds: bool,
    /// At least one SS citation exists.
    pub conjunctive_marks_ss: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub citations: usize,
    pub same_subject: usize,
}

impl SourceCount {
    /// Citations from this source that were not classified as SS.
    pub fn different_subject(&self) -> usize {
        self.citations - self.same_subject
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub statistics: Statistics,
    /// Sources in order of first appearance.
    pub sources: Vec<SourceCount>,
}

/// Source key of a citation: first two tokens inside the first `(...)`.
pub fn citation_source(citation: &str) -> Option<String> {
    let inner = PARENTHETICAL.captures(citation)?.get(1)?.as_str();
    Some(inner.split(", ").take(2).collect::<Vec<_>>().join(", "))
}

/// `count / total` as a percentage rounded to two decimals, halves to even;
/// 0.0 for no total.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let hundredths = count as f64 * 10_000.0 / total as f64;
    hundredths.round_ties_even() / 100.0
}

pub fn aggregate<'a, I>(entries: I, names: &CitationTags) -> Report
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut same = 0usize;
    let mut different = 0usize;
    let mut sources: Vec<SourceCount> = Vec::new();
    let mut source_slots: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let Some(record) = CitationRecord::from_entry(entry, names) else {
            continue;
        };
        if !seen.insert(record.citation) {
            continue;
        }

        let relation = record.relation();
        match relation {
            Some(SubjectRelation::Same) => same += 1,
            Some(SubjectRelation::Different) => different += 1,
            None => {}
        }

        if let Some(source) = citation_source(record.citation) {
            let slot = *source_slots.entry(source.clone()).or_insert_with(|| {
                sources.push(SourceCount {
                    source,
                    citations: 0,
                    same_subject: 0,
                });
                sources.len() - 1
            });
            let counts = &mut sources[slot];
            counts.citations += 1;
            if relation == Some(SubjectRelation::Same) {
                counts.same_subject += 1;
            }
        }
    }

    let total = seen.len();
    let same_pct = percentage(same, total);
    let different_pct = percentage(different, total);
    Report {
        statistics: Statistics {
            total_unique_citations: total,
            same_subject_count: same,
            different_subject_count: different,
            same_subject_frequency_pct: same_pct,
            different_subject_frequency_pct: different_pct,
            conjunctive_marks_ds: different > same,
            conjunctive_marks_ss: same > 0,
        },
        sources,
    }
}
