//! Quick pass over matching entries: one free-form response per entry,
//! collected into a text file.

use std::fs;
use std::io;
use std::path::Path;

use attest_corpus::Pattern;
use attest_types::Entry;
use tracing::info;

use crate::console::CommandSource;

/// Typed on its own, ends the scan.
pub const STOP_TOKEN: &str = "c";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Non-empty responses in the order they were given.
    pub responses: Vec<String>,
    /// Index of the first entry not shown.
    pub next: usize,
    pub stopped: bool,
}

/// Show entries from `start` onwards and collect the operator's responses.
pub fn scan(
    entries: &[Entry],
    start: usize,
    pattern: &Pattern,
    source: &mut dyn CommandSource,
) -> io::Result<ScanOutcome> {
    let mut outcome = ScanOutcome {
        next: start.min(entries.len()),
        ..ScanOutcome::default()
    };
    let total = entries.len();

    for (index, entry) in entries.iter().enumerate().skip(start) {
        source.show(&format!("[{}/{total}] {}", index + 1, pattern.highlight(&entry.definition)));
        let Some(line) = source.next_line("> ")? else {
            outcome.stopped = true;
            break;
        };
        let response = line.trim();
        if response == STOP_TOKEN {
            outcome.stopped = true;
            break;
        }
        outcome.next = index + 1;
        if !response.is_empty() {
            outcome.responses.push(response.to_string());
        }
    }
    info!(
        "scan collected {} responses, next entry #{}",
        outcome.responses.len(),
        outcome.next
    );
    Ok(outcome)
}

/// Write responses newline-joined, replacing any previous file.
pub fn write_responses(path: impl AsRef<Path>, responses: &[String]) -> io::Result<()> {
    fs::write(path, responses.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedSource;

    fn entries() -> Vec<Entry> {
        ["foneme", "morfeme", "lexeme", "grafeme"]
            .into_iter()
            .map(Entry::new)
            .collect()
    }

    #[test]
    fn collects_non_empty_responses_until_stop() {
        let pattern = Pattern::new("eme$").unwrap();
        let mut source = ScriptedSource::new(["one", "", "c", "never"]);
        let outcome = scan(&entries(), 0, &pattern, &mut source).unwrap();
        assert_eq!(outcome.responses, vec!["one"]);
        assert_eq!(outcome.next, 2);
        assert!(outcome.stopped);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn honours_start_offset_and_runs_to_the_end() {
        let pattern = Pattern::new("eme").unwrap();
        let mut source = ScriptedSource::new(["x", "y"]);
        let outcome = scan(&entries(), 2, &pattern, &mut source).unwrap();
        assert_eq!(outcome.responses, vec!["x", "y"]);
        assert_eq!(outcome.next, 4);
        assert!(!outcome.stopped);
        assert!(source.saw("[3/4]"));
    }

    #[test]
    fn start_past_the_end_shows_nothing() {
        let pattern = Pattern::new("eme").unwrap();
        let mut source = ScriptedSource::new(["x"]);
        let outcome = scan(&entries(), 10, &pattern, &mut source).unwrap();
        assert_eq!(outcome.next, 4);
        assert!(outcome.responses.is_empty());
        assert!(source.transcript().is_empty());
    }

    #[test]
    fn writes_responses_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reme_defs.txt");
        write_responses(&path, &["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
    }
}
