//! Operator input and output.
//!
//! The session never touches stdin directly: it asks a [`CommandSource`] for
//! one line at a time. [`Console`] is the interactive implementation with a
//! persisted history; [`ScriptedSource`] replays fixed input and records
//! everything shown, for tests and batch runs.
//!
//! History carries over between runs and is recalled shell-style: `!!` is
//! the previous line, `!N` the N-th remembered line (1-based) and `!text`
//! the most recent line starting with `text`. A lone `!` is passed through.

use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Stdout, StdinLock, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

const HISTORY_LIMIT: usize = 1000;

/// A line-oriented operator.
pub trait CommandSource {
    /// Show `prompt` and return the next line without its line ending, or
    /// `None` once input is exhausted.
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Show a line of output.
    fn show(&mut self, text: &str);
}

/// Previously entered lines, persisted one per line.
#[derive(Debug, Default)]
pub struct History {
    path: Option<PathBuf>,
    lines: Vec<String>,
}

impl History {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Read history from `path`; a missing file yields an empty history.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lines = match fs::read_to_string(&path) {
            Ok(raw) => raw.lines().map(str::to_string).collect(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err),
        };
        debug!("loaded {} history lines", lines.len());
        Ok(Self {
            path: Some(path),
            lines,
        })
    }

    /// Record a line, ignoring blanks and immediate repeats.
    pub fn push(&mut self, line: &str) {
        if line.trim().is_empty() || self.lines.last().is_some_and(|last| last == line) {
            return;
        }
        self.lines.push(line.to_string());
        if self.lines.len() > HISTORY_LIMIT {
            let excess = self.lines.len() - HISTORY_LIMIT;
            self.lines.drain(..excess);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Resolve a `!!`, `!N` or `!prefix` request; `None` when nothing matches
    /// or `request` is not a recall.
    pub fn recall(&self, request: &str) -> Option<&str> {
        let key = request.strip_prefix('!').filter(|key| !key.is_empty())?;
        let found = if key == "!" {
            self.lines.last()
        } else if let Ok(number) = key.parse::<usize>() {
            number.checked_sub(1).and_then(|index| self.lines.get(index))
        } else {
            self.lines.iter().rev().find(|line| line.starts_with(key))
        };
        found.map(String::as_str)
    }

    pub fn save(&self) -> io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut body = self.lines.join("\n");
        body.push('\n');
        fs::write(path, body)
    }
}

/// Interactive console over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
    history: History,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio(history: History) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), history)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, history: History) -> Self {
        Self {
            input,
            output,
            history,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

impl<R: BufRead, W: Write> CommandSource for Console<R, W> {
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut raw = String::new();
            if self.input.read_line(&mut raw)? == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }
            let mut line = raw.trim_end_matches(['\n', '\r']).to_string();
            let request = line.trim();
            if request.len() > 1 && request.starts_with('!') {
                match self.history.recall(request) {
                    Some(recalled) => {
                        line = recalled.to_string();
                        writeln!(self.output, "{line}")?;
                    }
                    None => {
                        writeln!(self.output, "No history entry matches {request}.")?;
                        continue;
                    }
                }
            }
            self.history.push(&line);
            return Ok(Some(line));
        }
    }

    fn show(&mut self, text: &str) {
        let _ = writeln!(self.output, "{text}");
    }
}

/// Replays queued lines and keeps a transcript of prompts and output.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Whether any shown line contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }
}

impl CommandSource for ScriptedSource {
    fn next_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }

    fn show(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_strips_line_endings_and_records_history() {
        let input = b"cit\r\n\nd\n".as_slice();
        let mut out = Vec::new();
        let mut console = Console::new(input, &mut out, History::in_memory());

        assert_eq!(console.next_line("> ").unwrap().as_deref(), Some("cit"));
        assert_eq!(console.next_line("> ").unwrap().as_deref(), Some(""));
        assert_eq!(console.next_line("> ").unwrap().as_deref(), Some("d"));
        assert_eq!(console.next_line("> ").unwrap(), None);
        console.show("bye");

        assert_eq!(console.history().lines(), &["cit".to_string(), "d".to_string()]);
        drop(console);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("> > "));
        assert!(shown.ends_with("bye\n"));
    }

    #[test]
    fn history_persists_and_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".annotation_history");
        let mut history = History::load(&path).unwrap();
        for i in 0..HISTORY_LIMIT + 5 {
            history.push(&format!("line {i}"));
        }
        history.push(&format!("line {}", HISTORY_LIMIT + 4));
        history.save().unwrap();

        let reloaded = History::load(&path).unwrap();
        assert_eq!(reloaded.lines().len(), HISTORY_LIMIT);
        assert_eq!(reloaded.lines()[0], "line 5");
    }

    #[test]
    fn recalls_lines_by_number_prefix_and_last() {
        let mut history = History::in_memory();
        for line in ["cit", "c1(Anchieta, 1595)", "sujs", "ele"] {
            history.push(line);
        }
        assert_eq!(history.recall("!!"), Some("ele"));
        assert_eq!(history.recall("!2"), Some("c1(Anchieta, 1595)"));
        assert_eq!(history.recall("!c"), Some("c1(Anchieta, 1595)"));
        assert_eq!(history.recall("!su"), Some("sujs"));
        assert_eq!(history.recall("!0"), None);
        assert_eq!(history.recall("!9"), None);
        assert_eq!(history.recall("!x"), None);
        assert_eq!(history.recall("!"), None);
        assert_eq!(history.recall("cit"), None);
    }

    #[test]
    fn lines_from_an_earlier_run_can_be_recalled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".annotation_history");

        let mut out = Vec::new();
        let mut first = Console::new(
            b"c1(Anchieta, 1595)\nd\n".as_slice(),
            &mut out,
            History::load(&path).unwrap(),
        );
        first.next_line("> ").unwrap();
        first.next_line("> ").unwrap();
        first.history().save().unwrap();
        drop(first);

        let mut out = Vec::new();
        let mut second = Console::new(
            b"!c1\n!zzz\n!!\n".as_slice(),
            &mut out,
            History::load(&path).unwrap(),
        );
        assert_eq!(
            second.next_line("> ").unwrap().as_deref(),
            Some("c1(Anchieta, 1595)")
        );
        assert_eq!(
            second.next_line("> ").unwrap().as_deref(),
            Some("c1(Anchieta, 1595)")
        );
        assert_eq!(second.next_line("> ").unwrap(), None);
        drop(second);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("No history entry matches !zzz."));
    }

    #[test]
    fn scripted_source_replays_then_ends() {
        let mut source = ScriptedSource::new(["a", "b"]);
        assert_eq!(source.next_line("p1").unwrap().as_deref(), Some("a"));
        source.show("shown");
        assert_eq!(source.next_line("p2").unwrap().as_deref(), Some("b"));
        assert_eq!(source.next_line("p3").unwrap(), None);
        assert_eq!(source.transcript(), &["p1", "shown", "p2", "p3"]);
        assert!(source.saw("hown"));
    }
}
