//! The annotation REPL.
//!
//! A [`Session`] walks a cursor over the filtered entries. For the entry at
//! the cursor it reads commands from a [`CommandSource`]:
//!
//! | input | effect |
//! |---|---|
//! | blank, `s`, `skip` | next entry, ledger untouched |
//! | `d`, `done` | if every required tag is set: store in the ledger, next entry |
//! | `b`, `back` | previous entry (no-op at the first one) |
//! | `e`, `edit` | ask for a tag name, then its value |
//! | `f`, `fill` | ask for each missing required tag in schema order |
//! | `q`, `quit` | stop; the cursor stays on the current entry |
//! | anything else | tag name; the next line is its value |
//!
//! The cursor is saved after every move and the ledger after every `done`,
//! so a later run resumes where this one stopped.

use std::io::{self, BufRead, Write};

use attest_corpus::Pattern;
use attest_types::{Entry, TagSchema, Tags};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::console::{CommandSource, Console};
use crate::ledger::Ledger;
use crate::progress::{ProgressError, ProgressStore};
use crate::vocab::Vocabulary;

const COMMAND_PROMPT: &str = "Enter tag (or command): ";
const COMMAND_HELP: &str = "Commands: [d]one, [s]kip, [e]dit, [f]ill, [b]ack, [q]uit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Done,
    Skip,
    Back,
    Edit,
    Fill,
    Quit,
    Tag(String),
}

impl Command {
    /// Blank input means skip; unknown tokens are tag names.
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "" | "s" | "skip" => Command::Skip,
            "d" | "done" => Command::Done,
            "b" | "back" => Command::Back,
            "e" | "edit" => Command::Edit,
            "f" | "fill" => Command::Fill,
            "q" | "quit" => Command::Quit,
            name => Command::Tag(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingCommand,
    EditingTag { name: String },
    Terminated,
}

/// What a single command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Waiting for the value of this tag.
    Editing(String),
    TagSet(String),
    TagDiscarded,
    /// Values entered by `fill`.
    Filled(usize),
    /// `done` refused; these required tags are missing.
    Incomplete(Vec<String>),
    Advanced,
    SteppedBack,
    AtStart,
    Stopped,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub cursor: usize,
    pub total: usize,
    /// Entries stored with `done` during this run.
    pub annotated: usize,
    pub stopped: bool,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read operator input: {0}")]
    Input(#[from] io::Error),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Required tag names missing from `entry`, in schema order.
pub fn check_required_tags<'a>(entry: &Entry, schema: &'a TagSchema) -> Vec<&'a str> {
    schema.missing(&entry.tags)
}

pub struct Session {
    entries: Vec<Entry>,
    cursor: usize,
    schema: TagSchema,
    ledger: Ledger,
    progress: ProgressStore,
    vocab: Vocabulary,
    highlight: Option<Pattern>,
    state: SessionState,
    /// Copy of the entry at the cursor being edited.
    working: Option<Entry>,
    annotated: usize,
}

impl Session {
    /// Start at the cursor saved in `progress`, clamped to the entry count.
    pub fn open(
        entries: Vec<Entry>,
        schema: TagSchema,
        ledger: Ledger,
        progress: ProgressStore,
    ) -> Result<Self, ProgressError> {
        let cursor = match progress.load()? {
            Some(saved) if saved > entries.len() => {
                warn!(
                    "saved cursor {saved} is past the {} matching entries, clamping",
                    entries.len()
                );
                entries.len()
            }
            Some(saved) => {
                info!("resuming from entry #{saved}");
                saved
            }
            None => 0,
        };
        let state = if cursor < entries.len() {
            SessionState::AwaitingCommand
        } else {
            SessionState::Terminated
        };
        Ok(Self {
            entries,
            cursor,
            schema,
            ledger,
            progress,
            vocab: Vocabulary::new(),
            highlight: None,
            state,
            working: None,
            annotated: 0,
        })
    }

    pub fn with_vocabulary(mut self, vocab: Vocabulary) -> Self {
        self.vocab = vocab;
        self
    }

    /// Highlight matches of `pattern` when showing definitions.
    pub fn with_highlight(mut self, pattern: Pattern) -> Self {
        self.highlight = Some(pattern);
        self
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Entry being edited, once the current entry has been shown.
    pub fn working(&self) -> Option<&Entry> {
        self.working.as_ref()
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Drive the session until the entries run out or the operator stops.
    pub fn run(&mut self, source: &mut dyn CommandSource) -> Result<SessionSummary, SessionError> {
        if self.state == SessionState::Terminated {
            source.show("No entries left to annotate.");
        }
        let stopped = loop {
            match self.step(source)? {
                Step::Stopped => break true,
                Step::Finished => break false,
                _ => {}
            }
        };
        Ok(self.summary(stopped))
    }

    /// [`run`](Self::run) on a console, saving its history however the run ends.
    pub fn run_console<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<SessionSummary, SessionError> {
        let outcome = self.run(console);
        if let Err(err) = console.history().save() {
            warn!("failed to save input history: {err}");
        }
        outcome
    }

    pub fn summary(&self, stopped: bool) -> SessionSummary {
        SessionSummary {
            cursor: self.cursor,
            total: self.entries.len(),
            annotated: self.annotated,
            stopped,
        }
    }

    /// Read one line and apply it according to the current state.
    pub fn step(&mut self, source: &mut dyn CommandSource) -> Result<Step, SessionError> {
        match self.state.clone() {
            SessionState::Terminated => Ok(Step::Finished),
            SessionState::EditingTag { name } => {
                let prompt = format!("Enter value for tag '{name}': ");
                match source.next_line(&prompt)? {
                    Some(value) => Ok(self.finish_edit(&name, value.trim(), source)),
                    None => Ok(self.stop(source)),
                }
            }
            SessionState::AwaitingCommand => {
                self.enter_current(source);
                let Some(line) = source.next_line(COMMAND_PROMPT)? else {
                    return Ok(self.stop(source));
                };
                if line.trim().is_empty() {
                    source.show("Blank input. Skipping to next entry.");
                }
                self.apply(Command::parse(&line), source)
            }
        }
    }

    /// Apply a parsed command to the entry at the cursor.
    pub fn apply(
        &mut self,
        command: Command,
        source: &mut dyn CommandSource,
    ) -> Result<Step, SessionError> {
        if self.state == SessionState::Terminated {
            return Ok(Step::Finished);
        }
        self.state = SessionState::AwaitingCommand;
        self.enter_current(source);
        debug!("entry #{}: {:?}", self.cursor, command);

        let step = match command {
            Command::Done => self.done(source),
            Command::Skip => self.advance(source),
            Command::Back => self.back(source),
            Command::Quit => self.stop(source),
            Command::Tag(name) => self.begin_edit(&name, source),
            Command::Edit => match source.next_line("Tag name: ")? {
                None => self.stop(source),
                Some(name) if name.trim().is_empty() => Step::TagDiscarded,
                Some(name) => self.begin_edit(name.trim(), source),
            },
            Command::Fill => self.fill(source)?,
        };
        Ok(step)
    }

    /// Set a tag on the current entry without prompting.
    pub fn set_tag(&mut self, name: &str, value: &str) -> bool {
        let Some(working) = self.working.as_mut() else {
            return false;
        };
        working.tags.insert(name.to_string(), value.to_string());
        self.vocab.record(name);
        self.vocab.record(value);
        true
    }

    fn enter_current(&mut self, source: &mut dyn CommandSource) {
        if self.working.is_some() || self.cursor >= self.entries.len() {
            return;
        }
        let raw = &self.entries[self.cursor];
        let stored = self.ledger.lookup(&raw.definition);
        let seen = stored.is_some();
        let working = match stored {
            Some(entry) => entry.clone(),
            // unseen entries start untagged
            None => Entry {
                tags: Tags::new(),
                ..raw.clone()
            },
        };

        let definition = match &self.highlight {
            Some(pattern) => pattern.highlight(&working.definition),
            None => working.definition.clone(),
        };
        source.show("");
        source.show(&format!("Entry {} of {}", self.cursor + 1, self.entries.len()));
        source.show(&format!("Definition: {definition}"));
        source.show(COMMAND_HELP);
        if seen {
            source.show(&format!("Current Tags: {}", format_tags(&working.tags)));
        }
        self.working = Some(working);
    }

    fn begin_edit(&mut self, name: &str, source: &mut dyn CommandSource) -> Step {
        self.suggest(name, source);
        self.state = SessionState::EditingTag {
            name: name.to_string(),
        };
        Step::Editing(name.to_string())
    }

    fn finish_edit(&mut self, name: &str, value: &str, source: &mut dyn CommandSource) -> Step {
        self.state = SessionState::AwaitingCommand;
        if value.is_empty() {
            source.show("Empty value. Skipping this tag.");
            return Step::TagDiscarded;
        }
        self.suggest(value, source);
        if self.set_tag(name, value) {
            Step::TagSet(name.to_string())
        } else {
            Step::TagDiscarded
        }
    }

    fn fill(&mut self, source: &mut dyn CommandSource) -> Result<Step, SessionError> {
        let missing: Vec<String> = match &self.working {
            Some(working) => check_required_tags(working, &self.schema)
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => return Ok(Step::Finished),
        };
        if missing.is_empty() {
            source.show("All required tags are present.");
            return Ok(Step::Filled(0));
        }

        source.show("Please enter values for each tag as per the specified order:");
        let mut filled = 0;
        for name in missing {
            let prompt = format!("Enter value for tag '{name}': ");
            let Some(value) = source.next_line(&prompt)? else {
                return Ok(self.stop(source));
            };
            let value = value.trim();
            if !value.is_empty() && self.set_tag(&name, value) {
                filled += 1;
            }
        }
        Ok(Step::Filled(filled))
    }

    fn done(&mut self, source: &mut dyn CommandSource) -> Step {
        let Some(working) = &self.working else {
            return Step::Finished;
        };
        let missing = check_required_tags(working, &self.schema);
        if !missing.is_empty() {
            source.show(&format!("Missing required tags: {}", missing.join(", ")));
            source.show("Please add the missing tags before marking as done.");
            return Step::Incomplete(missing.into_iter().map(str::to_string).collect());
        }

        if let Err(err) = self.ledger.upsert(working.clone()) {
            warn!("{err}");
            source.show(&format!("warning: {err}; the annotation is kept in memory only"));
        }
        self.annotated += 1;
        info!("annotated entry #{}", self.cursor);
        self.advance(source)
    }

    fn advance(&mut self, source: &mut dyn CommandSource) -> Step {
        self.cursor = (self.cursor + 1).min(self.entries.len());
        self.working = None;
        self.state = if self.cursor < self.entries.len() {
            SessionState::AwaitingCommand
        } else {
            SessionState::Terminated
        };
        self.save_cursor(source);
        Step::Advanced
    }

    fn back(&mut self, source: &mut dyn CommandSource) -> Step {
        let step = if self.cursor > 0 {
            self.cursor -= 1;
            self.working = None;
            source.show(&format!("Moved back to entry #{}.", self.cursor));
            Step::SteppedBack
        } else {
            source.show("Already at the first entry. Can't go back.");
            Step::AtStart
        };
        self.save_cursor(source);
        step
    }

    fn stop(&mut self, source: &mut dyn CommandSource) -> Step {
        self.state = SessionState::AwaitingCommand;
        self.save_cursor(source);
        Step::Stopped
    }

    fn save_cursor(&self, source: &mut dyn CommandSource) {
        if let Err(err) = self.progress.save(self.cursor) {
            warn!("{err}");
            source.show(&format!("warning: {err}"));
        }
    }

    fn suggest(&self, prefix: &str, source: &mut dyn CommandSource) {
        let suggestions = self.vocab.suggest(prefix);
        if !suggestions.is_empty() {
            source.show(&format!("Suggestions: {}", suggestions.join(", ")));
        }
    }
}

fn format_tags(tags: &Tags) -> String {
    let body = tags
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}
