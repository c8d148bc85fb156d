//! Interactive annotation of dictionary entries.
//!
//! The binary filters a corpus with a [`Pattern`](attest_corpus::Pattern),
//! then hands the matching entries to a [`Session`]. The session asks a
//! [`CommandSource`] for one line at a time, keeps the [`Ledger`] of
//! annotated entries and the resume cursor on disk, and refuses to mark an
//! entry done until every tag of the [`TagSchema`](attest_types::TagSchema)
//! is present.
//!
//! ```
//! use attester::{Ledger, ProgressStore, ScriptedSource, Session};
//! use attest_types::{Entry, TagSchema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let entries = vec![Entry::new("foneme"), Entry::new("morfeme")];
//! let schema = TagSchema::new(["cit"])?;
//! let ledger = Ledger::open(dir.path().join("annotated.json"))?;
//! let progress = ProgressStore::new(dir.path().join(".annotation_progress"));
//!
//! let mut session = Session::open(entries, schema, ledger, progress)?;
//! let mut operator = ScriptedSource::new(["cit", "c1(A, 1)", "d", "q"]);
//! let summary = session.run(&mut operator)?;
//! assert_eq!(summary.cursor, 1);
//! assert_eq!(session.ledger().len(), 1);
//! # Ok(()) }
//! ```

pub mod config;
pub mod console;
pub mod ledger;
pub mod progress;
pub mod scan;
pub mod schema;
pub mod session;
pub mod vocab;

pub use console::{CommandSource, Console, History, ScriptedSource};
pub use ledger::{Ledger, LedgerError};
pub use progress::{ProgressError, ProgressStore};
pub use scan::{STOP_TOKEN, ScanOutcome, scan, write_responses};
pub use schema::{SCHEMA_SENTINEL, SchemaError, SchemaStore, parse_tag_list};
pub use session::{
    Command, Session, SessionError, SessionState, SessionSummary, Step, check_required_tags,
};
pub use vocab::Vocabulary;
