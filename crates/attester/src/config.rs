use std::path::PathBuf;

use attest_report::{
    DEFAULT_SOURCES_CAPTION, DEFAULT_SOURCES_LABEL, DEFAULT_SUMMARY_CAPTION,
    DEFAULT_SUMMARY_LABEL,
};
use attest_types::CitationTags;
use clap::{Args, Parser, Subcommand};

pub const DEFAULT_CORPUS: &str = "dict-conjugated.json.gz";
pub const DEFAULT_LEDGER: &str = "annotated_citations.json";
pub const DEFAULT_PROGRESS: &str = ".annotation_progress";
pub const DEFAULT_SCHEMA: &str = ".required_tags";
pub const DEFAULT_HISTORY: &str = ".annotation_history";
pub const DEFAULT_SCAN_OUTPUT: &str = "reme_defs.txt";

#[derive(Debug, Parser)]
#[command(name = "attester")]
#[command(about = "Annotate dictionary entries and report citation statistics")]
#[command(version)]
pub struct Cli {
    /// Disable coloured highlighting. A non-empty NO_COLOR does the same.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Tag matching entries interactively, resuming where the last run stopped.
    Annotate(AnnotateArgs),
    /// Summarise the ledger as console tables, LaTeX or JSON.
    Report(ReportArgs),
    /// Collect one free-form response per matching entry.
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    #[arg(long, env = "ATTESTER_CORPUS", default_value = DEFAULT_CORPUS)]
    pub corpus: PathBuf,

    /// Regex over definitions; prompted for when omitted.
    #[arg(long)]
    pub pattern: Option<String>,

    /// Use the built-in morpheme rule without prompting.
    #[arg(long, conflicts_with = "pattern")]
    pub default_pattern: bool,
}

#[derive(Debug, Args)]
pub struct AnnotateArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(long, env = "ATTESTER_LEDGER", default_value = DEFAULT_LEDGER)]
    pub ledger: PathBuf,

    #[arg(long, env = "ATTESTER_PROGRESS", default_value = DEFAULT_PROGRESS)]
    pub progress: PathBuf,

    #[arg(long, env = "ATTESTER_SCHEMA", default_value = DEFAULT_SCHEMA)]
    pub schema: PathBuf,

    #[arg(long, env = "ATTESTER_HISTORY", default_value = DEFAULT_HISTORY)]
    pub history: PathBuf,

    /// Required tags to use when no schema has been saved yet.
    #[arg(long, value_delimiter = ',')]
    pub required_tags: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(long, env = "ATTESTER_LEDGER", default_value = DEFAULT_LEDGER)]
    pub ledger: PathBuf,

    #[command(flatten)]
    pub tags: TagNameArgs,

    /// Emit LaTeX macros and tables instead of console tables.
    #[arg(long, conflicts_with = "json")]
    pub latex: bool,

    #[arg(long)]
    pub json: bool,

    #[arg(long, default_value = DEFAULT_SUMMARY_CAPTION)]
    pub summary_caption: String,

    #[arg(long, default_value = DEFAULT_SUMMARY_LABEL)]
    pub summary_label: String,

    #[arg(long, default_value = DEFAULT_SOURCES_CAPTION)]
    pub sources_caption: String,

    #[arg(long, default_value = DEFAULT_SOURCES_LABEL)]
    pub sources_label: String,
}

#[derive(Debug, Args)]
pub struct TagNameArgs {
    #[arg(long, default_value = "cit")]
    pub citation_tag: String,

    #[arg(long, default_value = "sujs")]
    pub subject_tag: String,

    #[arg(long, default_value = "sujp")]
    pub predicate_tag: String,
}

impl TagNameArgs {
    pub fn citation_tags(&self) -> CitationTags {
        CitationTags {
            citation: self.citation_tag.clone(),
            subordinate_subject: self.subject_tag.clone(),
            predicate_subject: self.predicate_tag.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Index of the first matching entry to show.
    #[arg(long, default_value_t = 0)]
    pub start: usize,

    #[arg(long, short, default_value = DEFAULT_SCAN_OUTPUT)]
    pub output: PathBuf,
}
