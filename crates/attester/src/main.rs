use std::env;
use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use attest_corpus::{Corpus, Pattern};
use attest_report::{
    aggregate, render_latex_sources, render_latex_summary, render_source_table, render_summary,
};
use attest_types::Entry;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use yansi::Paint;

use attester::config::{AnnotateArgs, Cli, Commands, FilterArgs, ReportArgs, ScanArgs};
use attester::{
    CommandSource, Console, History, Ledger, ProgressStore, SchemaStore, Session, Vocabulary,
    scan, write_responses,
};

const PATTERN_PROMPT: &str = "Enter regex pattern to filter entries (or press Enter for default): ";

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    if cli.no_color || env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        Paint::disable();
    }

    match cli.command {
        Commands::Annotate(args) => run_annotate(args),
        Commands::Report(args) => run_report(args),
        Commands::Scan(args) => run_scan(args),
    }
}

fn run_annotate(args: AnnotateArgs) -> Result<()> {
    let history = History::load(&args.history)
        .with_context(|| format!("failed to read history {}", args.history.display()))?;
    let mut console = Console::stdio(history);

    let (entries, pattern) = load_matching(&args.filter, &mut console)?;

    let schema = SchemaStore::new(&args.schema).load_or_init(&args.required_tags, &mut console)?;
    let ledger = Ledger::open(&args.ledger)?;

    let mut vocab = Vocabulary::new();
    vocab.extend(schema.names());
    for entry in ledger.entries() {
        vocab.extend(entry.tags.iter().flat_map(|(name, value)| [name, value]));
    }

    let progress = ProgressStore::new(&args.progress);
    let mut session = Session::open(entries, schema, ledger, progress)?
        .with_vocabulary(vocab)
        .with_highlight(pattern);
    let summary = session.run_console(&mut console)?;
    console.show(&format!(
        "Annotated {} entries this session; {} of {} matching entries behind the cursor.",
        summary.annotated, summary.cursor, summary.total
    ));
    if !summary.stopped {
        console.show("All matching entries have been visited.");
    }
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<()> {
    let ledger = Ledger::open(&args.ledger)?;
    if ledger.is_empty() {
        warn!("ledger {} has no entries", args.ledger.display());
    }
    let report = aggregate(ledger.entries(), &args.tags.citation_tags());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if args.latex {
        println!(
            "{}",
            render_latex_summary(
                &report.statistics,
                &args.summary_caption,
                &args.summary_label
            )
        );
        println!(
            "{}",
            render_latex_sources(&report, &args.sources_caption, &args.sources_label)
        );
    } else {
        print!("{}", render_source_table(&report));
        println!();
        print!("{}", render_summary(&report.statistics));
    }
    Ok(())
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let mut console = Console::stdio(History::in_memory());
    let (entries, pattern) = load_matching(&args.filter, &mut console)?;

    let outcome = scan(&entries, args.start, &pattern, &mut console)
        .context("failed to read scan responses")?;
    write_responses(&args.output, &outcome.responses)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    console.show(&format!(
        "Number of entries collected: {} (written to {}, next start {})",
        outcome.responses.len(),
        args.output.display(),
        outcome.next
    ));
    Ok(())
}

/// Load the corpus and keep the entries matching the chosen pattern.
fn load_matching(
    filter: &FilterArgs,
    source: &mut dyn CommandSource,
) -> Result<(Vec<Entry>, Pattern)> {
    let start = Instant::now();
    let corpus = Corpus::load(&filter.corpus)
        .with_context(|| format!("failed to load corpus {}", filter.corpus.display()))?;
    info!("corpus loaded in {} ms", start.elapsed().as_millis());

    let pattern = choose_pattern(filter, source)?;
    let entries = pattern.filter(corpus.entries());
    info!(
        "{} of {} entries match {:?}",
        entries.len(),
        corpus.len(),
        pattern.as_str()
    );
    Ok((entries, pattern))
}

fn choose_pattern(filter: &FilterArgs, source: &mut dyn CommandSource) -> Result<Pattern> {
    if filter.default_pattern {
        return Ok(Pattern::default_morpheme());
    }
    let raw = match &filter.pattern {
        Some(raw) => raw.clone(),
        None => source
            .next_line(PATTERN_PROMPT)
            .context("failed to read pattern")?
            .unwrap_or_default(),
    };
    if raw.trim().is_empty() {
        return Ok(Pattern::default_morpheme());
    }
    Ok(Pattern::new(raw.trim())?)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
