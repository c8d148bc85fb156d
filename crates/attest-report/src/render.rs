use std::fmt::Write;

use crate::{Report, Statistics};

pub const DEFAULT_SUMMARY_CAPTION: &str =
    "Linguistic analysis of conjunctive environments in Old Tupi.";
pub const DEFAULT_SUMMARY_LABEL: &str = "tab:conjunctive_analysis";
pub const DEFAULT_SOURCES_CAPTION: &str = "Annotation counts and SS counts per source.";
pub const DEFAULT_SOURCES_LABEL: &str = "tab:annotation_counts";

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Console key/value listing of the statistics.
pub fn render_summary(stats: &Statistics) -> String {
    let rows = [
        (
            "Total Entries (No Duplicates)",
            stats.total_unique_citations.to_string(),
        ),
        ("SS Count", stats.same_subject_count.to_string()),
        (
            "SS Frequency (%)",
            format!("{:.2}", stats.same_subject_frequency_pct),
        ),
        ("DS Count", stats.different_subject_count.to_string()),
        (
            "DS Frequency (%)",
            format!("{:.2}", stats.different_subject_frequency_pct),
        ),
        (
            "Conjunctive as DS Marker",
            yes_no(stats.conjunctive_marks_ds).to_string(),
        ),
        (
            "Conjunctive in SS Situation Permissible",
            yes_no(stats.conjunctive_marks_ss).to_string(),
        ),
    ];
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in rows {
        let _ = writeln!(out, "{key:<width$}  {value}");
    }
    out
}

/// Console table of per-source counts.
pub fn render_source_table(report: &Report) -> String {
    const HEADERS: [&str; 3] = ["Source", "Annotation Count", "SS Annotation Count"];
    if report.sources.is_empty() {
        return "No cited sources.\n".to_string();
    }

    let source_width = report
        .sources
        .iter()
        .map(|s| s.source.chars().count())
        .chain([HEADERS[0].len()])
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<source_width$}  {}  {}",
        HEADERS[0], HEADERS[1], HEADERS[2]
    );
    for row in &report.sources {
        let _ = writeln!(
            out,
            "{:<source_width$}  {:>w1$}  {:>w2$}",
            row.source,
            row.citations,
            row.same_subject,
            w1 = HEADERS[1].len(),
            w2 = HEADERS[2].len(),
        );
    }
    out
}

/// `\newcommand` definitions for every statistic.
pub fn render_latex_macros(stats: &Statistics) -> String {
    [
        format!(
            "\\newcommand{{\\totalN}}{{{}}}",
            stats.total_unique_citations
        ),
        format!("\\newcommand{{\\ssCount}}{{{}}}", stats.same_subject_count),
        format!(
            "\\newcommand{{\\ssFrequency}}{{{:.2}}}",
            stats.same_subject_frequency_pct
        ),
        format!(
            "\\newcommand{{\\dsCount}}{{{}}}",
            stats.different_subject_count
        ),
        format!(
            "\\newcommand{{\\dsFrequency}}{{{:.2}}}",
            stats.different_subject_frequency_pct
        ),
        format!(
            "\\newcommand{{\\conjunctiveDS}}{{{}}}",
            yes_no(stats.conjunctive_marks_ds)
        ),
        format!(
            "\\newcommand{{\\conjunctiveSS}}{{{}}}",
            yes_no(stats.conjunctive_marks_ss)
        ),
    ]
    .join("\n")
}

/// Macro block followed by a metrics table that references the macros.
pub fn render_latex_summary(stats: &Statistics, caption: &str, label: &str) -> String {
    let macros = render_latex_macros(stats);
    format!(
        r"
% Macro definitions
{macros}

\begin{{table}}[h!]
\centering
\begin{{tabular}}{{|l|l|}}
\hline
\textbf{{Metric}} & \textbf{{Value}} \\
\hline
Total Entries & \totalN \\
SS Count & \ssCount \\
SS Frequency (\%) & \ssFrequency \\
DS Count & \dsCount \\
DS Frequency (\%) & \dsFrequency \\
Conjunctive as DS Marker & \conjunctiveDS \\
Conjunctive in SS Situation Permissible & \conjunctiveSS \\
\hline
\end{{tabular}}
\caption{{{caption}}}
\label{{{label}}}
\end{{table}}
"
    )
}

/// Per-source DS/SS table.
pub fn render_latex_sources(report: &Report, caption: &str, label: &str) -> String {
    let rows = report
        .sources
        .iter()
        .map(|s| format!("{} & {} & {} \\\\", s.source, s.different_subject(), s.same_subject))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r"
\begin{{table}}[h!]
\centering
\begin{{tabular}}{{|l|c|c|}}
\hline
\textbf{{Source}} & \textbf{{DS Annotation Count}} & \textbf{{SS Annotation Count}} \\
\hline
{rows}
\hline
\end{{tabular}}
\caption{{{caption}}}
\label{{{label}}}
\end{{table}}
"
    )
}
