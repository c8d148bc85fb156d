use attest_report::{aggregate, render_latex_summary, render_source_table};
use attest_types::{CitationTags, Entry};

const LEDGER: &str = r#"[
    {"d": "foneme (1)", "tags": {"cit": "c1(Anchieta, 1595, 12)", "sujs": "ele", "sujp": "ele"}},
    {"d": "foneme (2)", "tags": {"cit": "c2(Anchieta, 1595, 40)", "sujs": "ele", "sujp": "eu"}},
    {"d": "foneme (3)", "tags": {"cit": "c3(Araujo, 1618)", "sujs": "nós", "sujp": "eles"}},
    {"d": "foneme (4)", "tags": {"cit": "c3(Araujo, 1618)", "sujs": "nós", "sujp": "nós"}},
    {"d": "casa", "tags": {}}
]"#;

#[test]
fn reports_over_a_ledger_file_payload() {
    let entries: Vec<Entry> = serde_json::from_str(LEDGER).unwrap();
    let report = aggregate(&entries, &CitationTags::default());

    let stats = &report.statistics;
    assert_eq!(stats.total_unique_citations, 3);
    assert_eq!(stats.same_subject_count, 1);
    assert_eq!(stats.different_subject_count, 2);
    assert_eq!(stats.same_subject_frequency_pct, 33.33);
    assert_eq!(stats.different_subject_frequency_pct, 66.67);
    assert!(stats.conjunctive_marks_ds);
    assert!(stats.conjunctive_marks_ss);

    let sources: Vec<_> = report
        .sources
        .iter()
        .map(|s| (s.source.as_str(), s.citations, s.same_subject))
        .collect();
    assert_eq!(sources, vec![("Anchieta, 1595", 2, 1), ("Araujo, 1618", 1, 0)]);

    let table = render_source_table(&report);
    assert_eq!(table.lines().count(), 3);
    let latex = render_latex_summary(stats, "c", "l");
    assert!(latex.contains(r"\newcommand{\dsFrequency}{66.67}"));
}

#[test]
fn report_serializes_for_machine_consumers() {
    let entries: Vec<Entry> = serde_json::from_str(LEDGER).unwrap();
    let report = aggregate(&entries, &CitationTags::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["statistics"]["total_unique_citations"], 3);
    assert_eq!(json["statistics"]["conjunctive_marks_ss"], true);
    assert_eq!(json["sources"][0]["source"], "Anchieta, 1595");
}
