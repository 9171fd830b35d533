// Tests for report generation functionality

use sitegraph_core::report::{
    ReportFormat, SiteReport, generate_json_report, generate_markdown_report,
    generate_text_report, render_report, save_report, wrap_text,
};
use sitegraph_core::{AnalysisConfig, Topology, analyze};
use sitegraph_graph::PageRecord;
use tempfile::TempDir;

fn page(url: &str, depth: u32, links: &[&str]) -> PageRecord {
    PageRecord::new(url)
        .with_depth(depth)
        .with_links(links.iter().copied())
}

fn sample_report() -> SiteReport {
    let records = vec![
        page("https://example.com/", 0, &["/a", "/b", "https://other.org/"]),
        page("https://example.com/a", 1, &["/c"]).with_parent("https://example.com/"),
        page("https://example.com/b", 1, &["/c"]).with_parent("https://example.com/"),
        page("https://example.com/c", 2, &[]).with_parent("https://example.com/a"),
    ];
    let config = AnalysisConfig::default().with_expected_topology(Topology::Hierarchical);
    analyze(&records, &config)
}

fn empty_report() -> SiteReport {
    analyze(&[], &AnalysisConfig::default())
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("markdown"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!(ReportFormat::from_str("TEXT"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("Json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("MarkDown"), Some(ReportFormat::Markdown));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert_eq!(ReportFormat::from_str("csv"), None);
    assert_eq!(ReportFormat::from_str("html"), None);
    assert_eq!(ReportFormat::from_str(""), None);
}

#[test]
fn test_report_format_extension() {
    assert_eq!(ReportFormat::Text.extension(), "txt");
    assert_eq!(ReportFormat::Json.extension(), "json");
    assert_eq!(ReportFormat::Markdown.extension(), "md");
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_sections() {
    let text = generate_text_report(&sample_report());

    assert!(text.contains("SITEGRAPH LINK STRUCTURE REPORT"));
    for section in [
        "STRUCTURE",
        "CENTRALITY",
        "TOPOLOGY",
        "CONNECTIVITY & ARCHITECTURE",
        "PATHWAYS",
        "BREADCRUMBS",
        "ANTIPATTERNS",
        "DARK MATTER",
        "LINK PATTERNS",
    ] {
        assert!(text.contains(section), "missing section {}", section);
    }
    assert!(text.contains("End of Report"));
    assert!(text.contains("https://example.com/c"));
}

#[test]
fn test_text_report_empty_batch() {
    let text = generate_text_report(&empty_report());
    assert!(text.contains("Not available for an empty batch."));
    assert!(text.contains("End of Report"));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_is_valid() {
    let json = generate_json_report(&sample_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["metadata"]["generator"], "sitegraph");
    assert_eq!(value["metadata"]["pages"], 4);
    assert_eq!(value["structure"]["nodes"], 4);
    assert_eq!(value["topology"]["expected"], "hierarchical");
    assert_eq!(value["link_stats"]["external_links"], 1);
}

#[test]
fn test_json_report_reads_back() {
    let report = sample_report();
    let json = generate_json_report(&report).unwrap();
    let parsed: SiteReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_json_report_empty_batch() {
    let json = generate_json_report(&empty_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["topology"]["available"], false);
    assert_eq!(value["topology"]["detected"], serde_json::Value::Null);
    assert_eq!(value["antipatterns"]["available"], false);
}

// ============================================================================
// Markdown Report Tests
// ============================================================================

#[test]
fn test_markdown_report_sections() {
    let md = generate_markdown_report(&sample_report());

    assert!(md.starts_with("# Site Link Structure Report"));
    assert!(md.contains("## Structure"));
    assert!(md.contains("## Topology"));
    assert!(md.contains("## Pathways"));
    assert!(md.contains("## Antipatterns"));
    assert!(md.contains("## Link Patterns"));
    assert!(md.contains("| Pages | 4 |"));
}

#[test]
fn test_markdown_report_empty_batch() {
    let md = generate_markdown_report(&empty_report());
    assert!(md.contains("Not available."));
}

// ============================================================================
// Rendering & Saving Tests
// ============================================================================

#[test]
fn test_render_report_dispatches_on_format() {
    let report = sample_report();
    assert_eq!(
        render_report(&report, ReportFormat::Text).unwrap(),
        generate_text_report(&report)
    );
    assert_eq!(
        render_report(&report, ReportFormat::Markdown).unwrap(),
        generate_markdown_report(&report)
    );
    assert!(
        render_report(&report, ReportFormat::Json)
            .unwrap()
            .trim_start()
            .starts_with('{')
    );
}

#[test]
fn test_save_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.md");

    save_report("# hello\n", &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hello\n");
}

#[test]
fn test_save_report_missing_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope").join("report.txt");
    assert!(save_report("x", &path).is_err());
}

// ============================================================================
// Text Wrapping Tests
// ============================================================================

#[test]
fn test_wrap_text_short() {
    assert_eq!(wrap_text("short line", 80, "  "), "  short line\n");
}

#[test]
fn test_wrap_text_breaks_long_lines() {
    let wrapped = wrap_text("one two three four five", 12, "  ");
    for line in wrapped.lines() {
        assert!(line.len() <= 12);
        assert!(line.starts_with("  "));
    }
    assert_eq!(wrapped.lines().count(), 3);
}

#[test]
fn test_wrap_text_empty() {
    assert_eq!(wrap_text("", 80, "  "), "");
}
