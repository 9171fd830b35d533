use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_core::report::{ReportFormat, SiteReport, render_report, save_report};
use sitegraph_core::{AnalysisConfig, HitsMode, Topology, run_pipeline};
use sitegraph_graph::PageRecord;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Expand `~` and environment variables in a user supplied path.
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).with_context(|| format!("Failed to expand path {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Parse one JSON Lines entry, warning about and skipping bad lines.
pub fn parse_record_line(line: &str, line_number: usize) -> Option<PageRecord> {
    match PageRecord::from_json_line(line) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipping line {}: {}", line_number, e);
            None
        }
    }
}

/// Decode a batch given either as a JSON array or as JSON Lines.
pub fn parse_records(content: &str) -> Result<Vec<PageRecord>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('[') {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(trimmed).context("Input looks like a JSON array but does not parse")?;
        let records = values
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value::<PageRecord>(value) {
                Ok(record) if !record.url.trim().is_empty() => Some(record),
                Ok(_) => {
                    warn!("Skipping array entry {}: record has no url", idx);
                    None
                }
                Err(e) => {
                    warn!("Skipping array entry {}: {}", idx, e);
                    None
                }
            })
            .collect();
        return Ok(records);
    }

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| parse_record_line(line.trim(), idx + 1))
        .collect())
}

/// Load a batch of page records from a file.
pub fn load_records_from_file(path: &Path) -> Result<Vec<PageRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;

    let records = parse_records(&content)?;
    if records.is_empty() {
        bail!("No valid page records found in {}", path.display());
    }

    Ok(records)
}

/// Config file values (or defaults) with command line overrides applied.
pub fn resolve_config(args: &ArgMatches) -> Result<AnalysisConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => {
            let path = expand_path(path)?;
            AnalysisConfig::load(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(name) = args.get_one::<String>("expected-topology") {
        let topology = Topology::from_str(name).map_err(anyhow::Error::msg)?;
        config = config.with_expected_topology(topology);
    }
    if let Some(&iterations) = args.get_one::<usize>("hits-iterations") {
        config = config.with_hits(HitsMode::from_iterations(iterations));
    }
    if let Some(&workers) = args.get_one::<usize>("workers") {
        config = config.with_max_concurrent_tasks(workers);
    }

    config.validate()?;
    Ok(config)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub fn print_summary(report: &SiteReport) {
    print_divider();
    println!("{}", "  ANALYSIS SUMMARY".bright_white().bold());
    print_divider();
    println!(
        "{} Pages: {}   Edges: {}",
        "→".blue(),
        report.structure.nodes.to_string().bright_white(),
        report.structure.edges.to_string().bright_white()
    );
    if let Some(topology) = report.topology.detected {
        println!(
            "{} Topology: {} ({:.2})",
            "→".blue(),
            topology.as_str().to_uppercase().cyan(),
            report.topology.confidence
        );
    }
    println!(
        "{} Components: {}   Architecture: {}",
        "→".blue(),
        report.connectivity.total_components.to_string().bright_white(),
        report.architecture.architecture_type.as_str().cyan()
    );

    let score = report.antipatterns.severity_score;
    let score_text = format!("{}/100", score);
    let score_text = match score {
        0..=30 => score_text.green(),
        31..=60 => score_text.yellow(),
        _ => score_text.red(),
    };
    println!(
        "{} Antipattern severity: {}   Issues: {}",
        "→".blue(),
        score_text.bold(),
        report.antipatterns.total_issues
    );
    println!();
}

pub async fn handle_analyze(args: &ArgMatches, quiet: bool) -> Result<()> {
    let input = args
        .get_one::<String>("input")
        .context("--input is required")?;
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let Some(format) = ReportFormat::from_str(format_name) else {
        bail!("Unknown report format: {}", format_name);
    };

    let config = resolve_config(args)?;
    let records = load_records_from_file(&expand_path(input)?)?;

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };
    spinner.set_message(format!("Analyzing {} page records...", records.len()));

    let report = run_pipeline(records, config).await;
    spinner.finish_and_clear();

    if !quiet {
        print_summary(&report);
    }

    let content = render_report(&report, format)?;
    match args.get_one::<String>("output") {
        Some(output) => {
            let path = expand_path(output)?;
            save_report(&content, &path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", content),
    }

    Ok(())
}
