// Report assembly and rendering

use crate::antipattern::{AntipatternCategory, AntipatternReport, DarkMatterReport};
use crate::breadcrumbs::BreadcrumbReport;
use crate::centrality::{AuthorityReport, CentralityReport};
use crate::config::HitsMode;
use crate::connectivity::{ArchitectureReport, ConnectivityReport};
use crate::metrics::{ClusteringReport, StructuralMetrics};
use crate::model::RankedUrl;
use crate::pathways::PathwayReport;
use crate::patterns::LinkPatternReport;
use crate::topology::TopologyReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitegraph_graph::LinkStats;
use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────────────────────────";
const TEXT_LIST_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generator: String,
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub pages: usize,
}

impl ReportMetadata {
    pub fn new(pages: usize) -> Self {
        Self {
            generator: "sitegraph".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            pages,
        }
    }
}

/// Everything one analysis run produces for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReport {
    pub metadata: ReportMetadata,
    pub link_stats: LinkStats,
    pub structure: StructuralMetrics,
    pub clustering: ClusteringReport,
    pub centrality: CentralityReport,
    pub authority: AuthorityReport,
    pub topology: TopologyReport,
    pub connectivity: ConnectivityReport,
    pub architecture: ArchitectureReport,
    pub pathways: PathwayReport,
    pub breadcrumbs: BreadcrumbReport,
    pub antipatterns: AntipatternReport,
    pub dark_matter: DarkMatterReport,
    pub link_patterns: LinkPatternReport,
}

/// Render `report` in the requested format.
pub fn render_report(report: &SiteReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Json => generate_json_report(report),
        ReportFormat::Markdown => Ok(generate_markdown_report(report)),
    }
}

fn section(report: &mut String, title: &str) {
    report.push_str(RULE);
    report.push('\n');
    report.push_str(title);
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");
}

fn ranked_lines<T: Display>(report: &mut String, title: &str, ranked: &[RankedUrl<T>]) {
    if ranked.is_empty() {
        return;
    }
    report.push_str(&format!("{}:\n", title));
    for (idx, entry) in ranked.iter().take(TEXT_LIST_LIMIT).enumerate() {
        report.push_str(&format!("  {:>2}. {}  ({})\n", idx + 1, entry.url, entry.score));
    }
    report.push('\n');
}

fn category_line<T>(report: &mut String, label: &str, category: &AntipatternCategory<T>) {
    report.push_str(&format!(
        "  {:<18}{:>6}  [{}]\n",
        label,
        category.count,
        category.severity.as_str().to_uppercase()
    ));
}

fn hits_mode_label(mode: &HitsMode) -> String {
    match mode {
        HitsMode::SinglePass => "single pass".to_string(),
        HitsMode::Converge {
            max_iterations,
            tolerance,
        } => format!("converge (max {}, tol {})", max_iterations, tolerance),
    }
}

pub fn generate_text_report(data: &SiteReport) -> String {
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                        SITEGRAPH LINK STRUCTURE REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!(
        "Generated:    {}\n",
        data.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("Pages:        {}\n", data.structure.nodes));
    report.push_str(&format!("Edges:        {}\n", data.structure.edges));
    report.push_str(&format!(
        "Links:        {} total, {} internal, {} external, {} dropped\n",
        data.link_stats.total_links,
        data.link_stats.internal_edges,
        data.link_stats.external_links,
        data.link_stats.fragment_links
            + data.link_stats.self_links
            + data.link_stats.unknown_targets
            + data.link_stats.duplicate_links
            + data.link_stats.malformed_links
    ));
    report.push('\n');

    // Structure
    section(&mut report, "STRUCTURE");
    let s = &data.structure;
    report.push_str(&format!("Density:              {:.4}\n", s.density));
    report.push_str(&format!("Average degree:       {:.2}\n", s.average_degree));
    report.push_str(&format!(
        "In / out degree:      avg {:.2} / {:.2}, max {} / {}\n",
        s.average_in_degree, s.average_out_degree, s.max_in_degree, s.max_out_degree
    ));
    report.push_str(&format!("Reciprocity:          {:.4}\n", s.reciprocity));
    report.push_str(&format!(
        "Global clustering:    {:.4}\n\n",
        data.clustering.global_clustering_coefficient
    ));
    ranked_lines(
        &mut report,
        "Highly clustered pages",
        &data.clustering.highly_clustered_pages,
    );

    // Centrality
    section(&mut report, "CENTRALITY");
    ranked_lines(&mut report, "Top by degree", &data.centrality.top_by_degree);
    ranked_lines(&mut report, "Top by in-degree", &data.centrality.top_by_in_degree);
    ranked_lines(&mut report, "Top by out-degree", &data.centrality.top_by_out_degree);
    ranked_lines(
        &mut report,
        "Top by betweenness (depth proxy)",
        &data.centrality.top_by_betweenness,
    );
    report.push_str(&format!(
        "HITS: {}, {} iteration(s), converged: {}\n\n",
        hits_mode_label(&data.authority.mode),
        data.authority.iterations,
        data.authority.converged
    ));
    ranked_lines(&mut report, "Top authorities", &data.authority.top_authorities);
    ranked_lines(&mut report, "Top hubs", &data.authority.top_hubs);

    // Topology
    section(&mut report, "TOPOLOGY");
    let t = &data.topology;
    match t.detected {
        Some(topology) if t.available => {
            report.push_str(&format!(
                "Detected:     {} (confidence {:.2}{})\n",
                topology.as_str().to_uppercase(),
                t.confidence,
                if t.conclusive { "" } else { ", inconclusive" }
            ));
            if let Some(expected) = t.expected {
                report.push_str(&format!(
                    "Expected:     {} ({})\n",
                    expected,
                    if t.matches_expected == Some(true) {
                        "match"
                    } else {
                        "mismatch"
                    }
                ));
            }
            for score in &t.scores {
                report.push_str(&format!("  {:<14}{:.3}\n", score.topology.as_str(), score.score));
            }
            let c = &t.characteristics;
            report.push_str(&format!(
                "\nHubs: {} (in-degree >= {:.2}), in/out centralization {:.3} / {:.3}, avg depth {:.2}\n\n",
                c.hub_count, c.hub_threshold, c.in_centralization, c.out_centralization, c.avg_depth
            ));
        }
        _ => report.push_str("Not available for an empty batch.\n\n"),
    }

    // Connectivity
    section(&mut report, "CONNECTIVITY & ARCHITECTURE");
    let conn = &data.connectivity;
    report.push_str(&format!("Components:           {}\n", conn.total_components));
    report.push_str(&format!(
        "Largest component:    {} ({:.1}%)\n",
        conn.largest_component_size, conn.largest_component_percentage
    ));
    report.push_str(&format!("Isolated pages:       {}\n", conn.isolated_pages));
    let arch = &data.architecture;
    report.push_str(&format!(
        "Architecture:         {}\n",
        arch.architecture_type.as_str().to_uppercase()
    ));
    report.push_str(&format!("Max depth:            {}\n", arch.max_depth));
    report.push_str(&format!(
        "Children per parent:  {:.2}\n",
        arch.avg_children_per_parent
    ));
    report.push_str(&format!("Structural orphans:   {}\n\n", arch.orphan_pages));

    // Pathways
    section(&mut report, "PATHWAYS");
    let p = &data.pathways;
    report.push_str(&format!("Entry points:         {}\n", p.entry_point_count));
    report.push_str(&format!("Navigation hubs:      {}\n", p.navigation_hub_count));
    report.push_str(&format!(
        "Dead ends:            {} ({:.1}%)\n",
        p.dead_ends.count, p.dead_ends.percentage
    ));
    report.push_str(&format!("Bottleneck candidates: {}\n", p.bottleneck_count));
    report.push_str(&format!(
        "Hierarchy clarity:    {:.1}%\n\n",
        p.hierarchy.hierarchy_clarity_percentage
    ));
    if !p.top_pathways.is_empty() {
        report.push_str("Common pathways:\n");
        for pathway in p.top_pathways.iter().take(TEXT_LIST_LIMIT) {
            report.push_str(&format!("  {:>4}x  {}\n", pathway.frequency, pathway.pathway));
        }
        report.push('\n');
    }

    // Breadcrumbs
    section(&mut report, "BREADCRUMBS");
    let b = &data.breadcrumbs;
    if b.available {
        report.push_str(&format!("Consistency score:    {:.1}\n", b.consistency_score));
        report.push_str(&format!(
            "Issues:               {} of {} relationships\n\n",
            b.total_issues, b.total_relationships
        ));
        for issue in b.issues.iter().take(TEXT_LIST_LIMIT) {
            report.push_str(&format!(
                "  [{}] {}\n      {} -> {}\n",
                issue.severity.as_str().to_uppercase(),
                issue.issue,
                issue.parent_url,
                issue.url
            ));
        }
        report.push('\n');
    } else {
        report.push_str("Not available for an empty batch.\n\n");
    }

    // Antipatterns
    section(&mut report, "ANTIPATTERNS");
    let a = &data.antipatterns;
    if a.available {
        report.push_str(&format!(
            "Severity score: {} / 100   Total issues: {}\n\n",
            a.severity_score, a.total_issues
        ));
        category_line(&mut report, "Orphan pages", &a.orphan_pages);
        category_line(&mut report, "Bottlenecks", &a.bottleneck_pages);
        category_line(&mut report, "Dead ends", &a.dead_end_pages);
        category_line(&mut report, "Circular pairs", &a.circular_pairs);
        category_line(&mut report, "Overloaded hubs", &a.overloaded_hubs);
        report.push('\n');
    } else {
        report.push_str("Not available for an empty batch.\n\n");
    }

    // Dark matter
    section(&mut report, "DARK MATTER");
    let d = &data.dark_matter;
    if d.available {
        report.push_str(&format!(
            "Dark matter pages:    {} ({:.1}%), avg depth {:.2}\n\n",
            d.count, d.percentage, d.avg_depth
        ));
        for page in d.pages.iter().take(TEXT_LIST_LIMIT) {
            report.push_str(&format!(
                "  {}  (depth {}, in {}, score {})\n",
                page.url, page.depth, page.in_degree, page.dark_matter_score
            ));
        }
        if !d.recommendations.is_empty() {
            report.push_str("\nRecommendations:\n");
            for recommendation in &d.recommendations {
                report.push_str(&wrap_text(recommendation, 80, "  "));
            }
        }
        report.push('\n');
    } else {
        report.push_str("Not available for an empty batch.\n\n");
    }

    // Link patterns
    section(&mut report, "LINK PATTERNS");
    let lp = &data.link_patterns;
    report.push_str(&format!(
        "Self: {}   Fragment: {}   External: {}   Sibling: {}\n",
        lp.patterns.self_links,
        lp.patterns.fragment_links,
        lp.patterns.external_links,
        lp.patterns.sibling_links
    ));
    report.push_str(&format!(
        "Linked domains: {} (diversity {:.3})   Communities: {}\n",
        lp.domains.unique_domains_linked,
        lp.domains.domain_diversity_score,
        lp.communities.total_communities
    ));
    report.push_str(THIN_RULE);
    report.push_str("\n\n");

    // Footer
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                          End of Report\n");
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!(
        "\nGenerated by {} {}\n\n",
        data.metadata.generator, data.metadata.version
    ));

    report
}

pub fn generate_json_report(data: &SiteReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(data)
}

fn markdown_ranking<T: Display>(report: &mut String, title: &str, ranked: &[RankedUrl<T>]) {
    if ranked.is_empty() {
        return;
    }
    report.push_str(&format!("### {}\n\n| # | URL | Score |\n|---|-----|-------|\n", title));
    for (idx, entry) in ranked.iter().enumerate() {
        report.push_str(&format!("| {} | {} | {} |\n", idx + 1, entry.url, entry.score));
    }
    report.push('\n');
}

pub fn generate_markdown_report(data: &SiteReport) -> String {
    let mut report = String::new();

    report.push_str("# Site Link Structure Report\n\n");
    report.push_str(&format!(
        "_Generated by {} {} at {}_\n\n",
        data.metadata.generator,
        data.metadata.version,
        data.metadata.generated_at.to_rfc3339()
    ));

    report.push_str("## Structure\n\n| Metric | Value |\n|--------|-------|\n");
    let s = &data.structure;
    report.push_str(&format!("| Pages | {} |\n", s.nodes));
    report.push_str(&format!("| Edges | {} |\n", s.edges));
    report.push_str(&format!("| Density | {:.4} |\n", s.density));
    report.push_str(&format!("| Average degree | {:.2} |\n", s.average_degree));
    report.push_str(&format!("| Reciprocity | {:.4} |\n", s.reciprocity));
    report.push_str(&format!(
        "| Global clustering | {:.4} |\n",
        data.clustering.global_clustering_coefficient
    ));
    report.push_str(&format!("| External links | {} |\n\n", data.link_stats.external_links));

    report.push_str("## Centrality\n\n");
    markdown_ranking(&mut report, "Top by degree", &data.centrality.top_by_degree);
    markdown_ranking(&mut report, "Top authorities", &data.authority.top_authorities);
    markdown_ranking(&mut report, "Top hubs", &data.authority.top_hubs);

    report.push_str("## Topology\n\n");
    match data.topology.detected {
        Some(topology) => {
            report.push_str(&format!(
                "**{}** with confidence {:.2}\n\n| Archetype | Score |\n|-----------|-------|\n",
                topology, data.topology.confidence
            ));
            for score in &data.topology.scores {
                report.push_str(&format!("| {} | {:.3} |\n", score.topology, score.score));
            }
            report.push('\n');
        }
        None => report.push_str("Not available.\n\n"),
    }

    report.push_str("## Connectivity\n\n");
    let conn = &data.connectivity;
    report.push_str(&format!(
        "- Components: {}\n- Largest component: {} ({:.1}%)\n- Isolated pages: {}\n- Architecture: {}\n\n",
        conn.total_components,
        conn.largest_component_size,
        conn.largest_component_percentage,
        conn.isolated_pages,
        data.architecture.architecture_type
    ));

    report.push_str("## Pathways\n\n");
    let p = &data.pathways;
    report.push_str(&format!(
        "- Entry points: {}\n- Navigation hubs: {}\n- Dead ends: {} ({:.1}%)\n- Unique pathways: {}\n- Hierarchy clarity: {:.1}%\n- Bottleneck candidates: {}\n\n",
        p.entry_point_count,
        p.navigation_hub_count,
        p.dead_ends.count,
        p.dead_ends.percentage,
        p.total_unique_pathways,
        p.hierarchy.hierarchy_clarity_percentage,
        p.bottleneck_count
    ));
    if !p.top_pathways.is_empty() {
        report.push_str("| Pathway | Pages |\n|---------|-------|\n");
        for pathway in p.top_pathways.iter().take(TEXT_LIST_LIMIT) {
            report.push_str(&format!("| {} | {} |\n", pathway.pathway, pathway.frequency));
        }
        report.push('\n');
    }

    report.push_str("## Breadcrumbs\n\n");
    if data.breadcrumbs.available {
        report.push_str(&format!(
            "Consistency score **{:.1}** ({} issues over {} relationships)\n\n",
            data.breadcrumbs.consistency_score,
            data.breadcrumbs.total_issues,
            data.breadcrumbs.total_relationships
        ));
    } else {
        report.push_str("Not available.\n\n");
    }

    report.push_str("## Antipatterns\n\n");
    let a = &data.antipatterns;
    if a.available {
        report.push_str("| Category | Count | Severity |\n|----------|-------|----------|\n");
        let rows = [
            ("Orphan pages", a.orphan_pages.count, a.orphan_pages.severity),
            ("Bottlenecks", a.bottleneck_pages.count, a.bottleneck_pages.severity),
            ("Dead ends", a.dead_end_pages.count, a.dead_end_pages.severity),
            ("Circular pairs", a.circular_pairs.count, a.circular_pairs.severity),
            ("Overloaded hubs", a.overloaded_hubs.count, a.overloaded_hubs.severity),
        ];
        for (label, count, severity) in rows {
            report.push_str(&format!("| {} | {} | {} |\n", label, count, severity.as_str()));
        }
        report.push_str(&format!("\nSeverity score: **{}** / 100\n\n", a.severity_score));
    } else {
        report.push_str("Not available.\n\n");
    }

    report.push_str("## Dark Matter\n\n");
    if data.dark_matter.available {
        report.push_str(&format!(
            "{} pages ({:.1}%)\n\n",
            data.dark_matter.count, data.dark_matter.percentage
        ));
        for recommendation in &data.dark_matter.recommendations {
            report.push_str(&format!("- {}\n", recommendation));
        }
        report.push('\n');
    } else {
        report.push_str("Not available.\n\n");
    }

    report.push_str("## Link Patterns\n\n");
    let lp = &data.link_patterns;
    report.push_str(&format!(
        "- Self links: {}\n- Fragment links: {}\n- External links: {}\n- Sibling links: {}\n- Linked domains: {}\n- Path communities: {}\n",
        lp.patterns.self_links,
        lp.patterns.fragment_links,
        lp.patterns.external_links,
        lp.patterns.sibling_links,
        lp.domains.unique_domains_linked,
        lp.communities.total_communities
    ));

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();
    let available = width.saturating_sub(indent.len());

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 > available && !current_line.is_empty() {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
