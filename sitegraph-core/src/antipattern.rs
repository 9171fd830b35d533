//! Architectural antipatterns and "dark matter" detection.
//!
//! Each `check_*` function looks for one kind of defect and grades it; the
//! `analyze_*` functions aggregate them the way a report section needs.

use crate::config::AnalysisConfig;
use crate::metrics::DegreeProfile;
use crate::model::{Severity, mean, percentage, ratio, sort_desc_by};
use serde::{Deserialize, Serialize};
use sitegraph_graph::{LinkGraph, NodeId};

const MAX_EXAMPLES: usize = 10;
const MAX_SEVERITY_SCORE: u32 = 100;

/// One graded antipattern category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntipatternCategory<T> {
    pub count: usize,
    pub percentage: f64,
    pub severity: Severity,
    pub examples: Vec<T>,
}

impl<T> Default for AntipatternCategory<T> {
    fn default() -> Self {
        Self {
            count: 0,
            percentage: 0.0,
            severity: Severity::Low,
            examples: Vec::new(),
        }
    }
}

impl<T> AntipatternCategory<T> {
    fn new(found: Vec<T>, total: usize, severity: Severity) -> Self {
        Self {
            count: found.len(),
            percentage: percentage(found.len(), total),
            severity,
            examples: found.into_iter().take(MAX_EXAMPLES).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckPage {
    pub url: String,
    pub in_degree: usize,
    pub out_degree: usize,
    pub risk_score: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    Bidirectional,
}

/// An ordered pair `(source, target)` whose reverse edge also exists.
///
/// Both orientations of a mutual link are reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircularPair {
    pub source: String,
    pub target: String,
    pub kind: CycleKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverloadedHub {
    pub url: String,
    pub in_degree: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AntipatternReport {
    pub available: bool,
    pub orphan_pages: AntipatternCategory<String>,
    pub bottleneck_pages: AntipatternCategory<BottleneckPage>,
    pub dead_end_pages: AntipatternCategory<String>,
    pub circular_pairs: AntipatternCategory<CircularPair>,
    pub overloaded_hubs: AntipatternCategory<OverloadedHub>,
    /// Sum of category weights, capped at 100. Higher is worse.
    pub severity_score: u32,
    pub total_issues: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkMatterPage {
    pub url: String,
    pub depth: u32,
    pub in_degree: usize,
    /// `depth * (2 - in_degree)`; for ranking only.
    pub dark_matter_score: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DarkMatterReport {
    pub available: bool,
    pub count: usize,
    pub percentage: f64,
    pub avg_depth: f64,
    pub severity: Option<Severity>,
    pub pages: Vec<DarkMatterPage>,
    pub recommendations: Vec<String>,
}

fn is_entry_point(graph: &LinkGraph, profile: &DegreeProfile, id: NodeId) -> bool {
    graph.depth(id) == 0 && profile.out_degree(id) > 0
}

/// Pages nothing links to, excluding crawl entry points.
pub fn check_orphans(graph: &LinkGraph, profile: &DegreeProfile) -> AntipatternCategory<String> {
    let orphans: Vec<String> = graph
        .node_ids()
        .filter(|&id| profile.in_degree(id) == 0 && !is_entry_point(graph, profile, id))
        .map(|id| graph.url(id).to_string())
        .collect();
    let n = graph.node_count();
    let severity = if orphans.len() as f64 > n as f64 * 0.1 {
        Severity::High
    } else if !orphans.is_empty() {
        Severity::Medium
    } else {
        Severity::Low
    };
    AntipatternCategory::new(orphans, n, severity)
}

/// Single-inbound pages fanning out to more than `min_out_degree` pages.
pub fn check_bottlenecks(
    graph: &LinkGraph,
    profile: &DegreeProfile,
    min_out_degree: usize,
) -> AntipatternCategory<BottleneckPage> {
    let mut bottlenecks: Vec<BottleneckPage> = graph
        .node_ids()
        .filter(|&id| profile.in_degree(id) == 1 && profile.out_degree(id) > min_out_degree)
        .map(|id| BottleneckPage {
            url: graph.url(id).to_string(),
            in_degree: 1,
            out_degree: profile.out_degree(id),
            risk_score: profile.out_degree(id),
        })
        .collect();
    sort_desc_by(&mut bottlenecks, |b| b.risk_score);

    let severity = match bottlenecks.len() {
        0 => Severity::Low,
        1..=5 => Severity::Medium,
        _ => Severity::High,
    };
    AntipatternCategory::new(bottlenecks, graph.node_count(), severity)
}

pub fn check_dead_ends(graph: &LinkGraph, profile: &DegreeProfile) -> AntipatternCategory<String> {
    let dead_ends: Vec<String> = graph
        .node_ids()
        .filter(|&id| profile.out_degree(id) == 0)
        .map(|id| graph.url(id).to_string())
        .collect();
    let n = graph.node_count();
    let severity = if dead_ends.len() as f64 > n as f64 * 0.2 {
        Severity::Medium
    } else {
        Severity::Low
    };
    AntipatternCategory::new(dead_ends, n, severity)
}

pub fn check_circular_pairs(graph: &LinkGraph) -> AntipatternCategory<CircularPair> {
    let pairs: Vec<CircularPair> = graph
        .edges()
        .filter(|&(source, target)| graph.has_edge(target, source))
        .map(|(source, target)| CircularPair {
            source: graph.url(source).to_string(),
            target: graph.url(target).to_string(),
            kind: CycleKind::Bidirectional,
        })
        .collect();
    // Mutual links are usually intentional navigation.
    AntipatternCategory::new(pairs, graph.edge_count(), Severity::Low)
}

/// Pages whose in-degree exceeds `factor` times the batch mean.
pub fn check_overloaded_hubs(
    graph: &LinkGraph,
    profile: &DegreeProfile,
    factor: f64,
) -> AntipatternCategory<OverloadedHub> {
    let threshold = profile.mean_in * factor;
    let mut hubs: Vec<OverloadedHub> = graph
        .node_ids()
        .filter(|&id| profile.in_degree(id) as f64 > threshold)
        .map(|id| OverloadedHub {
            url: graph.url(id).to_string(),
            in_degree: profile.in_degree(id),
        })
        .collect();
    sort_desc_by(&mut hubs, |h| h.in_degree);

    let severity = if hubs.len() > 3 {
        Severity::Medium
    } else {
        Severity::Low
    };
    AntipatternCategory::new(hubs, graph.node_count(), severity)
}

pub fn analyze_antipatterns(
    graph: &LinkGraph,
    profile: &DegreeProfile,
    config: &AnalysisConfig,
) -> AntipatternReport {
    if graph.is_empty() {
        return AntipatternReport::default();
    }

    let orphan_pages = check_orphans(graph, profile);
    let bottleneck_pages = check_bottlenecks(graph, profile, config.strict_bottleneck_out_degree);
    let dead_end_pages = check_dead_ends(graph, profile);
    let circular_pairs = check_circular_pairs(graph);
    let overloaded_hubs = check_overloaded_hubs(graph, profile, config.overload_factor);

    let graded = [
        (orphan_pages.severity, orphan_pages.count),
        (bottleneck_pages.severity, bottleneck_pages.count),
        (dead_end_pages.severity, dead_end_pages.count),
        (circular_pairs.severity, circular_pairs.count),
        (overloaded_hubs.severity, overloaded_hubs.count),
    ];
    let severity_score = graded
        .iter()
        .map(|(severity, _)| severity.score_weight())
        .sum::<u32>()
        .min(MAX_SEVERITY_SCORE);
    let total_issues = graded.iter().map(|(_, count)| count).sum();

    AntipatternReport {
        available: true,
        orphan_pages,
        bottleneck_pages,
        dead_end_pages,
        circular_pairs,
        overloaded_hubs,
        severity_score,
        total_issues,
    }
}

/// `depth * (2 - in_degree)`, 0 once a page has two or more inbound links.
/// Computed in `u64` so any record depth fits.
pub fn dark_matter_score(depth: u32, in_degree: usize) -> u64 {
    u64::from(depth) * 2u64.saturating_sub(in_degree as u64)
}

fn dark_matter_recommendations(pct: f64, avg_depth: f64, count: usize) -> Vec<String> {
    if count == 0 {
        return vec!["No dark matter URLs detected. Internal linking appears healthy.".to_string()];
    }

    let mut recommendations = Vec::new();
    if pct > 15.0 {
        recommendations.push(
            "CRITICAL: Over 15% of URLs are poorly linked. Review internal linking strategy."
                .to_string(),
        );
    }
    if pct > 5.0 {
        recommendations.push("Improve internal linking to deep content.".to_string());
        recommendations.push("Consider adding sitemap or navigation improvements.".to_string());
    }
    if avg_depth > 5.0 {
        recommendations.push(
            "Consider flattening site hierarchy: average dark matter depth is very high."
                .to_string(),
        );
    }
    recommendations
}

/// Deep pages with at most one inbound link, darkest first.
pub fn analyze_dark_matter(
    graph: &LinkGraph,
    profile: &DegreeProfile,
    min_depth: u32,
) -> DarkMatterReport {
    if graph.is_empty() {
        return DarkMatterReport::default();
    }

    let mut pages: Vec<DarkMatterPage> = graph
        .node_ids()
        .filter(|&id| graph.depth(id) >= min_depth && profile.in_degree(id) <= 1)
        .map(|id| DarkMatterPage {
            url: graph.url(id).to_string(),
            depth: graph.depth(id),
            in_degree: profile.in_degree(id),
            dark_matter_score: dark_matter_score(graph.depth(id), profile.in_degree(id)),
        })
        .collect();
    sort_desc_by(&mut pages, |p| p.dark_matter_score);

    let n = graph.node_count();
    let share = ratio(pages.len() as f64, n as f64);
    let severity = if share > 0.15 {
        Severity::High
    } else if share > 0.05 {
        Severity::Medium
    } else {
        Severity::Low
    };
    let depths: Vec<f64> = pages.iter().map(|p| p.depth as f64).collect();
    let avg_depth = (mean(&depths) * 100.0).round() / 100.0;
    let pct = percentage(pages.len(), n);

    DarkMatterReport {
        available: true,
        count: pages.len(),
        percentage: pct,
        avg_depth,
        severity: Some(severity),
        recommendations: dark_matter_recommendations(pct, avg_depth, pages.len()),
        pages,
    }
}
