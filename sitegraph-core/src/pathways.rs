//! Navigation pathways: entry points, hubs, dead ends, common routes through
//! the parent/child hierarchy and per-depth flow.

use crate::config::AnalysisConfig;
use crate::connectivity::Hierarchy;
use crate::metrics::DegreeProfile;
use crate::model::{mean, percentage, sort_desc_by};
use serde::{Deserialize, Serialize};
use sitegraph_graph::LinkGraph;
use sitegraph_graph::resolve::path_segments;
use std::collections::{BTreeMap, HashMap};

const ENTRY_POINT_MAX_DEPTH: u32 = 2;
const NAV_HUB_MIN_OUT: usize = 20;
const NAV_HUB_MIN_IN: usize = 10;
const MAX_COMMON_PATHWAYS: usize = 30;
const MAX_IMPORTANT_PAGES: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub url: String,
    pub depth: u32,
    pub children_count: usize,
    pub links_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationHub {
    pub url: String,
    pub depth: u32,
    pub outbound_links: usize,
    pub inbound_links: usize,
    pub total_connectivity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadEndPage {
    pub url: String,
    pub depth: u32,
    pub has_parent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeadEndSummary {
    pub count: usize,
    pub percentage: f64,
    pub examples: Vec<DeadEndPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayFrequency {
    pub pathway: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthFlow {
    pub pages: usize,
    pub avg_children: f64,
    pub avg_links: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyClarity {
    pub clear_hierarchy: usize,
    pub unclear_hierarchy: usize,
    pub avg_breadcrumb_length: f64,
    pub hierarchy_clarity_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageImportance {
    pub url: String,
    pub importance_score: usize,
    pub depth: u32,
    pub inbound_links: usize,
    pub outbound_links: usize,
    pub children_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleneckCandidate {
    pub url: String,
    pub depth: u32,
    pub outbound_links: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathwayReport {
    pub entry_point_count: usize,
    pub top_entry_points: Vec<EntryPoint>,
    pub navigation_hub_count: usize,
    pub top_navigation_hubs: Vec<NavigationHub>,
    pub dead_ends: DeadEndSummary,
    pub total_unique_pathways: usize,
    pub top_pathways: Vec<PathwayFrequency>,
    pub depth_flow: BTreeMap<u32, DepthFlow>,
    pub hierarchy: HierarchyClarity,
    pub top_important_pages: Vec<PageImportance>,
    /// Single-inbound pages with more than the configured number of outbound
    /// links. Looser than the antipattern bottleneck check.
    pub bottleneck_count: usize,
    pub bottleneck_candidates: Vec<BottleneckCandidate>,
}

/// Short label for a url: its last two path segments, or `root`.
pub fn simplify_url(url: &str) -> String {
    let segments = path_segments(url);
    match segments.len() {
        0 => "root".to_string(),
        1 => segments[0].clone(),
        n => segments[n - 2..].join("/"),
    }
}

/// `max(0, 10 - depth) * 10 + min(out, 50) * 2 + min(in, 20) * 5 + min(children, 30) * 3`
pub fn page_importance(depth: u32, outbound: usize, inbound: usize, children: usize) -> usize {
    let depth_score = 10usize.saturating_sub(depth as usize) * 10;
    depth_score + outbound.min(50) * 2 + inbound.min(20) * 5 + children.min(30) * 3
}

pub fn compute_pathways(
    graph: &LinkGraph,
    profile: &DegreeProfile,
    config: &AnalysisConfig,
) -> PathwayReport {
    let hierarchy = Hierarchy::new(graph);
    let top_n = config.top_n;

    let mut entry_points: Vec<EntryPoint> = graph
        .node_ids()
        .filter(|&id| graph.depth(id) <= ENTRY_POINT_MAX_DEPTH)
        .map(|id| EntryPoint {
            url: graph.url(id).to_string(),
            depth: graph.depth(id),
            children_count: hierarchy.children_of(id).len(),
            links_count: profile.out_degree(id),
        })
        .collect();
    sort_desc_by(&mut entry_points, |e| e.children_count + e.links_count);
    let entry_point_count = entry_points.len();
    entry_points.truncate(top_n);

    let mut hubs: Vec<NavigationHub> = graph
        .node_ids()
        .filter(|&id| {
            profile.out_degree(id) > NAV_HUB_MIN_OUT || profile.in_degree(id) > NAV_HUB_MIN_IN
        })
        .map(|id| NavigationHub {
            url: graph.url(id).to_string(),
            depth: graph.depth(id),
            outbound_links: profile.out_degree(id),
            inbound_links: profile.in_degree(id),
            total_connectivity: profile.out_degree(id) + profile.in_degree(id),
        })
        .collect();
    sort_desc_by(&mut hubs, |h| h.total_connectivity);
    let navigation_hub_count = hubs.len();
    hubs.truncate(top_n);

    let dead_end_pages: Vec<DeadEndPage> = graph
        .node_ids()
        .filter(|&id| profile.out_degree(id) == 0)
        .map(|id| DeadEndPage {
            url: graph.url(id).to_string(),
            depth: graph.depth(id),
            has_parent: hierarchy.parent_url(id).is_some(),
        })
        .collect();
    let dead_ends = DeadEndSummary {
        count: dead_end_pages.len(),
        percentage: percentage(dead_end_pages.len(), graph.node_count()),
        examples: dead_end_pages.into_iter().take(top_n).collect(),
    };

    // Pathways are traced once and shared by the route count and the
    // hierarchy clarity check.
    let traced: Vec<Vec<String>> = graph
        .node_ids()
        .map(|id| hierarchy.trace_pathway(id, config.max_pathway_hops))
        .collect();

    let mut frequencies: Vec<PathwayFrequency> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for pathway in &traced {
        let label = pathway
            .iter()
            .map(|url| simplify_url(url))
            .collect::<Vec<_>>()
            .join(" -> ");
        match positions.get(&label) {
            Some(&pos) => frequencies[pos].frequency += 1,
            None => {
                positions.insert(label.clone(), frequencies.len());
                frequencies.push(PathwayFrequency {
                    pathway: label,
                    frequency: 1,
                });
            }
        }
    }
    let total_unique_pathways = frequencies.len();
    sort_desc_by(&mut frequencies, |p| p.frequency);
    frequencies.truncate(MAX_COMMON_PATHWAYS);

    let mut by_depth: BTreeMap<u32, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for id in graph.node_ids() {
        let (children, links) = by_depth.entry(graph.depth(id)).or_default();
        children.push(hierarchy.children_of(id).len() as f64);
        links.push(profile.out_degree(id) as f64);
    }
    let depth_flow = by_depth
        .into_iter()
        .map(|(depth, (children, links))| {
            (
                depth,
                DepthFlow {
                    pages: children.len(),
                    avg_children: mean(&children),
                    avg_links: mean(&links),
                },
            )
        })
        .collect();

    let clear_hierarchy = graph
        .node_ids()
        .zip(&traced)
        .filter(|(id, pathway)| pathway.len() - 1 == graph.depth(*id) as usize)
        .count();
    let lengths: Vec<f64> = traced.iter().map(|p| p.len() as f64).collect();
    let hierarchy_clarity = HierarchyClarity {
        clear_hierarchy,
        unclear_hierarchy: graph.node_count() - clear_hierarchy,
        avg_breadcrumb_length: mean(&lengths),
        hierarchy_clarity_percentage: percentage(clear_hierarchy, graph.node_count()),
    };

    let mut importance: Vec<PageImportance> = graph
        .node_ids()
        .map(|id| {
            let children_count = hierarchy.children_of(id).len();
            PageImportance {
                url: graph.url(id).to_string(),
                importance_score: page_importance(
                    graph.depth(id),
                    profile.out_degree(id),
                    profile.in_degree(id),
                    children_count,
                ),
                depth: graph.depth(id),
                inbound_links: profile.in_degree(id),
                outbound_links: profile.out_degree(id),
                children_count,
            }
        })
        .collect();
    sort_desc_by(&mut importance, |p| p.importance_score);
    importance.truncate(MAX_IMPORTANT_PAGES);

    let mut bottlenecks: Vec<BottleneckCandidate> = graph
        .node_ids()
        .filter(|&id| {
            profile.in_degree(id) == 1
                && profile.out_degree(id) > config.pathway_bottleneck_out_degree
        })
        .map(|id| BottleneckCandidate {
            url: graph.url(id).to_string(),
            depth: graph.depth(id),
            outbound_links: profile.out_degree(id),
        })
        .collect();
    sort_desc_by(&mut bottlenecks, |b| b.outbound_links);
    let bottleneck_count = bottlenecks.len();
    bottlenecks.truncate(top_n);

    PathwayReport {
        entry_point_count,
        top_entry_points: entry_points,
        navigation_hub_count,
        top_navigation_hubs: hubs,
        dead_ends,
        total_unique_pathways,
        top_pathways: frequencies,
        depth_flow,
        hierarchy: hierarchy_clarity,
        top_important_pages: importance,
        bottleneck_count,
        bottleneck_candidates: bottlenecks,
    }
}
