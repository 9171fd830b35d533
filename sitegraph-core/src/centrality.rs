//! Degree centrality, the depth-based betweenness proxy, and HITS-style
//! authority/hub scores.

use crate::config::HitsMode;
use crate::metrics::DegreeProfile;
use crate::model::{RankedUrl, top_nodes};
use serde::{Deserialize, Serialize};
use sitegraph_graph::LinkGraph;
use tracing::debug;

/// Crawl depth treated as the most "bridging" position by the proxy.
pub const BRIDGE_DEPTH: i64 = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CentralityReport {
    pub top_by_degree: Vec<RankedUrl<usize>>,
    pub top_by_in_degree: Vec<RankedUrl<usize>>,
    pub top_by_out_degree: Vec<RankedUrl<usize>>,
    /// Ranked by [`betweenness_proxy`], not by shortest-path betweenness.
    pub top_by_betweenness: Vec<RankedUrl<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorityReport {
    pub mode: HitsMode,
    pub iterations: usize,
    pub converged: bool,
    pub top_authorities: Vec<RankedUrl<f64>>,
    pub top_hubs: Vec<RankedUrl<f64>>,
}

/// Raw HITS vectors, indexed by `NodeId::index()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitsScores {
    pub authority: Vec<f64>,
    pub hub: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Approximates how much of a bridge a page is from its crawl depth alone:
/// `1 / (1 + |depth - 3|)`. This is a heuristic, not shortest-path
/// betweenness.
pub fn betweenness_proxy(depth: u32) -> f64 {
    1.0 / (1.0 + (depth as i64 - BRIDGE_DEPTH).abs() as f64)
}

pub fn compute_centrality(
    graph: &LinkGraph,
    profile: &DegreeProfile,
    top_n: usize,
) -> CentralityReport {
    CentralityReport {
        top_by_degree: top_nodes(graph, top_n, |id| {
            profile.in_degree(id) + profile.out_degree(id)
        }),
        top_by_in_degree: top_nodes(graph, top_n, |id| profile.in_degree(id)),
        top_by_out_degree: top_nodes(graph, top_n, |id| profile.out_degree(id)),
        top_by_betweenness: top_nodes(graph, top_n, |id| betweenness_proxy(graph.depth(id))),
    }
}

fn normalize_by_max(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        for score in scores.iter_mut() {
            *score /= max;
        }
    }
}

/// One authority update followed by one hub update, each normalized by its
/// batch maximum.
fn hits_pass(graph: &LinkGraph, hub: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut authority: Vec<f64> = graph
        .node_ids()
        .map(|id| graph.in_neighbors(id).map(|src| hub[src.index()]).sum())
        .collect();
    normalize_by_max(&mut authority);

    let mut new_hub: Vec<f64> = graph
        .node_ids()
        .map(|id| {
            graph
                .out_neighbors(id)
                .map(|dst| authority[dst.index()])
                .sum()
        })
        .collect();
    normalize_by_max(&mut new_hub);

    (authority, new_hub)
}

fn max_delta(old: &[f64], new: &[f64]) -> f64 {
    old.iter()
        .zip(new)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

pub fn hits(graph: &LinkGraph, mode: HitsMode) -> HitsScores {
    let n = graph.node_count();
    let mut authority = vec![1.0; n];
    let mut hub = vec![1.0; n];

    if n == 0 {
        return HitsScores {
            authority,
            hub,
            iterations: 0,
            converged: true,
        };
    }

    match mode {
        HitsMode::SinglePass => {
            let (a, h) = hits_pass(graph, &hub);
            HitsScores {
                authority: a,
                hub: h,
                iterations: 1,
                converged: false,
            }
        }
        HitsMode::Converge {
            max_iterations,
            tolerance,
        } => {
            let mut iterations = 0;
            let mut converged = false;
            while iterations < max_iterations {
                let (a, h) = hits_pass(graph, &hub);
                iterations += 1;
                let delta = max_delta(&authority, &a).max(max_delta(&hub, &h));
                authority = a;
                hub = h;
                if delta <= tolerance {
                    converged = true;
                    break;
                }
            }
            debug!(
                "HITS finished after {} iterations (converged: {})",
                iterations, converged
            );
            HitsScores {
                authority,
                hub,
                iterations,
                converged,
            }
        }
    }
}

pub fn compute_authority(graph: &LinkGraph, mode: HitsMode, top_n: usize) -> AuthorityReport {
    let scores = hits(graph, mode);
    AuthorityReport {
        mode,
        iterations: scores.iterations,
        converged: scores.converged,
        top_authorities: top_nodes(graph, top_n, |id| scores.authority[id.index()]),
        top_hubs: top_nodes(graph, top_n, |id| scores.hub[id.index()]),
    }
}
