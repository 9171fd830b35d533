//! Structural metrics: degree distributions, density, reciprocity and
//! clustering coefficients.
//!
//! Every ratio here falls back to 0 on an empty denominator, so degenerate
//! batches (no pages, no edges, one page) produce zeroed metrics.

use crate::model::{RankedUrl, mean, ratio, sort_desc_by, std_dev};
use serde::{Deserialize, Serialize};
use sitegraph_graph::{LinkGraph, NodeId};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralMetrics {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub average_degree: f64,
    pub average_in_degree: f64,
    pub average_out_degree: f64,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub reciprocity: f64,
    /// degree -> number of pages with that in-degree
    pub in_degree_distribution: BTreeMap<usize, usize>,
    pub out_degree_distribution: BTreeMap<usize, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringReport {
    pub global_clustering_coefficient: f64,
    pub highly_clustered_pages: Vec<RankedUrl<f64>>,
}

/// Per-node degrees plus the batch summaries later stages depend on.
///
/// Both vectors are indexed by `NodeId::index()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DegreeProfile {
    pub in_degrees: Vec<usize>,
    pub out_degrees: Vec<usize>,
    pub mean_in: f64,
    pub std_in: f64,
    pub max_in: usize,
    pub mean_out: f64,
    pub max_out: usize,
}

impl DegreeProfile {
    pub fn from_graph(graph: &LinkGraph) -> Self {
        let in_degrees = graph.in_degrees();
        let out_degrees = graph.out_degrees();
        let in_values: Vec<f64> = in_degrees.iter().map(|&d| d as f64).collect();
        let out_values: Vec<f64> = out_degrees.iter().map(|&d| d as f64).collect();

        Self {
            mean_in: mean(&in_values),
            std_in: std_dev(&in_values),
            max_in: in_degrees.iter().copied().max().unwrap_or(0),
            mean_out: mean(&out_values),
            max_out: out_degrees.iter().copied().max().unwrap_or(0),
            in_degrees,
            out_degrees,
        }
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.in_degrees.get(id.index()).copied().unwrap_or(0)
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.out_degrees.get(id.index()).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.in_degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_degrees.is_empty()
    }
}

/// `E / (N * (N - 1))`, 0 for fewer than two pages.
pub fn density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    ratio(edges as f64, (nodes * (nodes - 1)) as f64)
}

/// Share of edges whose reverse edge also exists.
pub fn reciprocity(graph: &LinkGraph) -> f64 {
    let mut total = 0usize;
    let mut reciprocal = 0usize;
    for (source, target) in graph.edges() {
        total += 1;
        if graph.has_edge(target, source) {
            reciprocal += 1;
        }
    }
    ratio(reciprocal as f64, total as f64)
}

/// Local clustering coefficient over the out-neighborhood of `id`.
pub fn local_clustering(graph: &LinkGraph, id: NodeId) -> f64 {
    let neighbors: HashSet<NodeId> = graph.out_neighbors(id).collect();
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }

    let links_between: usize = neighbors
        .iter()
        .map(|&n| {
            graph
                .out_neighbors(n)
                .filter(|m| *m != n && neighbors.contains(m))
                .count()
        })
        .sum();

    ratio(links_between as f64, (k * (k - 1)) as f64)
}

fn distribution(degrees: &[usize]) -> BTreeMap<usize, usize> {
    let mut dist = BTreeMap::new();
    for &degree in degrees {
        *dist.entry(degree).or_insert(0) += 1;
    }
    dist
}

pub fn compute_structural_metrics(graph: &LinkGraph, profile: &DegreeProfile) -> StructuralMetrics {
    let nodes = graph.node_count();
    let edges = graph.edge_count();
    let total_in: usize = profile.in_degrees.iter().sum();
    let total_out: usize = profile.out_degrees.iter().sum();

    StructuralMetrics {
        nodes,
        edges,
        density: density(nodes, edges),
        average_degree: ratio((total_in + total_out) as f64, (2 * nodes) as f64),
        average_in_degree: profile.mean_in,
        average_out_degree: profile.mean_out,
        max_in_degree: profile.max_in,
        max_out_degree: profile.max_out,
        reciprocity: reciprocity(graph),
        in_degree_distribution: distribution(&profile.in_degrees),
        out_degree_distribution: distribution(&profile.out_degrees),
    }
}

pub fn compute_clustering(graph: &LinkGraph, top_n: usize) -> ClusteringReport {
    let coefficients: Vec<(NodeId, f64)> = graph
        .node_ids()
        .map(|id| (id, local_clustering(graph, id)))
        .collect();

    let values: Vec<f64> = coefficients.iter().map(|(_, c)| *c).collect();
    let global_clustering_coefficient = mean(&values);

    let mut ranked = coefficients;
    sort_desc_by(&mut ranked, |(_, c)| *c);
    let highly_clustered_pages = ranked
        .into_iter()
        .take(top_n)
        .filter(|(_, c)| *c > 0.0)
        .map(|(id, c)| RankedUrl {
            url: graph.url(id).to_string(),
            score: c,
        })
        .collect();

    ClusteringReport {
        global_clustering_coefficient,
        highly_clustered_pages,
    }
}
