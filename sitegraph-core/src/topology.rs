//! Topology classification against four archetypes.
//!
//! Each archetype gets a continuous score; archetypes whose preconditions do
//! not hold score 0. The winner is the highest score, ties going to the
//! earlier archetype in [`Topology::ALL`].

use crate::metrics::DegreeProfile;
use crate::model::{mean, percentile};
use serde::{Deserialize, Serialize};
use sitegraph_graph::LinkGraph;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    HubSpoke,
    Mesh,
    Hierarchical,
    Flat,
}

impl Topology {
    /// Declaration order, which is also the tie-break order.
    pub const ALL: [Topology; 4] = [
        Topology::HubSpoke,
        Topology::Mesh,
        Topology::Hierarchical,
        Topology::Flat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::HubSpoke => "hub-spoke",
            Topology::Mesh => "mesh",
            Topology::Hierarchical => "hierarchical",
            Topology::Flat => "flat",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "hub-spoke" | "hub-and-spoke" => Ok(Topology::HubSpoke),
            "mesh" => Ok(Topology::Mesh),
            "hierarchical" => Ok(Topology::Hierarchical),
            "flat" => Ok(Topology::Flat),
            other => Err(format!("Unknown topology: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopologyScore {
    pub topology: Topology,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyCharacteristics {
    pub hub_count: usize,
    pub hub_threshold: f64,
    pub avg_in_degree: f64,
    pub avg_out_degree: f64,
    pub in_degree_std: f64,
    pub in_centralization: f64,
    pub out_centralization: f64,
    pub avg_depth: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyReport {
    pub available: bool,
    pub detected: Option<Topology>,
    pub confidence: f64,
    /// False when every archetype scored 0 and the winner is only the tie-break.
    pub conclusive: bool,
    pub scores: Vec<TopologyScore>,
    pub characteristics: TopologyCharacteristics,
    pub expected: Option<Topology>,
    pub matches_expected: Option<bool>,
}

/// Freeman centralization `Σ(max - d) / ((N - 1)(N - 2))`; 0 when the
/// denominator vanishes.
pub fn freeman_centralization(degrees: &[usize]) -> f64 {
    let n = degrees.len();
    if n <= 2 {
        return 0.0;
    }
    let max = degrees.iter().copied().max().unwrap_or(0);
    let spread: usize = degrees.iter().map(|&d| max - d).sum();
    spread as f64 / ((n - 1) * (n - 2)) as f64
}

pub fn characterize(
    graph: &LinkGraph,
    profile: &DegreeProfile,
    hub_percentile: f64,
) -> TopologyCharacteristics {
    let in_values: Vec<f64> = profile.in_degrees.iter().map(|&d| d as f64).collect();
    let hub_threshold = percentile(&in_values, hub_percentile);
    let hub_count = in_values.iter().filter(|&&d| d >= hub_threshold).count();
    let depths: Vec<f64> = graph.node_ids().map(|id| graph.depth(id) as f64).collect();

    TopologyCharacteristics {
        hub_count,
        hub_threshold,
        avg_in_degree: profile.mean_in,
        avg_out_degree: profile.mean_out,
        in_degree_std: profile.std_in,
        in_centralization: freeman_centralization(&profile.in_degrees),
        out_centralization: freeman_centralization(&profile.out_degrees),
        avg_depth: mean(&depths),
    }
}

/// Score every archetype, in declaration order.
pub fn score_topologies(c: &TopologyCharacteristics, nodes: usize) -> Vec<TopologyScore> {
    let cin = c.in_centralization;
    let uniform = c.in_degree_std < c.avg_in_degree;

    Topology::ALL
        .iter()
        .map(|&topology| {
            let score = match topology {
                Topology::HubSpoke if cin > 0.6 && (c.hub_count as f64) < nodes as f64 * 0.1 => {
                    0.8 + 0.2 * cin
                }
                Topology::Mesh if cin < 0.3 && uniform => 0.7 + (0.3 - cin),
                Topology::Hierarchical if (0.3..=0.6).contains(&cin) && c.avg_depth > 2.0 => {
                    0.6 + c.avg_depth / 10.0
                }
                Topology::Flat if c.avg_depth < 2.0 && uniform => 0.7 + (2.0 - c.avg_depth) * 0.15,
                _ => 0.0,
            };
            TopologyScore { topology, score }
        })
        .collect()
}

pub fn classify_topology(
    graph: &LinkGraph,
    profile: &DegreeProfile,
    hub_percentile: f64,
    expected: Option<Topology>,
) -> TopologyReport {
    if graph.is_empty() {
        return TopologyReport {
            expected,
            ..TopologyReport::default()
        };
    }

    let characteristics = characterize(graph, profile, hub_percentile);
    let scores = score_topologies(&characteristics, graph.node_count());

    // Strictly greater keeps the earliest archetype on ties.
    let mut winner = scores[0];
    for candidate in &scores[1..] {
        if candidate.score > winner.score {
            winner = *candidate;
        }
    }

    TopologyReport {
        available: true,
        detected: Some(winner.topology),
        confidence: winner.score,
        conclusive: winner.score > 0.0,
        scores,
        characteristics,
        expected,
        matches_expected: expected.map(|e| e == winner.topology),
    }
}
