// Shared report primitives: severities, rankings and small statistics helpers.

use serde::{Deserialize, Serialize};
use sitegraph_graph::{LinkGraph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Contribution to an antipattern severity score.
    pub fn score_weight(&self) -> u32 {
        match self {
            Severity::High => 30,
            Severity::Medium => 15,
            Severity::Low => 5,
        }
    }

    /// Contribution to the breadcrumb inconsistency penalty.
    pub fn issue_weight(&self) -> f64 {
        match self {
            Severity::High => 1.0,
            Severity::Medium => 0.5,
            Severity::Low => 0.2,
        }
    }
}

/// A url with the score it was ranked by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedUrl<T> {
    pub url: String,
    pub score: T,
}

/// Top `n` nodes by `score`, highest first. Ties keep batch order.
pub fn top_nodes<T, F>(graph: &LinkGraph, n: usize, score: F) -> Vec<RankedUrl<T>>
where
    T: PartialOrd + Copy,
    F: Fn(NodeId) -> T,
{
    let mut scored: Vec<(NodeId, T)> = graph.node_ids().map(|id| (id, score(id))).collect();
    sort_desc_by(&mut scored, |(_, s)| *s);
    scored
        .into_iter()
        .take(n)
        .map(|(id, score)| RankedUrl {
            url: graph.url(id).to_string(),
            score,
        })
        .collect()
}

/// Stable descending sort on a partially ordered key; incomparable keys tie.
pub fn sort_desc_by<E, T, F>(items: &mut [E], key: F)
where
    T: PartialOrd,
    F: Fn(&E) -> T,
{
    items.sort_by(|a, b| {
        key(b)
            .partial_cmp(&key(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// `numerator / denominator`, or 0 when the denominator is 0.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn percentage(part: usize, whole: usize) -> f64 {
    ratio(part as f64, whole as f64) * 100.0
}

pub fn mean(values: &[f64]) -> f64 {
    ratio(values.iter().sum(), values.len() as f64)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
