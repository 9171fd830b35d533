//! Raw linking behaviour: what kinds of links pages carry, which domains they
//! point at, and how pages group by their leading path segment.
//!
//! Unlike the other analyzers this one reads the records' raw link lists,
//! since the graph only keeps internal edges.

use crate::model::{percentage, ratio, sort_desc_by};
use serde::{Deserialize, Serialize};
use sitegraph_graph::resolve::{LinkScope, host_of, link_scope, path_segments, resolve_link};
use sitegraph_graph::{LinkGraph, NodeId, PageRecord, ResolutionCache};
use std::collections::{BTreeMap, HashMap, HashSet};
use url::Url;

const MAX_TOP_DOMAINS: usize = 20;
const MAX_TOP_COMMUNITIES: usize = 20;
const ROOT_COMMUNITY: &str = "root";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkPatterns {
    /// Links pointing back at their own page, fragment-only links included.
    pub self_links: usize,
    pub fragment_links: usize,
    pub external_links: usize,
    /// Internal links between pages at the same depth.
    pub sibling_links: usize,
    /// Target depth minus source depth -> number of links.
    pub cross_depth_distribution: BTreeMap<i64, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub links: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainAnalysis {
    pub unique_domains_linked: usize,
    pub top_linked_domains: Vec<DomainCount>,
    /// Unique linked domains per page.
    pub domain_diversity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub community: String,
    pub size: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityReport {
    pub total_communities: usize,
    pub top_communities: Vec<Community>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkPatternReport {
    pub patterns: LinkPatterns,
    pub domains: DomainAnalysis,
    pub communities: CommunityReport,
}

/// Counter that remembers first-seen order, so ranking ties are stable.
#[derive(Debug, Default)]
struct OrderedCounter {
    positions: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
}

impl OrderedCounter {
    fn add(&mut self, key: &str) {
        match self.positions.get(key) {
            Some(&pos) => self.counts[pos].1 += 1,
            None => {
                self.positions.insert(key.to_string(), self.counts.len());
                self.counts.push((key.to_string(), 1));
            }
        }
    }

    fn len(&self) -> usize {
        self.counts.len()
    }

    fn ranked(mut self) -> Vec<(String, usize)> {
        sort_desc_by(&mut self.counts, |(_, count)| *count);
        self.counts
    }
}

/// Records that made it into the graph, first record per page only.
fn graph_records<'r>(
    records: &'r [PageRecord],
    graph: &LinkGraph,
) -> Vec<(NodeId, &'r PageRecord)> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| graph.id_of(record.url.trim()).map(|id| (id, record)))
        .filter(|(id, _)| seen.insert(*id))
        .collect()
}

pub fn compute_link_patterns(records: &[PageRecord], graph: &LinkGraph) -> LinkPatterns {
    let mut cache = ResolutionCache::new();
    let mut patterns = LinkPatterns::default();

    for (source, record) in graph_records(records, graph) {
        let Some(page) = cache.page(record.url.trim()) else {
            continue;
        };

        for link in &record.links {
            let link = link.trim();
            if link.starts_with('#') {
                patterns.self_links += 1;
                patterns.fragment_links += 1;
                continue;
            }
            if link == record.url {
                patterns.self_links += 1;
                continue;
            }

            let Ok(target) = resolve_link(link, page) else {
                continue;
            };
            if link_scope(&target, page) == LinkScope::External {
                patterns.external_links += 1;
                continue;
            }

            let Some(target_id) = graph.id_of(target.as_str()) else {
                continue;
            };
            if target_id == source {
                patterns.self_links += 1;
                continue;
            }
            let delta = graph.depth(target_id) as i64 - graph.depth(source) as i64;
            if delta == 0 {
                patterns.sibling_links += 1;
            } else {
                *patterns.cross_depth_distribution.entry(delta).or_insert(0) += 1;
            }
        }
    }

    patterns
}

/// Domains named by absolute `http(s)` links, internal ones included.
pub fn compute_domains(records: &[PageRecord], graph: &LinkGraph) -> DomainAnalysis {
    let mut domains = OrderedCounter::default();
    for (_, record) in graph_records(records, graph) {
        for link in &record.links {
            let link = link.trim();
            if !link.starts_with("http") {
                continue;
            }
            if let Some(domain) = Url::parse(link).ok().as_ref().and_then(host_of) {
                domains.add(&domain);
            }
        }
    }

    let unique_domains_linked = domains.len();
    DomainAnalysis {
        unique_domains_linked,
        domain_diversity_score: ratio(unique_domains_linked as f64, graph.node_count() as f64),
        top_linked_domains: domains
            .ranked()
            .into_iter()
            .take(MAX_TOP_DOMAINS)
            .map(|(domain, links)| DomainCount { domain, links })
            .collect(),
    }
}

/// Group pages by the first segment of their path.
pub fn compute_communities(graph: &LinkGraph) -> CommunityReport {
    let mut communities = OrderedCounter::default();
    for id in graph.node_ids() {
        let segments = path_segments(graph.url(id));
        communities.add(segments.first().map(String::as_str).unwrap_or(ROOT_COMMUNITY));
    }

    let total_communities = communities.len();
    let n = graph.node_count();
    CommunityReport {
        total_communities,
        top_communities: communities
            .ranked()
            .into_iter()
            .take(MAX_TOP_COMMUNITIES)
            .map(|(community, size)| Community {
                community,
                size,
                percentage: percentage(size, n),
            })
            .collect(),
    }
}

pub fn analyze_link_patterns(records: &[PageRecord], graph: &LinkGraph) -> LinkPatternReport {
    LinkPatternReport {
        patterns: compute_link_patterns(records, graph),
        domains: compute_domains(records, graph),
        communities: compute_communities(graph),
    }
}
