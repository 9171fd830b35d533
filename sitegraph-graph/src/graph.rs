//! Directed link graph over one batch of pages.
//!
//! Nodes live in a `petgraph` arena and are addressed by a dense [`NodeId`].
//! Forward and reverse adjacency come from the same edge list, so every
//! forward edge always has its reverse entry.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type NodeId = NodeIndex;

/// Node weight: the page data the analyzers need, detached from the record.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    /// Url exactly as the record carried it.
    pub url: String,
    /// Normalized url, the key of the url -> id table.
    pub key: String,
    pub depth: u32,
    pub parent_url: Option<String>,
    pub origin: Option<String>,
}

/// What happened to every raw link while the graph was built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkStats {
    pub total_links: usize,
    pub internal_edges: usize,
    pub external_links: usize,
    pub fragment_links: usize,
    pub self_links: usize,
    pub unknown_targets: usize,
    pub duplicate_links: usize,
    pub malformed_links: usize,
    pub skipped_records: usize,
    pub duplicate_records: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    pub(crate) graph: DiGraph<PageNode, ()>,
    pub(crate) index: HashMap<String, NodeId>,
    pub(crate) parents: Vec<Option<NodeId>>,
    pub(crate) stats: LinkStats,
}

impl LinkGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node ids in batch order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices()
    }

    pub fn node(&self, id: NodeId) -> &PageNode {
        &self.graph[id]
    }

    pub fn url(&self, id: NodeId) -> &str {
        &self.graph[id].url
    }

    pub fn depth(&self, id: NodeId) -> u32 {
        self.graph[id].depth
    }

    /// Look a page up by url; the url is normalized first.
    pub fn id_of(&self, url: &str) -> Option<NodeId> {
        self.index
            .get(url)
            .or_else(|| self.index.get(&crate::resolve::canonical_url(url)))
            .copied()
    }

    pub(crate) fn id_of_key(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn out_neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors_directed(id, Direction::Outgoing)
    }

    pub fn in_neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors_directed(id, Direction::Incoming)
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.out_neighbors(id).count()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.in_neighbors(id).count()
    }

    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.graph.contains_edge(source, target)
    }

    /// Every edge as `(source, target)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.graph
            .raw_edges()
            .iter()
            .map(|edge| (edge.source(), edge.target()))
    }

    /// Parent page of `id`, when the record named one that is in the batch.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id.index()).copied().flatten()
    }

    /// In-degree of every node, indexed by `NodeId::index()`.
    pub fn in_degrees(&self) -> Vec<usize> {
        self.node_ids().map(|id| self.in_degree(id)).collect()
    }

    /// Out-degree of every node, indexed by `NodeId::index()`.
    pub fn out_degrees(&self) -> Vec<usize> {
        self.node_ids().map(|id| self.out_degree(id)).collect()
    }

    pub fn link_stats(&self) -> &LinkStats {
        &self.stats
    }
}
