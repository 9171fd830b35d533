//! Connected components, parent/child hierarchy and architecture shape.

use crate::model::{percentage, ratio};
use serde::{Deserialize, Serialize};
use sitegraph_graph::resolve::canonical_url;
use sitegraph_graph::{LinkGraph, NodeId};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::debug;

/// Parent/child relations declared by the records.
///
/// Parents are kept as the raw urls the records named, so a parent may lie
/// outside the batch. Children are always batch pages.
#[derive(Debug, Clone)]
pub struct Hierarchy<'g> {
    graph: &'g LinkGraph,
    children: HashMap<String, Vec<NodeId>>,
}

impl<'g> Hierarchy<'g> {
    pub fn new(graph: &'g LinkGraph) -> Self {
        let mut children: HashMap<String, Vec<NodeId>> = HashMap::new();
        for id in graph.node_ids() {
            if let Some(parent) = graph.node(id).parent_url.as_deref() {
                children.entry(canonical_url(parent)).or_default().push(id);
            }
        }
        Self { graph, children }
    }

    pub fn parent_url(&self, id: NodeId) -> Option<&'g str> {
        self.graph.node(id).parent_url.as_deref()
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(&self.graph.node(id).key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Distinct parent urls, in or out of the batch.
    pub fn parent_count(&self) -> usize {
        self.children.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    pub fn is_parent(&self, id: NodeId) -> bool {
        self.children.contains_key(&self.graph.node(id).key)
    }

    /// Walk from `id` up through its ancestors, at most `max_hops` steps.
    ///
    /// Stops before an ancestor would repeat and at the first parent that is
    /// not in the batch. The result is root first and ends with `id`.
    pub fn trace_pathway(&self, id: NodeId, max_hops: usize) -> Vec<String> {
        let mut pathway = vec![self.graph.url(id).to_string()];
        let mut seen = vec![self.graph.node(id).key.clone()];
        let mut current = Some(id);
        let mut hops = 0;

        while hops < max_hops {
            let Some(node) = current else { break };
            let Some(parent) = self.parent_url(node) else {
                break;
            };
            let key = canonical_url(parent);
            if seen.contains(&key) {
                debug!("Pathway cycle at {}", parent);
                break;
            }
            pathway.push(parent.to_string());
            seen.push(key);
            current = self.graph.id_of(parent);
            hops += 1;
        }

        pathway.reverse();
        pathway
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub total_components: usize,
    pub largest_component_size: usize,
    pub largest_component_percentage: f64,
    pub is_fully_connected: bool,
    pub isolated_pages: usize,
    /// Sizes of every component, largest first.
    pub component_sizes: Vec<usize>,
}

/// Components over links in both directions plus in-batch parent/child
/// relations, each listed in BFS order from its first batch page.
pub fn connected_components(graph: &LinkGraph) -> Vec<Vec<NodeId>> {
    let hierarchy = Hierarchy::new(graph);
    let mut visited = vec![false; graph.node_count()];
    let mut components = Vec::new();

    for start in graph.node_ids() {
        if visited[start.index()] {
            continue;
        }
        visited[start.index()] = true;

        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            component.push(id);
            let neighbors = graph
                .out_neighbors(id)
                .chain(graph.in_neighbors(id))
                .chain(graph.parent(id))
                .chain(hierarchy.children_of(id).iter().copied());
            for next in neighbors {
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }

    components
}

pub fn compute_connectivity(graph: &LinkGraph) -> ConnectivityReport {
    let components = connected_components(graph);
    let mut component_sizes: Vec<usize> = components.iter().map(Vec::len).collect();
    component_sizes.sort_unstable_by(|a, b| b.cmp(a));
    let largest = component_sizes.first().copied().unwrap_or(0);

    ConnectivityReport {
        total_components: components.len(),
        largest_component_size: largest,
        largest_component_percentage: percentage(largest, graph.node_count()),
        is_fully_connected: components.len() == 1,
        isolated_pages: component_sizes.iter().filter(|&&size| size == 1).count(),
        component_sizes,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureType {
    Flat,
    Deep,
    Wide,
    #[default]
    Balanced,
}

impl ArchitectureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchitectureType::Flat => "flat",
            ArchitectureType::Deep => "deep",
            ArchitectureType::Wide => "wide",
            ArchitectureType::Balanced => "balanced",
        }
    }
}

impl fmt::Display for ArchitectureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureReport {
    pub total_pages: usize,
    pub total_relationships: usize,
    pub max_depth: u32,
    pub avg_children_per_parent: f64,
    /// Pages that are neither a child nor a parent of anything.
    pub orphan_pages: usize,
    pub architecture_type: ArchitectureType,
}

pub fn classify_architecture(max_depth: u32, avg_children: f64) -> ArchitectureType {
    if max_depth <= 3 && avg_children > 10.0 {
        ArchitectureType::Flat
    } else if max_depth > 5 && avg_children < 5.0 {
        ArchitectureType::Deep
    } else if avg_children > 7.0 {
        ArchitectureType::Wide
    } else {
        ArchitectureType::Balanced
    }
}

pub fn compute_architecture(graph: &LinkGraph) -> ArchitectureReport {
    let hierarchy = Hierarchy::new(graph);
    let max_depth = graph.node_ids().map(|id| graph.depth(id)).max().unwrap_or(0);
    let total_relationships = hierarchy.relationship_count();
    let avg_children_per_parent = ratio(
        total_relationships as f64,
        hierarchy.parent_count() as f64,
    );
    let orphan_pages = graph
        .node_ids()
        .filter(|&id| hierarchy.parent_url(id).is_none() && !hierarchy.is_parent(id))
        .count();

    ArchitectureReport {
        total_pages: graph.node_count(),
        total_relationships,
        max_depth,
        avg_children_per_parent,
        orphan_pages,
        architecture_type: classify_architecture(max_depth, avg_children_per_parent),
    }
}
