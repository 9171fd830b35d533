use crate::graph::{LinkGraph, PageNode};
use crate::record::PageRecord;
use crate::resolve::{LinkScope, ResolutionCache, canonical_url, link_scope, resolve_link};
use tracing::{debug, info, warn};

/// Turns one batch of page records into a [`LinkGraph`].
///
/// The builder owns the resolution cache for the run; build a new builder per
/// batch.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    cache: ResolutionCache,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: ResolutionCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn into_cache(self) -> ResolutionCache {
        self.cache
    }

    pub fn build(&mut self, records: &[PageRecord]) -> LinkGraph {
        let mut graph = LinkGraph::default();

        // Every page must be known before any link is resolved (closed world).
        let mut accepted = Vec::with_capacity(records.len());
        for record in records {
            let url = record.url.trim();
            if url.is_empty() {
                warn!("Skipping page record without url");
                graph.stats.skipped_records += 1;
                continue;
            }

            let key = canonical_url(url);
            if graph.index.contains_key(&key) {
                warn!("Duplicate page record for {}, keeping the first", url);
                graph.stats.duplicate_records += 1;
                continue;
            }

            let origin = self.cache.page(url).and_then(|page| page.origin.clone());
            let id = graph.graph.add_node(PageNode {
                url: record.url.clone(),
                key: key.clone(),
                depth: record.depth,
                parent_url: record.effective_parent().map(str::to_string),
                origin,
            });
            graph.index.insert(key, id);
            accepted.push((id, record));
        }

        graph.parents = accepted
            .iter()
            .map(|(_, record)| {
                record
                    .effective_parent()
                    .and_then(|parent| graph.id_of_key(&canonical_url(parent)))
            })
            .collect();

        for (source, record) in &accepted {
            let Some(page) = self.cache.page(record.url.trim()) else {
                debug!("Page url {} does not parse, no edges", record.url);
                graph.stats.total_links += record.links.len();
                graph.stats.malformed_links += record.links.len();
                continue;
            };

            for link in &record.links {
                graph.stats.total_links += 1;

                let target_url = match resolve_link(link, page) {
                    Ok(target_url) => target_url,
                    Err(crate::LinkError::FragmentOnly(_)) => {
                        graph.stats.fragment_links += 1;
                        continue;
                    }
                    Err(e) => {
                        debug!("Dropping link on {}: {}", record.url, e);
                        graph.stats.malformed_links += 1;
                        continue;
                    }
                };

                if link_scope(&target_url, page) == LinkScope::External {
                    graph.stats.external_links += 1;
                    continue;
                }

                let Some(target) = graph.id_of_key(target_url.as_str()) else {
                    graph.stats.unknown_targets += 1;
                    continue;
                };

                if target == *source {
                    graph.stats.self_links += 1;
                    continue;
                }

                if graph.graph.contains_edge(*source, target) {
                    graph.stats.duplicate_links += 1;
                    continue;
                }

                graph.graph.add_edge(*source, target, ());
                graph.stats.internal_edges += 1;
            }
        }

        info!(
            "Built link graph: {} pages, {} edges ({} external, {} malformed links)",
            graph.node_count(),
            graph.edge_count(),
            graph.stats.external_links,
            graph.stats.malformed_links
        );

        graph
    }
}

/// Build a graph with a fresh builder.
pub fn build_graph(records: &[PageRecord]) -> LinkGraph {
    GraphBuilder::new().build(records)
}
