//! Batch analysis, either sequential ([`analyze`]) or as bounded concurrent
//! section tasks ([`run_pipeline`]).
//!
//! Both produce the same report. In the pipeline every section runs as a
//! blocking task over one shared, read-only graph; a section that panics is
//! logged and replaced by its empty form instead of failing the batch.

use crate::antipattern::{analyze_antipatterns, analyze_dark_matter};
use crate::breadcrumbs::compute_breadcrumbs;
use crate::centrality::{compute_authority, compute_centrality};
use crate::config::AnalysisConfig;
use crate::connectivity::{compute_architecture, compute_connectivity};
use crate::metrics::{DegreeProfile, compute_clustering, compute_structural_metrics};
use crate::pathways::compute_pathways;
use crate::patterns::analyze_link_patterns;
use crate::report::{ReportMetadata, SiteReport};
use crate::topology::classify_topology;
use sitegraph_graph::{GraphBuilder, LinkGraph, PageRecord};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

/// Run every analyzer over an already built graph, one after another.
pub fn analyze_graph(
    records: &[PageRecord],
    graph: &LinkGraph,
    config: &AnalysisConfig,
) -> SiteReport {
    let profile = DegreeProfile::from_graph(graph);

    SiteReport {
        metadata: ReportMetadata::new(graph.node_count()),
        link_stats: graph.link_stats().clone(),
        structure: compute_structural_metrics(graph, &profile),
        clustering: compute_clustering(graph, config.top_n),
        centrality: compute_centrality(graph, &profile, config.top_n),
        authority: compute_authority(graph, config.hits, config.top_n),
        topology: classify_topology(
            graph,
            &profile,
            config.hub_percentile,
            config.expected_topology,
        ),
        connectivity: compute_connectivity(graph),
        architecture: compute_architecture(graph),
        pathways: compute_pathways(graph, &profile, config),
        breadcrumbs: compute_breadcrumbs(graph),
        antipatterns: analyze_antipatterns(graph, &profile, config),
        dark_matter: analyze_dark_matter(graph, &profile, config.dark_matter_depth),
        link_patterns: analyze_link_patterns(records, graph),
    }
}

/// Build the graph for `records` and analyze it on the current thread.
pub fn analyze(records: &[PageRecord], config: &AnalysisConfig) -> SiteReport {
    let graph = GraphBuilder::new().build(records);
    analyze_graph(records, &graph, config)
}

/// Read-only state every section task sees.
struct Batch {
    records: Vec<PageRecord>,
    graph: LinkGraph,
    profile: DegreeProfile,
    config: AnalysisConfig,
}

fn spawn_section<T, F>(
    semaphore: &Arc<Semaphore>,
    batch: &Arc<Batch>,
    name: &'static str,
    work: F,
) -> JoinHandle<Result<T, JoinError>>
where
    T: Send + 'static,
    F: FnOnce(&Batch) -> T + Send + 'static,
{
    let semaphore = Arc::clone(semaphore);
    let batch = Arc::clone(batch);
    tokio::spawn(async move {
        // Held until the section finishes; the semaphore is never closed.
        let _permit = semaphore.acquire_owned().await;
        debug!("Running {} analysis", name);
        tokio::task::spawn_blocking(move || work(&batch)).await
    })
}

async fn finish_section<T: Default>(
    name: &'static str,
    handle: JoinHandle<Result<T, JoinError>>,
) -> T {
    match handle.await {
        Ok(Ok(section)) => section,
        Ok(Err(e)) | Err(e) => {
            error!("{} analysis failed, reporting it empty: {}", name, e);
            T::default()
        }
    }
}

/// Analyze one batch with at most `config.max_concurrent_tasks` sections
/// running at a time.
pub async fn run_pipeline(records: Vec<PageRecord>, config: AnalysisConfig) -> SiteReport {
    let workers = config.max_concurrent_tasks.max(1);
    info!(
        "Analyzing {} records with up to {} concurrent tasks",
        records.len(),
        workers
    );

    let built = tokio::task::spawn_blocking(move || {
        let graph = GraphBuilder::new().build(&records);
        let profile = DegreeProfile::from_graph(&graph);
        (records, graph, profile)
    })
    .await;
    let (records, graph, profile) = match built {
        Ok(parts) => parts,
        Err(e) => {
            error!("Graph construction failed: {}", e);
            (Vec::new(), LinkGraph::default(), DegreeProfile::default())
        }
    };

    let batch = Arc::new(Batch {
        records,
        graph,
        profile,
        config,
    });
    let semaphore = Arc::new(Semaphore::new(workers));

    let structure = spawn_section(&semaphore, &batch, "structure", |b| {
        compute_structural_metrics(&b.graph, &b.profile)
    });
    let clustering = spawn_section(&semaphore, &batch, "clustering", |b| {
        compute_clustering(&b.graph, b.config.top_n)
    });
    let centrality = spawn_section(&semaphore, &batch, "centrality", |b| {
        compute_centrality(&b.graph, &b.profile, b.config.top_n)
    });
    let authority = spawn_section(&semaphore, &batch, "authority", |b| {
        compute_authority(&b.graph, b.config.hits, b.config.top_n)
    });
    let connectivity = spawn_section(&semaphore, &batch, "connectivity", |b| {
        compute_connectivity(&b.graph)
    });
    let architecture = spawn_section(&semaphore, &batch, "architecture", |b| {
        compute_architecture(&b.graph)
    });
    let pathways = spawn_section(&semaphore, &batch, "pathways", |b| {
        compute_pathways(&b.graph, &b.profile, &b.config)
    });
    let breadcrumbs = spawn_section(&semaphore, &batch, "breadcrumbs", |b| {
        compute_breadcrumbs(&b.graph)
    });
    let link_patterns = spawn_section(&semaphore, &batch, "link patterns", |b| {
        analyze_link_patterns(&b.records, &b.graph)
    });
    let topology = spawn_section(&semaphore, &batch, "topology", |b| {
        classify_topology(
            &b.graph,
            &b.profile,
            b.config.hub_percentile,
            b.config.expected_topology,
        )
    });
    let antipatterns = spawn_section(&semaphore, &batch, "antipatterns", |b| {
        analyze_antipatterns(&b.graph, &b.profile, &b.config)
    });
    let dark_matter = spawn_section(&semaphore, &batch, "dark matter", |b| {
        analyze_dark_matter(&b.graph, &b.profile, b.config.dark_matter_depth)
    });

    let (
        structure,
        clustering,
        centrality,
        authority,
        connectivity,
        architecture,
        pathways,
        breadcrumbs,
        link_patterns,
        topology,
        antipatterns,
        dark_matter,
    ) = futures::join!(
        finish_section("structure", structure),
        finish_section("clustering", clustering),
        finish_section("centrality", centrality),
        finish_section("authority", authority),
        finish_section("connectivity", connectivity),
        finish_section("architecture", architecture),
        finish_section("pathways", pathways),
        finish_section("breadcrumbs", breadcrumbs),
        finish_section("link patterns", link_patterns),
        finish_section("topology", topology),
        finish_section("antipatterns", antipatterns),
        finish_section("dark matter", dark_matter),
    );

    info!("Analysis of {} pages complete", batch.graph.node_count());

    SiteReport {
        metadata: ReportMetadata::new(batch.graph.node_count()),
        link_stats: batch.graph.link_stats().clone(),
        structure,
        clustering,
        centrality,
        authority,
        topology,
        connectivity,
        architecture,
        pathways,
        breadcrumbs,
        antipatterns,
        dark_matter,
        link_patterns,
    }
}
