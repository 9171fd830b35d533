use sitegraph_core::Topology;
use sitegraph_core::metrics::DegreeProfile;
use sitegraph_core::topology::{classify_topology, freeman_centralization};
use sitegraph_graph::{LinkGraph, PageRecord, build_graph};
use std::str::FromStr;

fn page(url: &str, depth: u32, links: &[&str]) -> PageRecord {
    PageRecord::new(url)
        .with_depth(depth)
        .with_links(links.iter().copied())
}

fn classify(graph: &LinkGraph, expected: Option<Topology>) -> sitegraph_core::topology::TopologyReport {
    let profile = DegreeProfile::from_graph(graph);
    classify_topology(graph, &profile, 95.0, expected)
}

/// A home page linking to 12 leaves that all link back.
fn star() -> LinkGraph {
    star_with(12)
}

fn star_with(leaf_count: usize) -> LinkGraph {
    let leaves: Vec<String> = (0..leaf_count).map(|i| format!("/leaf{}", i)).collect();
    let leaf_refs: Vec<&str> = leaves.iter().map(String::as_str).collect();

    let mut records = vec![page("https://example.com/", 0, &leaf_refs)];
    for leaf in &leaves {
        records.push(page(&format!("https://example.com{}", leaf), 1, &["/"]));
    }
    build_graph(&records)
}

/// Four pages linking to each other, all at `depth`.
fn clique(depth: u32) -> LinkGraph {
    build_graph(&[
        page("https://example.com/a", depth, &["/b", "/c", "/d"]),
        page("https://example.com/b", depth, &["/a", "/c", "/d"]),
        page("https://example.com/c", depth, &["/a", "/b", "/d"]),
        page("https://example.com/d", depth, &["/a", "/b", "/c"]),
    ])
}

/// Five pages with in-degrees 3, 2, 2, 1, 1 (in-degree centralization 0.5).
fn uneven(depth: u32) -> LinkGraph {
    build_graph(&[
        page("https://example.com/p0", depth, &["/p1", "/p2"]),
        page("https://example.com/p1", depth, &["/p0", "/p2"]),
        page("https://example.com/p2", depth, &["/p0", "/p1"]),
        page("https://example.com/p3", depth, &["/p0", "/p4"]),
        page("https://example.com/p4", depth, &["/p3"]),
    ])
}

// ============================================================================
// Freeman Centralization Tests
// ============================================================================

#[test]
fn test_freeman_centralization_star() {
    let mut degrees = vec![1; 12];
    degrees.push(12);
    assert!((freeman_centralization(&degrees) - 1.0).abs() < 1e-9);
}

#[test]
fn test_freeman_centralization_uniform_is_zero() {
    assert_eq!(freeman_centralization(&[3, 3, 3, 3]), 0.0);
}

#[test]
fn test_freeman_centralization_small_graphs() {
    assert_eq!(freeman_centralization(&[]), 0.0);
    assert_eq!(freeman_centralization(&[1]), 0.0);
    assert_eq!(freeman_centralization(&[1, 0]), 0.0);
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_star_is_hub_spoke() {
    let report = classify(&star(), None);

    assert!(report.available);
    assert_eq!(report.detected, Some(Topology::HubSpoke));
    assert!((report.confidence - 1.0).abs() < 1e-9);
    assert!(report.conclusive);
    assert_eq!(report.characteristics.hub_count, 1);
    assert!((report.characteristics.hub_threshold - 5.4).abs() < 1e-9);
    assert!((report.characteristics.in_centralization - 1.0).abs() < 1e-9);
}

#[test]
fn test_large_star_is_inconclusive() {
    // with 20+ leaves the 95th percentile lands on a leaf, so every page is a hub
    for leaf_count in [20, 30, 100] {
        let report = classify(&star_with(leaf_count), None);

        assert_eq!(report.characteristics.hub_count, leaf_count + 1);
        assert!((report.characteristics.hub_threshold - 1.0).abs() < 1e-9);
        assert_eq!(report.detected, Some(Topology::HubSpoke));
        assert_eq!(report.confidence, 0.0);
        assert!(!report.conclusive);
    }
}

#[test]
fn test_clique_prefers_mesh_on_tie_with_flat() {
    let report = classify(&clique(0), None);

    // mesh and flat both score 1.0 here
    let flat = report
        .scores
        .iter()
        .find(|s| s.topology == Topology::Flat)
        .unwrap();
    assert_eq!(flat.score, report.confidence);
    assert_eq!(report.detected, Some(Topology::Mesh));
}

#[test]
fn test_deep_clique_is_mesh_only() {
    let report = classify(&clique(2), None);

    assert_eq!(report.detected, Some(Topology::Mesh));
    let others: Vec<f64> = report
        .scores
        .iter()
        .filter(|s| s.topology != Topology::Mesh)
        .map(|s| s.score)
        .collect();
    assert_eq!(others, vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_deep_uneven_graph_is_hierarchical() {
    let report = classify(&uneven(3), None);

    assert!((report.characteristics.in_centralization - 0.5).abs() < 1e-9);
    assert_eq!(report.detected, Some(Topology::Hierarchical));
    assert!((report.confidence - 0.9).abs() < 1e-9);
}

#[test]
fn test_shallow_uneven_graph_is_flat() {
    let report = classify(&uneven(1), None);

    assert_eq!(report.detected, Some(Topology::Flat));
    assert!((report.confidence - 0.85).abs() < 1e-9);
}

#[test]
fn test_scores_listed_in_declaration_order() {
    let report = classify(&star(), None);
    let order: Vec<Topology> = report.scores.iter().map(|s| s.topology).collect();
    assert_eq!(order, Topology::ALL.to_vec());
}

#[test]
fn test_inconclusive_when_nothing_scores() {
    // A lone page has no spread, no depth and no degree variance.
    let graph = build_graph(&[page("https://example.com/", 3, &[])]);
    let report = classify(&graph, None);

    assert!(report.available);
    assert_eq!(report.detected, Some(Topology::HubSpoke));
    assert_eq!(report.confidence, 0.0);
    assert!(!report.conclusive);
}

#[test]
fn test_empty_batch_is_unavailable() {
    let graph = build_graph(&[]);
    let report = classify(&graph, Some(Topology::Mesh));

    assert!(!report.available);
    assert_eq!(report.detected, None);
    assert_eq!(report.expected, Some(Topology::Mesh));
    assert_eq!(report.matches_expected, None);
}

#[test]
fn test_expected_topology_comparison() {
    let matching = classify(&star(), Some(Topology::HubSpoke));
    assert_eq!(matching.matches_expected, Some(true));

    let mismatch = classify(&star(), Some(Topology::Mesh));
    assert_eq!(mismatch.matches_expected, Some(false));

    let unset = classify(&star(), None);
    assert_eq!(unset.matches_expected, None);
}

// ============================================================================
// Topology Name Tests
// ============================================================================

#[test]
fn test_topology_from_str() {
    assert_eq!(Topology::from_str("hub-spoke"), Ok(Topology::HubSpoke));
    assert_eq!(Topology::from_str("hub_and_spoke"), Ok(Topology::HubSpoke));
    assert_eq!(Topology::from_str("MESH"), Ok(Topology::Mesh));
    assert_eq!(Topology::from_str("flat"), Ok(Topology::Flat));
    assert!(Topology::from_str("ring").is_err());
}

#[test]
fn test_topology_display_round_trips() {
    for topology in Topology::ALL {
        assert_eq!(Topology::from_str(&topology.to_string()), Ok(topology));
    }
}
