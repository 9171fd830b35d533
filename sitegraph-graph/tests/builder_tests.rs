// Tests for link graph construction

use sitegraph_graph::{GraphBuilder, PageRecord, ResolutionCache, build_graph};

fn page(url: &str, depth: u32, links: &[&str]) -> PageRecord {
    PageRecord::new(url)
        .with_depth(depth)
        .with_links(links.iter().copied())
}

// ============================================================================
// Edge Construction Tests
// ============================================================================

#[test]
fn test_scenario_a_edges() {
    let records = vec![
        page("https://example.com/", 0, &["/a", "/b"]),
        page("https://example.com/a", 1, &["/c"]),
        page("https://example.com/b", 1, &["/c"]),
        page("https://example.com/c", 2, &[]),
    ];
    let graph = build_graph(&records);

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);

    let c = graph.id_of("https://example.com/c").unwrap();
    assert_eq!(graph.in_degree(c), 2);
    assert_eq!(graph.out_degree(c), 0);
}

#[test]
fn test_root_url_without_trailing_slash_matches() {
    let records = vec![
        page("https://example.com", 0, &["/about"]),
        page("https://example.com/about", 1, &["https://example.com/"]),
    ];
    let graph = build_graph(&records);

    assert_eq!(graph.edge_count(), 2);
    let root = graph.id_of("https://example.com").unwrap();
    assert_eq!(graph.url(root), "https://example.com");
    assert_eq!(graph.in_degree(root), 1);
}

#[test]
fn test_relative_and_protocol_relative_links() {
    let records = vec![
        page(
            "https://example.com/docs/intro",
            1,
            &["setup", "//example.com/docs/faq", "../blog/"],
        ),
        page("https://example.com/docs/setup", 2, &[]),
        page("https://example.com/docs/faq", 2, &[]),
        page("https://example.com/blog/", 1, &[]),
    ];
    let graph = build_graph(&records);

    let intro = graph.id_of("https://example.com/docs/intro").unwrap();
    assert_eq!(graph.out_degree(intro), 3);
}

#[test]
fn test_closed_world_drops_unknown_targets() {
    let records = vec![page(
        "https://example.com/",
        0,
        &["/missing", "/also-missing"],
    )];
    let graph = build_graph(&records);

    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.link_stats().unknown_targets, 2);
}

#[test]
fn test_external_links_counted_not_added() {
    let records = vec![
        page(
            "https://example.com/",
            0,
            &["https://other.com/", "http://example.com/a", "/a"],
        ),
        page("https://example.com/a", 1, &[]),
        page("https://other.com/", 1, &[]),
    ];
    let graph = build_graph(&records);

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.link_stats().external_links, 2);
}

#[test]
fn test_self_links_and_fragments_dropped() {
    let records = vec![page(
        "https://example.com/page",
        0,
        &["#top", "/page", "/page#section", ""],
    )];
    let graph = build_graph(&records);

    let stats = graph.link_stats();
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(stats.fragment_links, 1);
    assert_eq!(stats.self_links, 2);
    assert_eq!(stats.malformed_links, 1);
    assert_eq!(stats.total_links, 4);
}

#[test]
fn test_duplicate_links_collapse() {
    let records = vec![
        page("https://example.com/", 0, &["/a", "/a", "a"]),
        page("https://example.com/a", 1, &[]),
    ];
    let graph = build_graph(&records);

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.link_stats().duplicate_links, 2);
}

// ============================================================================
// Failure Scope Tests
// ============================================================================

#[test]
fn test_malformed_link_does_not_abort_record() {
    let records = vec![
        page("https://example.com/", 0, &["http://[::1", "/a", "/b"]),
        page("https://example.com/a", 1, &[]),
        page("https://example.com/b", 1, &[]),
    ];
    let graph = build_graph(&records);

    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.link_stats().malformed_links, 1);
}

#[test]
fn test_unparseable_page_url_still_a_node() {
    let records = vec![
        page("not a url", 0, &["/a"]),
        page("https://example.com/a", 1, &[]),
    ];
    let graph = build_graph(&records);

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 0);
    assert!(graph.node(graph.id_of("not a url").unwrap()).origin.is_none());
}

#[test]
fn test_empty_and_duplicate_records_skipped() {
    let records = vec![
        page("", 0, &[]),
        page("https://example.com/", 0, &[]),
        page("https://example.com/", 3, &[]),
    ];
    let graph = build_graph(&records);

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.link_stats().skipped_records, 1);
    assert_eq!(graph.link_stats().duplicate_records, 1);
    let root = graph.id_of("https://example.com/").unwrap();
    assert_eq!(graph.depth(root), 0);
}

#[test]
fn test_empty_batch() {
    let graph = build_graph(&[]);
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}

// ============================================================================
// Graph Invariant Tests
// ============================================================================

#[test]
fn test_forward_edges_have_reverse_entries() {
    let records = vec![
        page("https://example.com/", 0, &["/a", "/b"]),
        page("https://example.com/a", 1, &["/", "/b"]),
        page("https://example.com/b", 1, &["/a"]),
    ];
    let graph = build_graph(&records);

    for (source, target) in graph.edges() {
        assert!(graph.in_neighbors(target).any(|id| id == source));
        assert!(graph.out_neighbors(source).any(|id| id == target));
    }

    let total_in: usize = graph.in_degrees().iter().sum();
    let total_out: usize = graph.out_degrees().iter().sum();
    assert_eq!(total_in, graph.edge_count());
    assert_eq!(total_out, graph.edge_count());
}

#[test]
fn test_parent_resolution_in_batch_only() {
    let records = vec![
        PageRecord::new("https://example.com/"),
        PageRecord::new("https://example.com/a")
            .with_depth(1)
            .with_parent("https://example.com/"),
        PageRecord::new("https://example.com/b")
            .with_depth(1)
            .with_parent("https://example.com/gone"),
        PageRecord::new("https://example.com/c").with_parent("https://example.com/c"),
    ];
    let graph = build_graph(&records);

    let root = graph.id_of("https://example.com/").unwrap();
    let a = graph.id_of("https://example.com/a").unwrap();
    let b = graph.id_of("https://example.com/b").unwrap();
    let c = graph.id_of("https://example.com/c").unwrap();
    assert_eq!(graph.parent(a), Some(root));
    assert_eq!(graph.parent(b), None);
    assert_eq!(graph.node(b).parent_url.as_deref(), Some("https://example.com/gone"));
    assert_eq!(graph.node(c).parent_url, None);
}

// ============================================================================
// Resolution Cache Tests
// ============================================================================

#[test]
fn test_builder_owns_cache_per_run() {
    let records = vec![
        page("https://example.com/", 0, &["/a"]),
        page("https://example.com/a", 1, &["/"]),
    ];
    let mut builder = GraphBuilder::with_cache(ResolutionCache::new());
    let graph = builder.build(&records);

    assert_eq!(graph.edge_count(), 2);
    let cache = builder.into_cache();
    assert_eq!(cache.len(), 2);
    assert!(cache.hits() >= 2);
}

// ============================================================================
// Record Decoding Tests
// ============================================================================

#[test]
fn test_record_defaults_from_json() {
    let record = PageRecord::from_json_line(r#"{"url": "https://example.com/"}"#).unwrap();
    assert_eq!(record.depth, 0);
    assert!(record.parent_url.is_none());
    assert!(record.links.is_empty());
}

#[test]
fn test_record_full_json() {
    let line = r#"{"url":"https://example.com/a","depth":2,"parent_url":"https://example.com/","discovered_at":"2024-05-01T12:00:00Z","links":["/b","/c"]}"#;
    let record = PageRecord::from_json_line(line).unwrap();
    assert_eq!(record.depth, 2);
    assert_eq!(record.links, vec!["/b", "/c"]);
    assert!(record.discovered_at.is_some());
}

#[test]
fn test_record_missing_url_rejected() {
    assert!(PageRecord::from_json_line(r#"{"url": "  "}"#).is_err());
    assert!(PageRecord::from_json_line(r#"{"depth": 1}"#).is_err());
    assert!(PageRecord::from_json_line("not json").is_err());
}
