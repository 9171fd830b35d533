//! Breadcrumb consistency: does each declared parent look like an ancestor of
//! its child in url space?

use crate::model::Severity;
use serde::{Deserialize, Serialize};
use sitegraph_graph::LinkGraph;
use sitegraph_graph::resolve::{origin_of_str, path_segments};
use std::collections::BTreeMap;
use std::fmt;

const MAX_LISTED_ISSUES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreadcrumbIssueKind {
    CrossDomainParent,
    ParentDeeperThanChild,
    NonHierarchicalRelationship,
}

impl BreadcrumbIssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            BreadcrumbIssueKind::CrossDomainParent => Severity::High,
            BreadcrumbIssueKind::ParentDeeperThanChild => Severity::Medium,
            BreadcrumbIssueKind::NonHierarchicalRelationship => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BreadcrumbIssueKind::CrossDomainParent => "cross_domain_parent",
            BreadcrumbIssueKind::ParentDeeperThanChild => "parent_deeper_than_child",
            BreadcrumbIssueKind::NonHierarchicalRelationship => "non_hierarchical_relationship",
        }
    }
}

impl fmt::Display for BreadcrumbIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbIssue {
    pub url: String,
    pub parent_url: String,
    pub issue: BreadcrumbIssueKind,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreadcrumbReport {
    pub available: bool,
    pub consistency_score: f64,
    pub total_relationships: usize,
    pub total_issues: usize,
    pub issues_by_severity: BTreeMap<Severity, usize>,
    pub issues: Vec<BreadcrumbIssue>,
}

/// Check one (parent, child) pair. `None` means the pair is consistent.
pub fn check_relationship(parent_url: &str, url: &str) -> Option<BreadcrumbIssueKind> {
    if origin_of_str(parent_url) != origin_of_str(url) {
        return Some(BreadcrumbIssueKind::CrossDomainParent);
    }

    let parent = path_segments(parent_url);
    let child = path_segments(url);
    if parent.len() > child.len() {
        Some(BreadcrumbIssueKind::ParentDeeperThanChild)
    } else if !child.starts_with(&parent) {
        Some(BreadcrumbIssueKind::NonHierarchicalRelationship)
    } else {
        None
    }
}

/// `100 - Σ weight / total * 100`, floored at 0; 100 with no relationships.
pub fn consistency_score(issues: &[BreadcrumbIssue], total_relationships: usize) -> f64 {
    if total_relationships == 0 {
        return 100.0;
    }
    let penalty: f64 = issues.iter().map(|i| i.severity.issue_weight()).sum();
    (100.0 - penalty / total_relationships as f64 * 100.0).max(0.0)
}

pub fn compute_breadcrumbs(graph: &LinkGraph) -> BreadcrumbReport {
    if graph.is_empty() {
        return BreadcrumbReport::default();
    }

    let mut total_relationships = 0;
    let mut issues = Vec::new();
    for id in graph.node_ids() {
        let node = graph.node(id);
        let Some(parent_url) = node.parent_url.as_deref() else {
            continue;
        };
        total_relationships += 1;
        if let Some(kind) = check_relationship(parent_url, &node.url) {
            issues.push(BreadcrumbIssue {
                url: node.url.clone(),
                parent_url: parent_url.to_string(),
                issue: kind,
                severity: kind.severity(),
            });
        }
    }

    let mut issues_by_severity = BTreeMap::new();
    for issue in &issues {
        *issues_by_severity.entry(issue.severity).or_insert(0) += 1;
    }

    BreadcrumbReport {
        available: true,
        consistency_score: consistency_score(&issues, total_relationships),
        total_relationships,
        total_issues: issues.len(),
        issues_by_severity,
        issues: issues.into_iter().take(MAX_LISTED_ISSUES).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_under_parent_is_consistent() {
        assert_eq!(
            check_relationship("https://example.com/a/b", "https://example.com/a/b/c"),
            None
        );
    }

    #[test]
    fn test_disjoint_prefix_is_non_hierarchical() {
        assert_eq!(
            check_relationship("https://example.com/x/y", "https://example.com/a/b"),
            Some(BreadcrumbIssueKind::NonHierarchicalRelationship)
        );
    }

    #[test]
    fn test_deeper_parent() {
        assert_eq!(
            check_relationship("https://example.com/a/b/c", "https://example.com/a"),
            Some(BreadcrumbIssueKind::ParentDeeperThanChild)
        );
    }

    #[test]
    fn test_cross_domain_wins() {
        assert_eq!(
            check_relationship("https://other.com/a/b/c", "https://example.com/a"),
            Some(BreadcrumbIssueKind::CrossDomainParent)
        );
    }

    #[test]
    fn test_root_parent_is_prefix_of_everything() {
        assert_eq!(
            check_relationship("https://example.com/", "https://example.com/deep/page"),
            None
        );
    }
}
