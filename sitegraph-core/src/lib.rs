//! Link-structure analysis for one batch of crawled pages.
//!
//! [`analyze`] runs every analyzer sequentially; [`run_pipeline`] runs the
//! same analyzers as bounded concurrent tasks. Both return a [`SiteReport`].

pub mod antipattern;
pub mod breadcrumbs;
pub mod centrality;
pub mod config;
pub mod connectivity;
pub mod metrics;
pub mod model;
pub mod pathways;
pub mod patterns;
pub mod pipeline;
pub mod report;
pub mod topology;

pub use config::{AnalysisConfig, ConfigError, HitsMode};
pub use model::Severity;
pub use pipeline::{analyze, analyze_graph, run_pipeline};
pub use report::{ReportFormat, SiteReport};
pub use topology::Topology;
