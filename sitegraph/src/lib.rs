// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    expand_path, load_records_from_file, parse_record_line, parse_records, resolve_config,
};

// Re-export the analysis entry points from sitegraph-core
pub use sitegraph_core::{AnalysisConfig, ReportFormat, SiteReport, analyze, run_pipeline};
