pub mod builder;
pub mod error;
pub mod graph;
pub mod record;
pub mod resolve;

pub use builder::{GraphBuilder, build_graph};
pub use error::{LinkError, RecordError};
pub use graph::{LinkGraph, LinkStats, NodeId, PageNode};
pub use record::PageRecord;
pub use resolve::ResolutionCache;
