mod config;
mod core;
mod metrics;


pub use config::{Config, DeletePolicy};
pub use metrics::{MetricsSnapshot, StorageMetrics};
pub use self::core::{
    Direction, EdgeFilter, EdgeQueryResult, ExportMetadata, GraphBackend, GraphExport, GraphSchema,
    NodeFilter, NodeQueryResult, TraversalResult, TraversalStep,
};
