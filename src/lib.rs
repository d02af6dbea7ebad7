//! In-memory property graph with an append-only diff log and rollback.
//!
//! Every structural mutation (insert or delete of a node or edge) is recorded
//! as a [`Diff`] in an append-only log. The log is the authoritative history;
//! label, property, and adjacency indexes are derived caches kept in sync with
//! every mutation. [`GraphBackend::rollback`] replays the tail of the log in
//! reverse, appending compensating diffs so that rollback itself stays
//! auditable.

#![forbid(unsafe_code)]

pub mod data_generator;
mod db;
pub mod error;
pub mod model;
mod shared;

pub use db::{
    Config, DeletePolicy, Direction, EdgeFilter, EdgeQueryResult, ExportMetadata, GraphBackend,
    GraphExport, GraphSchema, MetricsSnapshot, NodeFilter, NodeQueryResult, StorageMetrics,
    TraversalResult, TraversalStep,
};
pub use error::{GraphError, Result};
pub use model::{Diff, DiffOp, Edge, EdgeId, Node, NodeId, Properties, PropertyValue};
pub use shared::SharedGraph;
