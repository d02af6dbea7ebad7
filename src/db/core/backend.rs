use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::Serialize;
use time::OffsetDateTime;

use crate::db::config::Config;
use crate::db::metrics::StorageMetrics;
use crate::error::{GraphError, Result};
use crate::model::{Diff, Edge, EdgeId, Node, NodeId};

use super::{DiffLog, GraphIndexes};

/// In-memory property graph: entity stores, append-only diff log, and the
/// derived index layer, mutated as one unit.
///
/// Mutations take `&mut self`, reads take `&self`; wrap in [`SharedGraph`]
/// (or any reader-writer lock) for multi-threaded use.
///
/// [`SharedGraph`]: crate::SharedGraph
pub struct GraphBackend {
    pub(crate) nodes: FxHashMap<NodeId, Node>,
    pub(crate) edges: FxHashMap<EdgeId, Edge>,
    pub(crate) indexes: GraphIndexes,
    pub(crate) log: DiffLog,
    pub(crate) next_node_id: NodeId,
    pub(crate) next_edge_id: EdgeId,
    pub(crate) config: Config,
    pub metrics: StorageMetrics,
}

impl std::fmt::Debug for GraphBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphBackend")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("diffs", &self.log.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for GraphBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBackend {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            nodes: FxHashMap::default(),
            edges: FxHashMap::default(),
            indexes: GraphIndexes::default(),
            log: DiffLog::new(),
            next_node_id: 1,
            next_edge_id: 1,
            config,
            metrics: StorageMetrics::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn count_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn count_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn count_diffs(&self) -> usize {
        self.log.len()
    }

    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    pub fn contains_edge(&self, edge_id: EdgeId) -> bool {
        self.edges.contains_key(&edge_id)
    }

    pub fn get_node(&self, node_id: NodeId) -> Result<Node> {
        self.nodes
            .get(&node_id)
            .cloned()
            .ok_or(GraphError::NodeNotFound(node_id))
    }

    pub fn get_edge(&self, edge_id: EdgeId) -> Result<Edge> {
        self.edges
            .get(&edge_id)
            .cloned()
            .ok_or(GraphError::EdgeNotFound(edge_id))
    }

    /// Diff history in log order, optionally restricted to entries strictly
    /// after `since`.
    pub fn diff_history(&self, since: Option<OffsetDateTime>) -> Vec<Diff> {
        self.log.iter_since(since).cloned().collect()
    }

    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .indexes
            .node_labels
            .tags()
            .map(|(tag, _)| tag.to_string())
            .collect();
        labels.sort_unstable();
        labels
    }

    pub fn relationship_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .indexes
            .edge_rels
            .tags()
            .map(|(tag, _)| tag.to_string())
            .collect();
        types.sort_unstable();
        types
    }

    /// Label and relationship-type summary with entity counts.
    pub fn schema(&self) -> GraphSchema {
        GraphSchema {
            labels: self
                .indexes
                .node_labels
                .tags()
                .map(|(tag, count)| (tag.to_string(), count))
                .collect(),
            relationship_types: self
                .indexes
                .edge_rels
                .tags()
                .map(|(tag, count)| (tag.to_string(), count))
                .collect(),
        }
    }

    /// Rebuild every index from the entity stores. The indexes are a derived
    /// cache; this restores them from scratch after suspected drift.
    pub fn rebuild_indexes(&mut self) {
        self.indexes
            .rebuild(self.nodes.values(), self.edges.values());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSchema {
    pub labels: BTreeMap<String, usize>,
    pub relationship_types: BTreeMap<String, usize>,
}
