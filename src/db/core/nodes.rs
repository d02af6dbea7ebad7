use rustc_hash::FxHashSet;
use tracing::debug;

use crate::db::config::DeletePolicy;
use crate::error::{GraphError, Result};
use crate::model::{DiffOp, EdgeId, Node, NodeId, Properties};

use super::backend::GraphBackend;

impl GraphBackend {
    /// Insert a node with a freshly allocated id. Always succeeds.
    pub fn insert_node(&mut self, label: impl Into<String>, properties: Properties) -> Node {
        let id = self.next_node_id;
        self.next_node_id += 1;

        let node = Node::new(id, label, properties);
        debug!(node_id = node.id, label = %node.label, "graph.insert_node");

        self.log
            .record(DiffOp::InsertNode, Some(node.clone()), None);
        self.metrics.record_diff_appended();
        self.apply_insert_node(node.clone());
        self.metrics.record_node_created();
        node
    }

    /// Delete a node. Under [`DeletePolicy::CascadeEdges`] every incident
    /// edge is deleted first, each with its own diff; under
    /// [`DeletePolicy::Restrict`] the delete fails while incident edges
    /// exist. Returns the removed node.
    pub fn delete_node(&mut self, node_id: NodeId) -> Result<Node> {
        let node = self
            .nodes
            .get(&node_id)
            .cloned()
            .ok_or(GraphError::NodeNotFound(node_id))?;

        let incident = self.incident_edges(node_id);
        if !incident.is_empty() && self.config.delete_policy == DeletePolicy::Restrict {
            return Err(GraphError::InvalidArgument(format!(
                "node {node_id} still has {} incident edges",
                incident.len()
            )));
        }

        for edge_id in incident {
            self.delete_edge(edge_id)?;
        }

        debug!(node_id, "graph.delete_node");
        self.log
            .record(DiffOp::DeleteNode, Some(node.clone()), None);
        self.metrics.record_diff_appended();
        self.apply_remove_node(node_id);
        self.metrics.record_node_deleted();
        Ok(node)
    }

    /// Edge ids touching `node_id` in either direction, each listed once.
    pub(crate) fn incident_edges(&self, node_id: NodeId) -> Vec<EdgeId> {
        let mut seen = FxHashSet::default();
        let mut edge_ids = Vec::new();
        for &edge_id in self.indexes.adjacency.outgoing_edges(node_id) {
            if seen.insert(edge_id) {
                edge_ids.push(edge_id);
            }
        }
        for &edge_id in self.indexes.adjacency.incoming_edges(node_id) {
            if seen.insert(edge_id) {
                edge_ids.push(edge_id);
            }
        }
        edge_ids
    }

    /// Store + index update only; no diff, no cascade. Also used when
    /// rollback re-inserts a deleted node with its original id.
    pub(crate) fn apply_insert_node(&mut self, node: Node) {
        if node.id >= self.next_node_id {
            self.next_node_id = node.id + 1;
        }
        self.indexes.add_node(&node);
        self.nodes.insert(node.id, node);
    }

    /// Store + index removal only; no diff, no cascade.
    pub(crate) fn apply_remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&node_id)?;
        self.indexes.remove_node(&node);
        Some(node)
    }
}
