use tracing::debug;

use crate::error::{GraphError, Result};
use crate::model::{DiffOp, Edge, EdgeId, NodeId, Properties};

use super::backend::GraphBackend;

impl GraphBackend {
    /// Insert an edge with a freshly allocated id. Endpoints are not
    /// validated: an edge may reference ids that do not (yet) exist, and
    /// queries through it simply return no match for the absent side.
    pub fn insert_edge(
        &mut self,
        source_id: NodeId,
        target_id: NodeId,
        relationship: impl Into<String>,
        properties: Properties,
    ) -> Edge {
        let id = self.next_edge_id;
        self.next_edge_id += 1;

        let edge = Edge::new(id, source_id, target_id, relationship, properties);
        debug!(
            edge_id = edge.id,
            source_id,
            target_id,
            relationship = %edge.relationship,
            "graph.insert_edge"
        );

        self.log
            .record(DiffOp::InsertEdge, None, Some(edge.clone()));
        self.metrics.record_diff_appended();
        self.apply_insert_edge(edge.clone());
        self.metrics.record_edge_created();
        edge
    }

    /// Delete an edge. Returns the removed edge.
    pub fn delete_edge(&mut self, edge_id: EdgeId) -> Result<Edge> {
        let edge = self
            .edges
            .get(&edge_id)
            .cloned()
            .ok_or(GraphError::EdgeNotFound(edge_id))?;

        debug!(edge_id, "graph.delete_edge");
        self.log
            .record(DiffOp::DeleteEdge, None, Some(edge.clone()));
        self.metrics.record_diff_appended();
        self.apply_remove_edge(edge_id);
        self.metrics.record_edge_deleted();
        Ok(edge)
    }

    /// Store + index update only; no diff. Also used when rollback
    /// re-inserts a deleted edge with its original id.
    pub(crate) fn apply_insert_edge(&mut self, edge: Edge) {
        if edge.id >= self.next_edge_id {
            self.next_edge_id = edge.id + 1;
        }
        self.indexes.add_edge(&edge);
        self.edges.insert(edge.id, edge);
    }

    /// Store + index removal only; no diff.
    pub(crate) fn apply_remove_edge(&mut self, edge_id: EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(&edge_id)?;
        self.indexes.remove_edge(&edge);
        Some(edge)
    }
}
