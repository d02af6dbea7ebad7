use std::time::Instant;

use rustc_hash::FxHashSet;

use crate::error::{GraphError, Result};
use crate::model::{Edge, Node, NodeId};

use super::backend::GraphBackend;
use super::query::elapsed_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

#[derive(Debug, Clone)]
pub struct TraversalStep {
    pub node: Node,
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub struct TraversalResult {
    pub steps: Vec<TraversalStep>,
    pub query_time_ms: f64,
}

impl GraphBackend {
    /// Breadth-first walk over outgoing edges, bounded by `max_depth`.
    ///
    /// The start node is reported at depth 0; each node appears once, at its
    /// shallowest depth. `relationship_types`, when given, restricts which
    /// edges are followed.
    pub fn traverse(
        &self,
        start_node_id: NodeId,
        max_depth: usize,
        relationship_types: Option<&[&str]>,
    ) -> Result<TraversalResult> {
        let start = Instant::now();
        if !self.nodes.contains_key(&start_node_id) {
            return Err(GraphError::NodeNotFound(start_node_id));
        }

        let follows = |relationship: &str| match relationship_types {
            Some(types) => types.contains(&relationship),
            None => true,
        };

        let mut visited = FxHashSet::default();
        visited.insert(start_node_id);
        let mut current_level = vec![start_node_id];
        let mut steps = Vec::new();

        for depth in 0..=max_depth {
            for node_id in &current_level {
                if let Some(node) = self.nodes.get(node_id) {
                    steps.push(TraversalStep {
                        node: node.clone(),
                        depth,
                    });
                }
            }
            if depth == max_depth {
                break;
            }

            let mut next_level = Vec::new();
            for node_id in current_level.drain(..) {
                self.metrics.record_adjacency_scan();
                for edge_id in self.indexes.adjacency.outgoing_edges(node_id) {
                    let Some(edge) = self.edges.get(edge_id) else {
                        continue;
                    };
                    if !follows(&edge.relationship) {
                        continue;
                    }
                    // Skip targets without a stored node; permissive edges
                    // may reference ids that were never inserted.
                    if self.nodes.contains_key(&edge.target_id) && visited.insert(edge.target_id) {
                        next_level.push(edge.target_id);
                    }
                }
            }
            if next_level.is_empty() {
                break;
            }
            current_level = next_level;
        }

        Ok(TraversalResult {
            steps,
            query_time_ms: elapsed_ms(start),
        })
    }

    /// Edges incident to `node_id` in the given direction, ordered by id.
    /// Fails if the node is unknown.
    pub fn get_relationships(&self, node_id: NodeId, direction: Direction) -> Result<Vec<Edge>> {
        if !self.nodes.contains_key(&node_id) {
            return Err(GraphError::NodeNotFound(node_id));
        }

        let mut seen = FxHashSet::default();
        let mut edges = Vec::new();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            self.metrics.record_adjacency_scan();
            for edge_id in self.indexes.adjacency.outgoing_edges(node_id) {
                if let Some(edge) = self.edges.get(edge_id) {
                    if seen.insert(edge.id) {
                        edges.push(edge.clone());
                    }
                }
            }
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            self.metrics.record_adjacency_scan();
            for edge_id in self.indexes.adjacency.incoming_edges(node_id) {
                if let Some(edge) = self.edges.get(edge_id) {
                    if seen.insert(edge.id) {
                        edges.push(edge.clone());
                    }
                }
            }
        }
        edges.sort_unstable_by_key(|edge| edge.id);
        Ok(edges)
    }
}
