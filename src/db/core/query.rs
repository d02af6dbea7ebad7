use std::time::Instant;

use rustc_hash::FxHashSet;

use crate::error::{GraphError, Result};
use crate::model::{Edge, Node, NodeId, Properties, PropertyValue};

use super::backend::GraphBackend;
use super::index::IndexKey;
use super::traversal::Direction;

/// Conjunctive node filter; empty filter matches every node.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub label: Option<String>,
    pub properties: Properties,
}

impl NodeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.properties.is_empty()
    }
}

/// Conjunctive edge filter; empty filter matches every edge.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    pub relationship: Option<String>,
    pub source_id: Option<NodeId>,
    pub target_id: Option<NodeId>,
    pub properties: Properties,
}

impl EdgeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relationship(relationship: impl Into<String>) -> Self {
        Self {
            relationship: Some(relationship.into()),
            ..Self::default()
        }
    }

    pub fn source(mut self, source_id: NodeId) -> Self {
        self.source_id = Some(source_id);
        self
    }

    pub fn target(mut self, target_id: NodeId) -> Self {
        self.target_id = Some(target_id);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct NodeQueryResult {
    pub nodes: Vec<Node>,
    pub query_time_ms: f64,
}

#[derive(Debug, Clone)]
pub struct EdgeQueryResult {
    pub edges: Vec<Edge>,
    pub query_time_ms: f64,
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

impl GraphBackend {
    /// Nodes matching every given filter. Results are ordered by id. Only a
    /// fully unfiltered query walks the whole node store.
    pub fn query_nodes(&self, filter: &NodeFilter) -> NodeQueryResult {
        let start = Instant::now();
        let nodes = self.filter_nodes(filter);
        NodeQueryResult {
            nodes,
            query_time_ms: elapsed_ms(start),
        }
    }

    /// Nodes whose `key` property falls in the inclusive `[min, max]` range
    /// (either bound may be open). Bounds must be indexable scalars.
    pub fn query_nodes_by_property_range(
        &self,
        key: &str,
        min: Option<&PropertyValue>,
        max: Option<&PropertyValue>,
    ) -> Result<NodeQueryResult> {
        let start = Instant::now();
        let ids = self
            .indexes
            .node_props
            .find_range(key, min, max)
            .ok_or_else(|| {
                GraphError::InvalidArgument(format!(
                    "range bounds for property {key:?} must be scalar values"
                ))
            })?;
        self.metrics.record_index_hit();

        let mut nodes: Vec<Node> = ids
            .into_iter()
            .filter_map(|id| self.nodes.get(&id))
            .cloned()
            .collect();
        nodes.sort_unstable_by_key(|node| node.id);
        Ok(NodeQueryResult {
            nodes,
            query_time_ms: elapsed_ms(start),
        })
    }

    /// Edges matching every given filter. Results are ordered by id.
    pub fn query_edges(&self, filter: &EdgeFilter) -> EdgeQueryResult {
        let start = Instant::now();
        let edges = self.filter_edges(filter);
        EdgeQueryResult {
            edges,
            query_time_ms: elapsed_ms(start),
        }
    }

    /// One hop of adjacency from `start_node_id` over `relationship`.
    /// Fails if the start node is unknown; absent endpoints on the far side
    /// of an edge are skipped.
    pub fn query_connected_nodes(
        &self,
        start_node_id: NodeId,
        relationship: &str,
        direction: Direction,
    ) -> Result<NodeQueryResult> {
        let start = Instant::now();
        if !self.nodes.contains_key(&start_node_id) {
            return Err(GraphError::NodeNotFound(start_node_id));
        }

        let mut ids = FxHashSet::default();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            self.metrics.record_adjacency_scan();
            for edge_id in self.indexes.adjacency.outgoing_edges(start_node_id) {
                if let Some(edge) = self.edges.get(edge_id) {
                    if edge.relationship == relationship {
                        ids.insert(edge.target_id);
                    }
                }
            }
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            self.metrics.record_adjacency_scan();
            for edge_id in self.indexes.adjacency.incoming_edges(start_node_id) {
                if let Some(edge) = self.edges.get(edge_id) {
                    if edge.relationship == relationship {
                        ids.insert(edge.source_id);
                    }
                }
            }
        }

        let mut nodes: Vec<Node> = ids
            .into_iter()
            .filter_map(|id| self.nodes.get(&id))
            .cloned()
            .collect();
        nodes.sort_unstable_by_key(|node| node.id);
        Ok(NodeQueryResult {
            nodes,
            query_time_ms: elapsed_ms(start),
        })
    }

    fn filter_nodes(&self, filter: &NodeFilter) -> Vec<Node> {
        let mut candidates: Option<FxHashSet<NodeId>> = None;
        let mut residual: Vec<(&String, &PropertyValue)> = Vec::new();

        if let Some(label) = &filter.label {
            self.metrics.record_index_hit();
            candidates = Some(
                self.indexes
                    .node_labels
                    .get(label)
                    .cloned()
                    .unwrap_or_default(),
            );
        }

        for (key, value) in &filter.properties {
            if IndexKey::from_value(value).is_none() {
                residual.push((key, value));
                continue;
            }
            self.metrics.record_index_hit();
            let Some(ids) = self.indexes.node_props.find_exact(key, value) else {
                return Vec::new();
            };
            candidates = Some(match candidates {
                Some(current) => current.intersection(ids).copied().collect(),
                None => ids.clone(),
            });
        }

        if let Some(ids) = &candidates {
            if ids.is_empty() {
                return Vec::new();
            }
        }

        let matches_residual =
            |node: &Node| residual.iter().all(|(key, value)| node.properties.get(*key) == Some(*value));

        let mut nodes: Vec<Node> = match candidates {
            Some(ids) => ids
                .into_iter()
                .filter_map(|id| self.nodes.get(&id))
                .filter(|node| matches_residual(node))
                .cloned()
                .collect(),
            None if residual.is_empty() => self.nodes.values().cloned().collect(),
            None => {
                self.metrics.record_index_miss();
                self.nodes
                    .values()
                    .filter(|node| matches_residual(node))
                    .cloned()
                    .collect()
            }
        };
        nodes.sort_unstable_by_key(|node| node.id);
        nodes
    }

    fn filter_edges(&self, filter: &EdgeFilter) -> Vec<Edge> {
        let mut candidates: Option<FxHashSet<u64>> = None;
        let mut residual: Vec<(&String, &PropertyValue)> = Vec::new();

        let intersect = |candidates: &mut Option<FxHashSet<u64>>, ids: FxHashSet<u64>| {
            *candidates = Some(match candidates.take() {
                Some(current) => current.intersection(&ids).copied().collect(),
                None => ids,
            });
        };

        if let Some(relationship) = &filter.relationship {
            self.metrics.record_index_hit();
            let ids = self
                .indexes
                .edge_rels
                .get(relationship)
                .cloned()
                .unwrap_or_default();
            intersect(&mut candidates, ids);
        }
        if let Some(source_id) = filter.source_id {
            self.metrics.record_adjacency_scan();
            let ids = self
                .indexes
                .adjacency
                .outgoing_edges(source_id)
                .iter()
                .copied()
                .collect();
            intersect(&mut candidates, ids);
        }
        if let Some(target_id) = filter.target_id {
            self.metrics.record_adjacency_scan();
            let ids = self
                .indexes
                .adjacency
                .incoming_edges(target_id)
                .iter()
                .copied()
                .collect();
            intersect(&mut candidates, ids);
        }

        for (key, value) in &filter.properties {
            if IndexKey::from_value(value).is_none() {
                residual.push((key, value));
                continue;
            }
            self.metrics.record_index_hit();
            let Some(ids) = self.indexes.edge_props.find_exact(key, value) else {
                return Vec::new();
            };
            intersect(&mut candidates, ids.clone());
        }

        if let Some(ids) = &candidates {
            if ids.is_empty() {
                return Vec::new();
            }
        }

        let matches_residual =
            |edge: &Edge| residual.iter().all(|(key, value)| edge.properties.get(*key) == Some(*value));

        let mut edges: Vec<Edge> = match candidates {
            Some(ids) => ids
                .into_iter()
                .filter_map(|id| self.edges.get(&id))
                .filter(|edge| matches_residual(edge))
                .cloned()
                .collect(),
            None if residual.is_empty() => self.edges.values().cloned().collect(),
            None => {
                self.metrics.record_index_miss();
                self.edges
                    .values()
                    .filter(|edge| matches_residual(edge))
                    .cloned()
                    .collect()
            }
        };
        edges.sort_unstable_by_key(|edge| edge.id);
        edges
    }
}
