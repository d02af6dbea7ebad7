//! Derived lookup structures, kept in sync with every mutation.
//!
//! All of this state is a rebuildable cache over the entity stores; the diff
//! log remains the authoritative history.

use std::collections::BTreeMap;
use std::ops::Bound;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::model::{Edge, EdgeId, Node, NodeId, Properties, PropertyValue};

/// Totally ordered form of the indexable `PropertyValue` variants.
///
/// Floats are mapped to their IEEE 754 total-order bit pattern so they can
/// serve as `BTreeMap` keys. `Null`, `List`, and `Map` values have no index
/// key; filters on those values are verified against candidate entities
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum IndexKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    String(String),
}

fn float_order_bits(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & (1 << 63) != 0 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

impl IndexKey {
    pub(crate) fn from_value(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Bool(v) => Some(IndexKey::Bool(*v)),
            PropertyValue::Int(v) => Some(IndexKey::Int(*v)),
            PropertyValue::Float(v) => Some(IndexKey::Float(float_order_bits(*v))),
            PropertyValue::String(v) => Some(IndexKey::String(v.clone())),
            PropertyValue::Null | PropertyValue::List(_) | PropertyValue::Map(_) => None,
        }
    }
}

/// String tag -> id set. Used for node labels and for relationship types.
#[derive(Debug, Default)]
pub(crate) struct LabelIndex {
    map: FxHashMap<String, FxHashSet<u64>>,
}

impl LabelIndex {
    pub(crate) fn insert(&mut self, tag: &str, id: u64) {
        self.map.entry(tag.to_string()).or_default().insert(id);
    }

    pub(crate) fn remove(&mut self, tag: &str, id: u64) {
        if let Some(ids) = self.map.get_mut(tag) {
            ids.remove(&id);
            if ids.is_empty() {
                self.map.remove(tag);
            }
        }
    }

    pub(crate) fn get(&self, tag: &str) -> Option<&FxHashSet<u64>> {
        self.map.get(tag)
    }

    pub(crate) fn tags(&self) -> impl Iterator<Item = (&str, usize)> {
        self.map.iter().map(|(tag, ids)| (tag.as_str(), ids.len()))
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

/// Property key -> ordered value map -> id set.
///
/// The inner `BTreeMap` level serves both equality and range lookups.
#[derive(Debug, Default)]
pub(crate) struct PropertyIndex {
    map: FxHashMap<String, BTreeMap<IndexKey, FxHashSet<u64>>>,
}

impl PropertyIndex {
    pub(crate) fn insert(&mut self, properties: &Properties, id: u64) {
        for (key, value) in properties {
            if let Some(index_key) = IndexKey::from_value(value) {
                self.map
                    .entry(key.clone())
                    .or_default()
                    .entry(index_key)
                    .or_default()
                    .insert(id);
            }
        }
    }

    pub(crate) fn remove(&mut self, properties: &Properties, id: u64) {
        for (key, value) in properties {
            let Some(index_key) = IndexKey::from_value(value) else {
                continue;
            };
            if let Some(by_value) = self.map.get_mut(key) {
                if let Some(ids) = by_value.get_mut(&index_key) {
                    ids.remove(&id);
                    if ids.is_empty() {
                        by_value.remove(&index_key);
                    }
                }
                if by_value.is_empty() {
                    self.map.remove(key);
                }
            }
        }
    }

    /// Equality lookup. `None` means the value is not indexable or the key
    /// has no entries; the caller decides whether to fall back to a scan.
    pub(crate) fn find_exact(&self, key: &str, value: &PropertyValue) -> Option<&FxHashSet<u64>> {
        let index_key = IndexKey::from_value(value)?;
        self.map.get(key)?.get(&index_key)
    }

    /// Inclusive range lookup over the ordered value level.
    pub(crate) fn find_range(
        &self,
        key: &str,
        min: Option<&PropertyValue>,
        max: Option<&PropertyValue>,
    ) -> Option<FxHashSet<u64>> {
        let lower = match min {
            Some(value) => Bound::Included(IndexKey::from_value(value)?),
            None => Bound::Unbounded,
        };
        let upper = match max {
            Some(value) => Bound::Included(IndexKey::from_value(value)?),
            None => Bound::Unbounded,
        };

        let mut result = FxHashSet::default();
        if let Some(by_value) = self.map.get(key) {
            for (_, ids) in by_value.range((lower, upper)) {
                result.extend(ids.iter().copied());
            }
        }
        Some(result)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }
}

/// Outgoing and incoming edge lists per node.
///
/// Neighbor sets are not cached separately; they are derived from these lists
/// plus the edge store so that parallel edges stay correct.
#[derive(Debug, Default)]
pub(crate) struct AdjacencyIndex {
    outgoing: FxHashMap<NodeId, SmallVec<[EdgeId; 4]>>,
    incoming: FxHashMap<NodeId, SmallVec<[EdgeId; 4]>>,
}

impl AdjacencyIndex {
    pub(crate) fn add_edge(&mut self, edge: &Edge) {
        self.outgoing
            .entry(edge.source_id)
            .or_default()
            .push(edge.id);
        self.incoming
            .entry(edge.target_id)
            .or_default()
            .push(edge.id);
    }

    pub(crate) fn remove_edge(&mut self, edge: &Edge) {
        if let Some(ids) = self.outgoing.get_mut(&edge.source_id) {
            ids.retain(|id| *id != edge.id);
            if ids.is_empty() {
                self.outgoing.remove(&edge.source_id);
            }
        }
        if let Some(ids) = self.incoming.get_mut(&edge.target_id) {
            ids.retain(|id| *id != edge.id);
            if ids.is_empty() {
                self.incoming.remove(&edge.target_id);
            }
        }
    }

    pub(crate) fn outgoing_edges(&self, node_id: NodeId) -> &[EdgeId] {
        self.outgoing.get(&node_id).map_or(&[], |ids| ids.as_slice())
    }

    pub(crate) fn incoming_edges(&self, node_id: NodeId) -> &[EdgeId] {
        self.incoming.get(&node_id).map_or(&[], |ids| ids.as_slice())
    }

    pub(crate) fn clear(&mut self) {
        self.outgoing.clear();
        self.incoming.clear();
    }
}

/// All derived indexes, updated as one unit per mutation.
#[derive(Debug, Default)]
pub(crate) struct GraphIndexes {
    pub(crate) node_labels: LabelIndex,
    pub(crate) node_props: PropertyIndex,
    pub(crate) edge_rels: LabelIndex,
    pub(crate) edge_props: PropertyIndex,
    pub(crate) adjacency: AdjacencyIndex,
}

impl GraphIndexes {
    pub(crate) fn add_node(&mut self, node: &Node) {
        self.node_labels.insert(&node.label, node.id);
        self.node_props.insert(&node.properties, node.id);
    }

    pub(crate) fn remove_node(&mut self, node: &Node) {
        self.node_labels.remove(&node.label, node.id);
        self.node_props.remove(&node.properties, node.id);
    }

    pub(crate) fn add_edge(&mut self, edge: &Edge) {
        self.edge_rels.insert(&edge.relationship, edge.id);
        self.edge_props.insert(&edge.properties, edge.id);
        self.adjacency.add_edge(edge);
    }

    pub(crate) fn remove_edge(&mut self, edge: &Edge) {
        self.edge_rels.remove(&edge.relationship, edge.id);
        self.edge_props.remove(&edge.properties, edge.id);
        self.adjacency.remove_edge(edge);
    }

    pub(crate) fn rebuild<'a>(
        &mut self,
        nodes: impl Iterator<Item = &'a Node>,
        edges: impl Iterator<Item = &'a Edge>,
    ) {
        self.node_labels.clear();
        self.node_props.clear();
        self.edge_rels.clear();
        self.edge_props.clear();
        self.adjacency.clear();

        for node in nodes {
            self.add_node(node);
        }
        for edge in edges {
            self.add_edge(edge);
        }
    }
}
