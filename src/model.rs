use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type NodeId = u64;
pub type EdgeId = u64;

/// Caller-defined property map; keys and value shapes carry no schema.
pub type Properties = BTreeMap<String, PropertyValue>;

/// JSON-like property value. Scalar variants participate in the property
/// indexes; `Null`, `List`, and `Map` are stored but matched by direct
/// comparison only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::String(v.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::String(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub properties: Properties,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>, properties: Properties) -> Self {
        Self {
            id,
            label: label.into(),
            properties,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub relationship: String,
    pub properties: Properties,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        source_id: NodeId,
        target_id: NodeId,
        relationship: impl Into<String>,
        properties: Properties,
    ) -> Self {
        Self {
            id,
            source_id,
            target_id,
            relationship: relationship.into(),
            properties,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOp {
    InsertNode,
    DeleteNode,
    InsertEdge,
    DeleteEdge,
}

impl DiffOp {
    pub fn inverse(self) -> Self {
        match self {
            DiffOp::InsertNode => DiffOp::DeleteNode,
            DiffOp::DeleteNode => DiffOp::InsertNode,
            DiffOp::InsertEdge => DiffOp::DeleteEdge,
            DiffOp::DeleteEdge => DiffOp::InsertEdge,
        }
    }
}

/// One structural mutation. The entity payload is a copy taken at mutation
/// time, so rollback can restore the exact prior state even if the entity
/// was later removed elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diff {
    pub seq: u64,
    #[serde(rename = "operation")]
    pub op: DiffOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<Edge>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
