use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{GraphError, Result};
use crate::model::{Diff, Edge, Node};

use super::backend::GraphBackend;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_diffs: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub export_timestamp: OffsetDateTime,
}

/// Snapshot of current state plus full history, for inspection or for an
/// external consumer to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub diffs: Vec<Diff>,
    pub metadata: ExportMetadata,
}

impl GraphBackend {
    /// Read-only snapshot: nodes and edges ordered by id, diffs in log order.
    pub fn export(&self) -> GraphExport {
        let mut nodes: Vec<Node> = self.nodes.values().cloned().collect();
        nodes.sort_unstable_by_key(|node| node.id);
        let mut edges: Vec<Edge> = self.edges.values().cloned().collect();
        edges.sort_unstable_by_key(|edge| edge.id);

        GraphExport {
            metadata: ExportMetadata {
                total_nodes: nodes.len(),
                total_edges: edges.len(),
                total_diffs: self.log.len(),
                export_timestamp: OffsetDateTime::now_utc(),
            },
            nodes,
            edges,
            diffs: self.log.entries().to_vec(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|err| GraphError::Serialization(err.to_string()))
    }
}
