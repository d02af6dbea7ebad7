use time::OffsetDateTime;
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::model::{Diff, DiffOp};

use super::backend::GraphBackend;

impl GraphBackend {
    /// Undo the last `steps` diffs, newest first.
    ///
    /// The whole inverse sequence is validated and copied out of the log
    /// before any state changes, so an over-long request fails without
    /// touching the graph. Each undone diff appends a compensating diff; the
    /// compensations appended by this call are not themselves rolled back by
    /// it. Returns the number of diffs undone.
    pub fn rollback(&mut self, steps: usize) -> Result<usize> {
        if steps == 0 {
            return Ok(0);
        }
        let available = self.log.len();
        if steps > available {
            return Err(GraphError::Rollback(format!(
                "requested {steps} steps but only {available} diffs are recorded"
            )));
        }

        let plan: Vec<Diff> = self.log.tail(steps).iter().rev().cloned().collect();
        for diff in &plan {
            self.check_invertible(diff)?;
        }

        debug!(steps, "graph.rollback");
        for diff in plan {
            self.apply_inverse(diff)?;
        }
        self.metrics.record_rollback();
        Ok(steps)
    }

    /// Undo every diff recorded strictly after `timestamp`. Rolling back past
    /// the first diff restores the empty graph; a timestamp newer than the
    /// whole log is a no-op. Returns the number of diffs undone.
    pub fn rollback_to_timestamp(&mut self, timestamp: OffsetDateTime) -> Result<usize> {
        let steps = self
            .log
            .entries()
            .iter()
            .rev()
            .take_while(|diff| diff.timestamp > timestamp)
            .count();
        self.rollback(steps)
    }

    fn check_invertible(&self, diff: &Diff) -> Result<()> {
        let present = match diff.op {
            DiffOp::InsertNode | DiffOp::DeleteNode => diff.node.is_some(),
            DiffOp::InsertEdge | DiffOp::DeleteEdge => diff.edge.is_some(),
        };
        if present {
            Ok(())
        } else {
            Err(GraphError::Rollback(format!(
                "diff {} carries no payload for {:?}",
                diff.seq, diff.op
            )))
        }
    }

    /// Apply the logical inverse of `diff` to the stores and indexes, then
    /// record the compensating diff. Inverse application never cascades: the
    /// log already contains a separate entry for every edge a cascading
    /// delete removed.
    fn apply_inverse(&mut self, diff: Diff) -> Result<()> {
        let compensation = diff.op.inverse();
        match (diff.op, diff.node, diff.edge) {
            (DiffOp::InsertNode, Some(node), _) => {
                self.apply_remove_node(node.id).ok_or_else(|| {
                    GraphError::Rollback(format!(
                        "node {} missing while undoing diff {}",
                        node.id, diff.seq
                    ))
                })?;
                self.log.record(compensation, Some(node), None);
                self.metrics.record_diff_appended();
                self.metrics.record_node_deleted();
            }
            (DiffOp::DeleteNode, Some(node), _) => {
                self.apply_insert_node(node.clone());
                self.log.record(compensation, Some(node), None);
                self.metrics.record_diff_appended();
                self.metrics.record_node_created();
            }
            (DiffOp::InsertEdge, _, Some(edge)) => {
                self.apply_remove_edge(edge.id).ok_or_else(|| {
                    GraphError::Rollback(format!(
                        "edge {} missing while undoing diff {}",
                        edge.id, diff.seq
                    ))
                })?;
                self.log.record(compensation, None, Some(edge));
                self.metrics.record_diff_appended();
                self.metrics.record_edge_deleted();
            }
            (DiffOp::DeleteEdge, _, Some(edge)) => {
                self.apply_insert_edge(edge.clone());
                self.log.record(compensation, None, Some(edge));
                self.metrics.record_diff_appended();
                self.metrics.record_edge_created();
            }
            (op, _, _) => {
                return Err(GraphError::Rollback(format!(
                    "diff {} carries no payload for {op:?}",
                    diff.seq
                )));
            }
        }
        Ok(())
    }
}
