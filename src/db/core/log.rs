use time::OffsetDateTime;
use tracing::debug;

use crate::model::{Diff, DiffOp, Edge, Node};

/// Append-only record of every structural mutation, in order.
///
/// `seq` is the position in the log and never repeats; timestamps are taken
/// at append time and drive time-based rollback.
#[derive(Debug, Default)]
pub(crate) struct DiffLog {
    entries: Vec<Diff>,
}

impl DiffLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn record(&mut self, op: DiffOp, node: Option<Node>, edge: Option<Edge>) -> Diff {
        let diff = Diff {
            seq: self.entries.len() as u64,
            op,
            node,
            edge,
            timestamp: OffsetDateTime::now_utc(),
        };
        debug!(seq = diff.seq, op = ?diff.op, "difflog.append");
        self.entries.push(diff.clone());
        diff
    }

    pub(crate) fn entries(&self) -> &[Diff] {
        &self.entries
    }

    /// Last `n` entries, oldest first. `n` must not exceed `len()`.
    pub(crate) fn tail(&self, n: usize) -> &[Diff] {
        &self.entries[self.entries.len() - n..]
    }

    /// Re-iterable view of the log, optionally restricted to entries strictly
    /// after `since`.
    pub(crate) fn iter_since(
        &self,
        since: Option<OffsetDateTime>,
    ) -> impl Iterator<Item = &Diff> + '_ {
        self.entries.iter().filter(move |diff| match since {
            Some(ts) => diff.timestamp > ts,
            None => true,
        })
    }
}
