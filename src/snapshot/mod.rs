// Snapshot management for stepping through a reduction

use crate::parser::ast::{BinOp, Expr, NodeId, SourceLocation};
use rustc_hash::FxHashMap;

/// One binary operation folded into a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub node: NodeId,
    pub op: BinOp,
    pub left: i64,
    pub right: i64,
    pub value: i64,
    /// Source char range covered by the reduced node
    pub span: (usize, usize),
    /// Location of the operator
    pub location: SourceLocation,
}

impl Reduction {
    /// Human-readable form, e.g. `5 * 2 = 10`
    pub fn describe(&self) -> String {
        format!("{} {} {} = {}", self.left, self.op, self.right, self.value)
    }
}

/// Snapshot of evaluation state after a reduction
///
/// Only the outermost reduced nodes are kept: once an operator is folded,
/// its operands' entries are dropped, since rendering never looks below a
/// resolved node.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Outermost folded nodes, by pre-order id
    pub resolved: FxHashMap<NodeId, i64>,
    /// The reduction that produced this snapshot; `None` for the initial one
    pub reduction: Option<Reduction>,
}

impl Snapshot {
    /// Expression text with the resolved nodes substituted
    pub fn render(&self, expr: &Expr) -> String {
        expr.render_with(&self.resolved)
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough: map entries plus fixed overhead
        let map_size =
            self.resolved.len() * (std::mem::size_of::<NodeId>() + std::mem::size_of::<i64>());
        map_size + std::mem::size_of::<Self>()
    }
}

/// Manages the reduction history for stepping backward and forward
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Snapshots `0..=index`, clamped to the history length
    pub fn up_to(&self, index: usize) -> &[Snapshot] {
        let end = (index + 1).min(self.snapshots.len());
        &self.snapshots[..end]
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(resolved: &[(NodeId, i64)]) -> Snapshot {
        Snapshot {
            resolved: resolved.iter().copied().collect(),
            reduction: None,
        }
    }

    #[test]
    fn test_push_respects_limit() {
        let one = snapshot(&[(2, 10)]).estimated_size();
        let mut manager = SnapshotManager::new(one * 2);

        assert!(manager.push(snapshot(&[(2, 10)])).is_ok());
        assert!(manager.push(snapshot(&[(2, 10)])).is_ok());
        assert!(manager.push(snapshot(&[(2, 10)])).is_err());
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.memory_usage(), one * 2);
    }

    #[test]
    fn test_render_substitutes_resolved() {
        let expr = crate::parse("3 + 5 * 2").unwrap();

        assert_eq!(snapshot(&[]).render(&expr), "3 + 5 * 2");
        assert_eq!(snapshot(&[(2, 10)]).render(&expr), "3 + 10");
        assert_eq!(snapshot(&[(0, 13)]).render(&expr), "13");
    }

    #[test]
    fn test_up_to_clamps() {
        let mut manager = SnapshotManager::new(usize::MAX);
        assert!(manager.is_empty());
        assert!(manager.up_to(3).is_empty());

        manager.push(snapshot(&[])).unwrap();
        manager.push(snapshot(&[(0, 1)])).unwrap();
        assert_eq!(manager.up_to(0).len(), 1);
        assert_eq!(manager.up_to(10).len(), 2);
    }
}
