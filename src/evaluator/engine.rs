// Reduction engine for expression trees

use crate::evaluator::errors::EvalError;
use crate::evaluator::ops::apply_binary_op;
use crate::parser::ast::{Expr, NodeId, TreeIndex};
use crate::snapshot::{Reduction, Snapshot, SnapshotManager};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Reduce `expr` to a value in one pass (left operand first).
pub fn eval(expr: &Expr) -> Result<i64, EvalError> {
    let index = TreeIndex::new(expr);
    let mut values = vec![0; index.node_count()];

    for id in index.post_order() {
        values[id] = match index.node(id) {
            Expr::Literal { value, .. } => *value,
            Expr::BinaryOp { op, location, .. } => {
                let (left, right) = index.operands(id);
                apply_binary_op(*op, values[left], values[right], *location)?
            }
        };
    }

    Ok(values[0])
}

/// Stepping evaluator that records a snapshot after every reduction
pub struct Evaluator {
    /// Tree being reduced
    expr: Expr,

    /// Outermost reduced nodes and their values, by pre-order id
    resolved: FxHashMap<NodeId, i64>,

    /// Snapshot manager for stepping backward and forward
    snapshot_manager: SnapshotManager,

    /// Current position in the history
    history_position: usize,

    /// Final value or first error, once `run` has completed
    outcome: Option<Result<i64, EvalError>>,
}

impl Evaluator {
    pub fn new(expr: Expr, snapshot_memory_limit: usize) -> Self {
        Evaluator {
            expr,
            resolved: FxHashMap::default(),
            snapshot_manager: SnapshotManager::new(snapshot_memory_limit),
            history_position: 0,
            outcome: None,
        }
    }

    /// Reduce the whole tree, building the snapshot history.
    ///
    /// On failure the snapshots taken before the error are kept so the
    /// partial reduction can still be inspected. Calling `run` again returns
    /// the stored outcome.
    pub fn run(&mut self) -> Result<i64, EvalError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = self.reduce_all();

        match &outcome {
            Ok(value) => debug!(
                value,
                steps = self.snapshot_manager.len(),
                "evaluation finished"
            ),
            Err(e) => warn!(error = %e, "evaluation failed"),
        }

        self.history_position = self.snapshot_manager.len().saturating_sub(1);
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn reduce_all(&mut self) -> Result<i64, EvalError> {
        let Evaluator {
            expr,
            resolved,
            snapshot_manager,
            ..
        } = self;
        let index = TreeIndex::new(expr);
        let mut values = vec![0; index.node_count()];

        take_snapshot(snapshot_manager, resolved, None)?;

        for id in index.post_order() {
            let (op, location) = match index.node(id) {
                Expr::Literal { value, .. } => {
                    values[id] = *value;
                    continue;
                }
                Expr::BinaryOp { op, location, .. } => (*op, *location),
            };

            let (left, right) = index.operands(id);
            let value = apply_binary_op(op, values[left], values[right], location)?;
            values[id] = value;

            resolved.remove(&left);
            resolved.remove(&right);
            resolved.insert(id, value);

            let reduction = Reduction {
                node: id,
                op,
                left: values[left],
                right: values[right],
                value,
                span: index.span(id),
                location,
            };
            debug!(node = id, step = %reduction.describe(), "reduced");
            take_snapshot(snapshot_manager, resolved, Some(reduction))?;
        }

        Ok(values[0])
    }

    /// Step backward in history
    pub fn step_backward(&mut self) -> Result<(), EvalError> {
        if self.history_position == 0 {
            return Err(EvalError::HistoryBoundary {
                message: "Already at the beginning of evaluation".to_string(),
            });
        }

        self.history_position -= 1;
        Ok(())
    }

    /// Step forward in history
    pub fn step_forward(&mut self) -> Result<(), EvalError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(EvalError::HistoryBoundary {
                message: "No more snapshots available (evaluation finished)".to_string(),
            });
        }

        self.history_position += 1;
        Ok(())
    }

    /// Rewind to the beginning of the history
    pub fn rewind_to_start(&mut self) -> Result<(), EvalError> {
        if self.snapshot_manager.is_empty() {
            return Err(EvalError::HistoryBoundary {
                message: "No snapshots available".to_string(),
            });
        }

        self.history_position = 0;
        Ok(())
    }

    /// Move to the last snapshot
    pub fn jump_to_end(&mut self) {
        self.history_position = self.snapshot_manager.len().saturating_sub(1);
    }

    // ========== Getter methods for UI ==========

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.snapshot_manager.get(self.history_position)
    }

    /// Expression text at the current position
    pub fn rendered(&self) -> String {
        match self.current_snapshot() {
            Some(snapshot) => snapshot.render(&self.expr),
            None => self.expr.to_string(),
        }
    }

    /// Value of every node reduced up to the current position
    pub fn reduced_values(&self) -> FxHashMap<NodeId, i64> {
        self.reductions()
            .into_iter()
            .map(|r| (r.node, r.value))
            .collect()
    }

    /// Reductions performed up to and including the current position
    pub fn reductions(&self) -> Vec<&Reduction> {
        self.snapshot_manager
            .up_to(self.history_position)
            .iter()
            .filter_map(|s| s.reduction.as_ref())
            .collect()
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    pub fn is_at_end(&self) -> bool {
        self.history_position + 1 >= self.snapshot_manager.len()
    }

    /// Whether `run` has completed (successfully or not)
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Final value, visible only once the history is at its last snapshot
    pub fn result(&self) -> Option<i64> {
        match &self.outcome {
            Some(Ok(value)) if self.is_at_end() => Some(*value),
            _ => None,
        }
    }

    /// The error that stopped evaluation, if any
    pub fn error(&self) -> Option<&EvalError> {
        match &self.outcome {
            Some(Err(e)) => Some(e),
            _ => None,
        }
    }
}

/// Record the current reduction state
fn take_snapshot(
    snapshot_manager: &mut SnapshotManager,
    resolved: &FxHashMap<NodeId, i64>,
    reduction: Option<Reduction>,
) -> Result<(), EvalError> {
    let snapshot = Snapshot {
        resolved: resolved.clone(),
        reduction,
    };

    snapshot_manager
        .push(snapshot)
        .map_err(|_| EvalError::SnapshotLimitExceeded {
            current: snapshot_manager.memory_usage(),
            limit: snapshot_manager.memory_limit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn tree(source: &str) -> Expr {
        Parser::new(source).parse().unwrap()
    }

    fn run(source: &str) -> Evaluator {
        let mut evaluator = Evaluator::new(tree(source), usize::MAX);
        let _ = evaluator.run();
        evaluator
    }

    #[test]
    fn test_eval_precedence() {
        assert_eq!(eval(&tree("3 + 5 * 2")), Ok(13));
        assert_eq!(eval(&tree("10 - 2 - 3")), Ok(5));
        assert_eq!(eval(&tree("(2 + 3) * 4")), Ok(20));
    }

    #[test]
    fn test_eval_division_by_zero() {
        let err = eval(&tree("4 / 0")).unwrap_err();
        assert!(matches!(err, EvalError::DivisionByZero { location } if location.offset == 2));
    }

    #[test]
    fn test_run_records_every_reduction() {
        let evaluator = run("3 + 5 * 2");

        assert_eq!(evaluator.total_snapshots(), 3);
        assert_eq!(evaluator.history_position(), 2);
        assert_eq!(evaluator.result(), Some(13));

        let steps: Vec<String> = evaluator
            .reductions()
            .iter()
            .map(|r| r.describe())
            .collect();
        assert_eq!(steps, vec!["5 * 2 = 10", "3 + 10 = 13"]);
    }

    #[test]
    fn test_rendered_history() {
        let mut evaluator = run("3 + 5 * 2");
        evaluator.rewind_to_start().unwrap();

        let mut rendered = Vec::new();
        loop {
            rendered.push(evaluator.rendered());
            if evaluator.step_forward().is_err() {
                break;
            }
        }
        assert_eq!(rendered, vec!["3 + 5 * 2", "3 + 10", "13"]);
    }

    #[test]
    fn test_step_backward_and_forward() {
        let mut evaluator = run("(1 + 2) * (3 + 4)");
        let end = evaluator.rendered();

        evaluator.step_backward().unwrap();
        assert_eq!(evaluator.result(), None);
        assert_eq!(evaluator.rendered(), "3 * 7");

        evaluator.step_forward().unwrap();
        assert_eq!(evaluator.rendered(), end);
        assert_eq!(evaluator.result(), Some(21));
    }

    #[test]
    fn test_history_boundaries() {
        let mut evaluator = run("1 + 1");

        assert!(matches!(
            evaluator.step_forward(),
            Err(EvalError::HistoryBoundary { .. })
        ));
        evaluator.rewind_to_start().unwrap();
        assert!(matches!(
            evaluator.step_backward(),
            Err(EvalError::HistoryBoundary { .. })
        ));
        evaluator.jump_to_end();
        assert_eq!(evaluator.history_position(), 1);
    }

    #[test]
    fn test_failure_keeps_partial_history() {
        let mut evaluator = Evaluator::new(tree("1 + 2 + 3 / 0"), usize::MAX);
        let err = evaluator.run().unwrap_err();

        assert!(matches!(err, EvalError::DivisionByZero { .. }));
        assert!(evaluator.is_finished());
        assert_eq!(evaluator.error(), Some(&err));
        assert_eq!(evaluator.total_snapshots(), 2);
        assert_eq!(evaluator.rendered(), "3 + 3 / 0");
        assert_eq!(evaluator.result(), None);
    }

    #[test]
    fn test_run_is_idempotent() {
        let mut evaluator = Evaluator::new(tree("6 / 3"), usize::MAX);
        assert_eq!(evaluator.run(), Ok(2));
        assert_eq!(evaluator.run(), Ok(2));
        assert_eq!(evaluator.total_snapshots(), 2);
    }

    #[test]
    fn test_literal_only() {
        let evaluator = run("42");
        assert_eq!(evaluator.total_snapshots(), 1);
        assert!(evaluator.reductions().is_empty());
        assert_eq!(evaluator.result(), Some(42));
    }

    #[test]
    fn test_snapshot_limit() {
        let mut evaluator = Evaluator::new(tree("1 + 2"), 1);
        let err = evaluator.run().unwrap_err();
        assert_eq!(
            err,
            EvalError::SnapshotLimitExceeded {
                current: 0,
                limit: 1
            }
        );
    }

    #[test]
    fn test_reduction_spans() {
        let evaluator = run("3 + 5 * 2");
        let reductions = evaluator.reductions();

        assert_eq!(reductions[0].span, (4, 9));
        assert_eq!(reductions[0].node, 2);
        assert_eq!(reductions[1].span, (0, 9));
        assert_eq!(reductions[1].node, 0);
    }

    #[test]
    fn test_snapshots_keep_outermost_values() {
        let evaluator = run("1 + 2 + 3 + 4");
        let snapshot = evaluator.current_snapshot().unwrap();

        assert_eq!(snapshot.resolved.len(), 1);
        assert_eq!(snapshot.resolved.get(&0), Some(&10));
        assert_eq!(evaluator.reduced_values().len(), 3);
    }

    #[test]
    fn test_long_chain() {
        let expr = tree(&vec!["1"; 100_000].join(" + "));
        assert_eq!(eval(&expr), Ok(100_000));

        let mut evaluator = Evaluator::new(expr, usize::MAX);
        assert_eq!(evaluator.run(), Ok(100_000));
        assert_eq!(evaluator.total_snapshots(), 100_000);

        evaluator.step_backward().unwrap();
        assert_eq!(evaluator.rendered(), "99999 + 1");
    }
}
