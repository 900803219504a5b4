//! Checked integer arithmetic for binary operators
//!
//! Every operator goes through `i64::checked_*`, so overflow and division by
//! zero surface as [`EvalError`]s instead of panics. `/` truncates toward
//! zero.

use crate::evaluator::errors::EvalError;
use crate::parser::ast::{BinOp, SourceLocation};

/// Apply `op` to two already-evaluated operands
#[inline]
pub fn apply_binary_op(
    op: BinOp,
    left: i64,
    right: i64,
    location: SourceLocation,
) -> Result<i64, EvalError> {
    let result = match op {
        BinOp::Add => left.checked_add(right),
        BinOp::Sub => left.checked_sub(right),
        BinOp::Mul => left.checked_mul(right),
        BinOp::Div => {
            if right == 0 {
                return Err(EvalError::DivisionByZero { location });
            }
            // Only i64::MIN / -1 fails here
            left.checked_div(right)
        }
    };

    result.ok_or_else(|| EvalError::IntegerOverflow {
        operation: format!("{} {} {}", left, op, right),
        location,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(0, 1, 1)
    }

    #[test]
    fn test_basic_ops() {
        assert_eq!(apply_binary_op(BinOp::Add, 3, 4, loc()), Ok(7));
        assert_eq!(apply_binary_op(BinOp::Sub, 3, 4, loc()), Ok(-1));
        assert_eq!(apply_binary_op(BinOp::Mul, 3, 4, loc()), Ok(12));
        assert_eq!(apply_binary_op(BinOp::Div, 7, 2, loc()), Ok(3));
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(apply_binary_op(BinOp::Div, -7, 2, loc()), Ok(-3));
        assert_eq!(apply_binary_op(BinOp::Div, 7, -2, loc()), Ok(-3));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            apply_binary_op(BinOp::Div, 4, 0, loc()),
            Err(EvalError::DivisionByZero { location: loc() })
        );
    }

    #[test]
    fn test_overflow() {
        let err = apply_binary_op(BinOp::Mul, i64::MAX, 2, loc()).unwrap_err();
        assert!(matches!(err, EvalError::IntegerOverflow { .. }));

        let err = apply_binary_op(BinOp::Div, i64::MIN, -1, loc()).unwrap_err();
        match err {
            EvalError::IntegerOverflow { operation, .. } => {
                assert_eq!(operation, format!("{} / -1", i64::MIN));
            }
            _ => panic!("Expected overflow, got {:?}", err),
        }
    }
}
