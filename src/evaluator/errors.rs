//! Evaluation error types
//!
//! This module defines [`EvalError`], which represents everything that can go
//! wrong while reducing a parsed expression tree, plus the history-navigation
//! failures reported by the stepping engine.
//!
//! Arithmetic errors are fatal: evaluation stops at the first one.

use crate::parser::ast::SourceLocation;
use std::fmt;

/// Errors that can occur during evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Right operand of `/` evaluated to zero
    DivisionByZero { location: SourceLocation },

    /// Result does not fit in a 64-bit integer
    IntegerOverflow {
        operation: String,
        location: SourceLocation,
    },

    /// Snapshot history limit exceeded
    SnapshotLimitExceeded { current: usize, limit: usize },

    /// Stepping past either end of the history
    HistoryBoundary { message: String },
}

impl EvalError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            EvalError::DivisionByZero { location } => Some(location),
            EvalError::IntegerOverflow { location, .. } => Some(location),
            EvalError::SnapshotLimitExceeded { .. } => None,
            EvalError::HistoryBoundary { .. } => None,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero { location } => {
                write!(f, "Division by zero at {}", location)
            }
            EvalError::IntegerOverflow {
                operation,
                location,
            } => {
                write!(
                    f,
                    "Integer overflow in operation: {} at {}",
                    operation, location
                )
            }
            EvalError::SnapshotLimitExceeded { current, limit } => {
                write!(
                    f,
                    "Snapshot memory limit exceeded: {} bytes used, limit is {}",
                    current, limit
                )
            }
            EvalError::HistoryBoundary { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for EvalError {}
