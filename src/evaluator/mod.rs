//! Expression evaluation
//!
//! This module reduces parsed trees to integers:
//! - [`engine`]: direct evaluation ([`engine::eval`]) and the stepping
//!   [`engine::Evaluator`]
//! - [`errors`]: Evaluation error types
//! - [`ops`]: Checked arithmetic for the four binary operators
//!
//! # Evaluation Model
//!
//! Operands are reduced in post-order, left before right. The stepping
//! evaluator takes a snapshot after each binary reduction so the history can
//! be replayed in either direction.

pub mod engine;
pub mod errors;
pub mod ops;
