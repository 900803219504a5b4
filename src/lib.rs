//! # Introduction
//!
//! calctty tokenizes, parses, and evaluates integer arithmetic expressions,
//! capturing a snapshot after every reduction. The snapshot history is then
//! navigated forward and backward through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Evaluation pipeline
//!
//! ```text
//! Source → Lexer → Parser → Expr → Evaluator → Snapshots → TUI
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an [`Expr`] tree.
//! 2. [`evaluator`]: reduces the tree, either in one pass with
//!    [`evaluator::engine::eval`] or step by step with
//!    [`evaluator::engine::Evaluator`].
//! 3. [`snapshot`]: reduction history with a configurable memory limit.
//! 4. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported syntax
//!
//! Integer literals, binary `+ - * /` with the usual precedence and left
//! associativity, parentheses. Division truncates toward zero; overflow and
//! division by zero are errors.
//!
//! ```
//! assert_eq!(calctty::evaluate("3 + 5 * 2"), Ok(13));
//! assert_eq!(calctty::evaluate("(2 + 3) * 4"), Ok(20));
//! ```

pub mod error;
pub mod evaluator;
pub mod parser;
pub mod snapshot;
pub mod ui;

pub use error::CalcError;
use parser::ast::Expr;
use parser::lexer::{Lexer, Token};
use parser::parse::{ParseError, Parser};

/// Scan `source` into tokens, ending with exactly one `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Parse `source` into an expression tree.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    Parser::new(source).parse()
}

/// Parse and evaluate `source` in one go.
pub fn evaluate(source: &str) -> Result<i64, CalcError> {
    let expr = parse(source)?;
    Ok(evaluator::engine::eval(&expr)?)
}
