//! Arithmetic expression parser
//!
//! This module transforms source text into an expression tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser struct, errors, and lookahead handling
//! - `expressions`: Grammar rules, one per precedence level
//! - [`ast`]: Expression tree definitions
//!
//! # Supported Syntax
//!
//! - Non-negative integer literals (any run of ASCII digits that fits in `i64`)
//! - Binary `+`, `-`, `*`, `/`, all left-associative; `*` and `/` bind tighter
//! - Parentheses for grouping
//! - Whitespace anywhere between tokens
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with one token of lookahead pulled lazily
//! from the lexer. No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
