//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, lookahead handling, and coordination
//! - `expressions`: one method per precedence level (expression, term, factor)
//!
//! # Lookahead
//!
//! The parser pulls tokens from its [`Lexer`] on demand and holds exactly one
//! buffered token: it reads once at construction and once after each
//! consumed token. Raw text is never re-scanned.
//!
//! # Nesting
//!
//! Operator chains are folded in loops, but each parenthesized group costs a
//! level of recursion. Groups nested deeper than [`MAX_NESTING_DEPTH`] are
//! rejected with [`ParseError::NestingTooDeep`].

use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use std::fmt;
use tracing::debug;

/// Deepest parenthesis nesting the parser accepts
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The lexer met a character that starts no token
    UnexpectedCharacter { ch: char, location: SourceLocation },

    /// A token that is not valid at this point in the grammar (this covers
    /// a missing ')', trailing input, and empty input)
    UnexpectedToken {
        found: TokenKind,
        expected: &'static str,
        location: SourceLocation,
    },

    /// A digit run too large for a 64-bit integer
    LiteralOutOfRange {
        lexeme: String,
        location: SourceLocation,
    },

    /// An opening parenthesis past the nesting limit
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            ParseError::UnexpectedCharacter { location, .. }
            | ParseError::UnexpectedToken { location, .. }
            | ParseError::LiteralOutOfRange { location, .. }
            | ParseError::NestingTooDeep { location, .. } => Some(location),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedCharacter { ch, location } => {
                write!(
                    f,
                    "Parse error at {}: unexpected character '{}'",
                    location, ch
                )
            }
            ParseError::UnexpectedToken {
                found,
                expected,
                location,
            } => {
                write!(
                    f,
                    "Parse error at {}: expected {}, found {}",
                    location, expected, found
                )
            }
            ParseError::LiteralOutOfRange { lexeme, location } => {
                write!(
                    f,
                    "Parse error at {}: integer literal {} is out of range",
                    location, lexeme
                )
            }
            ParseError::NestingTooDeep { limit, location } => {
                write!(
                    f,
                    "Parse error at {}: parentheses nested deeper than {} levels",
                    location, limit
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Recursive descent parser for integer arithmetic
pub struct Parser {
    pub(crate) lexer: Lexer,
    pub(crate) current: Token,
    /// Parenthesized groups currently open
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::from_lexer(Lexer::new(source))
    }

    pub fn from_lexer(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            depth: 0,
        }
    }

    /// Parse a complete expression; anything left before end of input is an
    /// error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;

        if !self.is_at_end() {
            return Err(self.unexpected("an operator or end of input"));
        }

        debug!(nodes = expr.node_count(), "parsed expression");
        Ok(expr)
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> &Token {
        &self.current
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.current, Token::Eof(_))
    }

    /// Consume the current token and pull the next one from the lexer.
    pub(crate) fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind() == kind
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Build the error for the current token. An invalid character is
    /// reported as such, not as an out-of-place token.
    pub(crate) fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Token::Invalid(ch, location) => ParseError::UnexpectedCharacter {
                ch: *ch,
                location: *location,
            },
            token => ParseError::UnexpectedToken {
                found: token.kind(),
                expected,
                location: token.location(),
            },
        }
    }
}
