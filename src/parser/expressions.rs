//! Expression parsing implementation
//!
//! One method per precedence level, loosest first:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := NUMBER | '(' expression ')'
//! ```
//!
//! Both binary levels fold left, so `10 - 2 - 3` is `(10 - 2) - 3`.
//!
//! All parsing methods are implemented on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser, MAX_NESTING_DEPTH};

impl Parser {
    /// Parse additive expression (+ -)
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            let location = self.advance().location();
            let right = self.parse_term()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative expression (* /)
    pub fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                _ => break,
            };
            let location = self.advance().location();
            let right = self.parse_factor()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(left)
    }

    /// Parse number literal or parenthesized expression
    pub fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        if let Token::Number(lexeme, location) = self.peek() {
            let value = lexeme.parse::<i64>().map_err(|_| {
                ParseError::LiteralOutOfRange {
                    lexeme: lexeme.clone(),
                    location: *location,
                }
            })?;
            let width = lexeme.chars().count();
            let location = *location;
            self.advance();
            return Ok(Expr::Literal {
                value,
                location,
                width,
            });
        }

        if self.check(TokenKind::LParen) {
            if self.depth == MAX_NESTING_DEPTH {
                return Err(ParseError::NestingTooDeep {
                    limit: MAX_NESTING_DEPTH,
                    location: self.peek().location(),
                });
            }
            self.advance();

            self.depth += 1;
            let expr = self.parse_expression()?;
            self.depth -= 1;

            self.expect_token(TokenKind::RParen, "')'")?;
            return Ok(expr);
        }

        Err(self.unexpected("a number or '('"))
    }
}
