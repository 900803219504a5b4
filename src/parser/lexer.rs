//! Lexer (tokenizer) for arithmetic expressions
//!
//! Converts raw source text into [`Token`]s one at a time. The lexer never
//! fails: a character that starts no token comes back as
//! [`Token::Invalid`], and the parser decides how to report it.
//!
//! Once the input is exhausted every call to [`Lexer::next_token`] returns
//! [`Token::Eof`] at the same location without moving the cursor.

use super::ast::SourceLocation;
use std::fmt;
use tracing::trace;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate position without a separate token→location table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Maximal run of ASCII digits; converted to a value by the parser
    Number(String, SourceLocation),

    Plus(SourceLocation),  // +
    Minus(SourceLocation), // -
    Star(SourceLocation),  // *
    Slash(SourceLocation), // /

    LParen(SourceLocation), // (
    RParen(SourceLocation), // )

    /// A character that matches no token kind
    Invalid(char, SourceLocation),

    // End of input
    Eof(SourceLocation),
}

/// Payload-free classification of a [`Token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    EndOfInput,
    Invalid,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::EndOfInput => "END_OF_INPUT",
            TokenKind::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Number(_, loc)
            | Token::Invalid(_, loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(..) => TokenKind::Number,
            Token::Plus(_) => TokenKind::Plus,
            Token::Minus(_) => TokenKind::Minus,
            Token::Star(_) => TokenKind::Star,
            Token::Slash(_) => TokenKind::Slash,
            Token::LParen(_) => TokenKind::LParen,
            Token::RParen(_) => TokenKind::RParen,
            Token::Invalid(..) => TokenKind::Invalid,
            Token::Eof(_) => TokenKind::EndOfInput,
        }
    }

    /// The source text this token was scanned from (empty for `Eof`).
    pub fn lexeme(&self) -> String {
        match self {
            Token::Number(digits, _) => digits.clone(),
            Token::Plus(_) => "+".to_string(),
            Token::Minus(_) => "-".to_string(),
            Token::Star(_) => "*".to_string(),
            Token::Slash(_) => "/".to_string(),
            Token::LParen(_) => "(".to_string(),
            Token::RParen(_) => ")".to_string(),
            Token::Invalid(ch, _) => ch.to_string(),
            Token::Eof(_) => String::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(digits, _) => write!(f, "number {}", digits),
            Token::Invalid(ch, _) => write!(f, "invalid character '{}'", ch),
            Token::Eof(_) => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme()),
        }
    }
}

/// Lexer for arithmetic expressions
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire remaining input, ending with exactly one `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let done = matches!(token, Token::Eof(_));
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }

    /// Get next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Token::Eof(loc);
        };

        let token = match ch {
            '0'..='9' => self.number_literal(ch, loc),
            '+' => Token::Plus(loc),
            '-' => Token::Minus(loc),
            '*' => Token::Star(loc),
            '/' => Token::Slash(loc),
            '(' => Token::LParen(loc),
            ')' => Token::RParen(loc),
            _ => Token::Invalid(ch, loc),
        };

        trace!(kind = %token.kind(), offset = loc.offset, "lexed token");
        token
    }

    /// Check if the cursor has consumed all input
    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Consume the rest of a digit run
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut digits = String::new();
        digits.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::Number(digits, loc)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.position, self.line, self.column)
    }
}
