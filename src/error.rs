//! Top-level error type for the source → value pipeline

use crate::evaluator::errors::EvalError;
use crate::parser::ast::SourceLocation;
use crate::parser::parse::ParseError;
use std::fmt;

/// Either stage of [`crate::evaluate`] failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    Parse(ParseError),
    Eval(EvalError),
}

impl CalcError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CalcError::Parse(e) => e.location(),
            CalcError::Eval(e) => e.location(),
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::Parse(e) => write!(f, "{}", e),
            CalcError::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CalcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalcError::Parse(e) => Some(e),
            CalcError::Eval(e) => Some(e),
        }
    }
}

impl From<ParseError> for CalcError {
    fn from(err: ParseError) -> Self {
        CalcError::Parse(err)
    }
}

impl From<EvalError> for CalcError {
    fn from(err: EvalError) -> Self {
        CalcError::Eval(err)
    }
}
