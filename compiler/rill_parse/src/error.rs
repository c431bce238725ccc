//! Parse error type.

use rill_ir::{Span, TokenKind};
use thiserror::Error;

/// Failure while parsing: message plus the offending token's span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn unexpected(expected: &str, found: TokenKind, span: Span) -> Self {
        ParseError {
            message: format!("expected {expected}, found {found}"),
            span,
        }
    }
}
