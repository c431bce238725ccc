//! Analysis error type.

use rill_ir::{BinaryOp, NodeRef, Span};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisErrorKind {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("`{0}` is already defined in this scope")]
    DuplicateBinding(String),
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    #[error("unbound name `{0}`")]
    UnboundName(String),
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    #[error("unknown method `{0}`")]
    UnknownMethod(String),
    #[error("`{0}` is not callable")]
    NotCallable(String),
    #[error("invalid operands for `{op}`: {left} and {right}")]
    InvalidOperandTypes {
        op: BinaryOp,
        left: String,
        right: String,
    },
    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("RETURN outside of a function")]
    ReturnOutsideFunction,
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
}

/// Analysis failure: what went wrong and the node it went wrong at.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct AnalysisError {
    pub kind: AnalysisErrorKind,
    pub node: NodeRef,
}

impl AnalysisError {
    pub fn new(kind: AnalysisErrorKind, node: NodeRef) -> Self {
        AnalysisError { kind, node }
    }

    pub fn span(&self) -> Span {
        self.node.span
    }
}
