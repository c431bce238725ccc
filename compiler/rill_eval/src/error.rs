//! Evaluation errors and the return-control signal.
//!
//! `RETURN` unwinds as an error carrying a [`Control::Returning`] payload;
//! function call boundaries intercept it with [`EvalError::take_return`].
//! One that escapes to top level is a real "RETURN outside of a function"
//! error.

use rill_ir::NodeRef;
use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalErrorKind {
    #[error("`{0}` is already defined in this scope")]
    DuplicateBinding(String),
    #[error("unbound name `{0}`")]
    UnboundName(String),
    #[error("{0}")]
    TypeError(String),
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    #[error("unknown method `{0}`")]
    UnknownMethod(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("RETURN outside of a function")]
    ReturnOutsideFunction,
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
}

#[derive(Debug, Clone)]
pub enum Control {
    Returning(Value),
}

#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub node: Option<NodeRef>,
    control: Option<Control>,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, node: NodeRef) -> Self {
        EvalError {
            kind,
            node: Some(node),
            control: None,
        }
    }

    /// Error without a node, for builtins that never see the AST.
    pub fn detached(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            node: None,
            control: None,
        }
    }

    /// The unwinding signal raised by `RETURN`.
    pub fn returning(value: Value) -> Self {
        EvalError {
            kind: EvalErrorKind::ReturnOutsideFunction,
            node: None,
            control: Some(Control::Returning(value)),
        }
    }

    pub fn is_returning(&self) -> bool {
        self.control.is_some()
    }

    /// At a call boundary: unwrap a return signal, or pass the error on.
    pub fn take_return(self) -> Result<Value, EvalError> {
        match self.control {
            Some(Control::Returning(value)) => Ok(value),
            None => Err(self),
        }
    }

    /// At top level: a return signal that got this far is a plain error
    /// located at `node`.
    pub fn escaped(self, node: NodeRef) -> Self {
        if self.is_returning() {
            EvalError::new(EvalErrorKind::ReturnOutsideFunction, node)
        } else {
            self
        }
    }
}
