//! Shared syntax data for the Rill compiler.
//!
//! Home of the types every stage agrees on: [`Span`], interned [`Name`]s and
//! the [`StringInterner`], lexer [`Token`]s, and the AST consumed by both the
//! analyzer and the evaluator.

pub mod ast;
mod interner;
mod name;
mod span;
mod token;

pub use ast::{
    AssignStmt, BinaryExpr, BinaryOp, CallExpr, DefStmt, Expr, ExprStmt, ForStmt, GroupExpr,
    IfStmt, LetStmt, Literal, LiteralExpr, MethodCallExpr, NodeKind, NodeRef, ObjectExpr, Param,
    PropertyExpr, ReturnStmt, Source, Stmt, VariableExpr,
};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use token::{Token, TokenKind};
