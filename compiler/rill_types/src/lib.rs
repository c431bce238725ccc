//! Static semantics for Rill: the type lattice, the typed IR produced by
//! analysis, and the analyzer itself.

mod analyzer;
mod error;
mod ir;
mod lattice;
mod prelude;
mod ty;

pub use analyzer::Analyzer;
pub use error::{AnalysisError, AnalysisErrorKind};
pub use ir::{
    TypedDef, TypedExpr, TypedExprKind, TypedLet, TypedParam, TypedSource, TypedStmt,
};
pub use prelude::{prelude_scope, TypeRegistry};
pub use ty::{FunctionType, ObjectType, Primitive, Type, TypeScope, WellKnown};
