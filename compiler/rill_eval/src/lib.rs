//! Dynamic semantics for Rill: runtime values, the starting scope, and the
//! tree-walking evaluator.

mod error;
mod evaluator;
mod operators;
mod prelude;
mod print_handler;
mod value;

pub use error::{Control, EvalError, EvalErrorKind};
pub use evaluator::Evaluator;
pub use prelude::prelude_scope;
pub use print_handler::{
    BufferPrinter, PrintHandler, SharedPrintHandler, SilentPrinter, StdoutPrinter,
};
pub use value::{BuiltinFn, FunctionKind, FunctionValue, ObjectValue, Value, ValueScope};
