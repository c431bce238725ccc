//! The bindings every program starts with at runtime: `log`, `debug`,
//! `print`, `range`, `list`, and the pre-built `object`/`prototype` pair
//! mirroring the static prelude.

use std::rc::Rc;

use num_bigint::BigInt;
use rill_ir::{Name, SharedInterner};

use crate::error::{EvalError, EvalErrorKind};
use crate::print_handler::SharedPrintHandler;
use crate::value::{BuiltinFn, FunctionKind, FunctionValue, ObjectValue, Value, ValueScope};

pub fn prelude_scope(interner: &SharedInterner, handler: &SharedPrintHandler) -> ValueScope {
    let scope = ValueScope::root();
    let builtin = |name: &str, f: Rc<BuiltinFn>| {
        let name = interner.intern(name);
        let _ = scope.define(name, Value::Function(FunctionValue {
            name,
            kind: FunctionKind::Builtin(f),
        }));
    };

    {
        let interner = interner.clone();
        let handler = handler.clone();
        builtin(
            "log",
            Rc::new(move |args| {
                let value = one_arg(args)?;
                handler.emit(&value.print(&interner));
                Ok(value)
            }),
        );
    }
    {
        let interner = interner.clone();
        let handler = handler.clone();
        builtin(
            "debug",
            Rc::new(move |args| {
                let value = one_arg(args)?;
                handler.emit(&value.print(&interner));
                Ok(Value::Nil)
            }),
        );
    }
    {
        let interner = interner.clone();
        let handler = handler.clone();
        builtin(
            "print",
            Rc::new(move |args| {
                let value = one_arg(args)?;
                handler.emit(&value.print(&interner));
                Ok(Value::Nil)
            }),
        );
    }

    builtin(
        "range",
        Rc::new(|args| {
            if args.len() != 2 {
                return Err(EvalError::detached(EvalErrorKind::ArityMismatch {
                    expected: 2,
                    found: args.len(),
                }));
            }
            let mut args = args.into_iter();
            let start = next_int(&mut args)?;
            let end = next_int(&mut args)?;
            let mut items = Vec::new();
            let mut current = start;
            while current < end {
                items.push(Value::Int(current.clone()));
                current += 1;
            }
            Ok(Value::list(items))
        }),
    );

    builtin("list", Rc::new(|args| Ok(Value::list(args))));

    let _ = scope.define(interner.intern("variable"), Value::string("variable"));
    builtin("function", Rc::new(|args| args_as_list(args, 0)));
    builtin("functionAny", Rc::new(|args| args_as_list(args, 1)));
    builtin("functionString", Rc::new(|args| args_as_list(args, 1)));

    let prototype = ObjectValue {
        name: Some(interner.intern("Prototype")),
        scope: ValueScope::root(),
    };
    let _ = prototype.scope.define(
        interner.intern("inherited_property"),
        Value::string("inherited_property"),
    );
    define_method(&prototype, interner.intern("inherited_method"));

    let object = ObjectValue {
        name: Some(interner.intern("Object")),
        scope: ValueScope::root(),
    };
    let _ = object.scope.define(
        interner.intern("prototype"),
        Value::Object(prototype.clone()),
    );
    let _ = object
        .scope
        .define(interner.intern("property"), Value::string("property"));
    define_method(&object, interner.intern("method"));
    define_method(&object, interner.intern("methodAny"));
    define_method(&object, interner.intern("methodString"));

    let _ = scope.define(interner.intern("prototype"), Value::Object(prototype));
    let _ = scope.define(interner.intern("object"), Value::Object(object));

    scope
}

/// Prelude methods receive the receiver prepended to their arguments; they
/// drop it and hand back the rest as a list.
fn define_method(object: &ObjectValue, name: Name) {
    let _ = object.scope.define(
        name,
        Value::Function(FunctionValue {
            name,
            kind: FunctionKind::Builtin(Rc::new(|mut args| {
                if args.is_empty() {
                    return Err(EvalError::detached(EvalErrorKind::ArityMismatch {
                        expected: 1,
                        found: 0,
                    }));
                }
                args.remove(0);
                Ok(Value::list(args))
            })),
        }),
    );
}

fn args_as_list(args: Vec<Value>, expected: usize) -> Result<Value, EvalError> {
    if args.len() != expected {
        return Err(EvalError::detached(EvalErrorKind::ArityMismatch {
            expected,
            found: args.len(),
        }));
    }
    Ok(Value::list(args))
}

fn one_arg(args: Vec<Value>) -> Result<Value, EvalError> {
    let mut args = args;
    if args.len() != 1 {
        return Err(EvalError::detached(EvalErrorKind::ArityMismatch {
            expected: 1,
            found: args.len(),
        }));
    }
    Ok(args.remove(0))
}

fn next_int(args: &mut impl Iterator<Item = Value>) -> Result<BigInt, EvalError> {
    match args.next() {
        Some(Value::Int(value)) => Ok(value),
        Some(other) => Err(EvalError::detached(EvalErrorKind::TypeError(format!(
            "range expects Integer bounds, found {}",
            other.kind_name()
        )))),
        None => Err(EvalError::detached(EvalErrorKind::ArityMismatch {
            expected: 2,
            found: 0,
        })),
    }
}
