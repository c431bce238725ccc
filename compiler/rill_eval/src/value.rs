//! Runtime values.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use rill_ir::{DefStmt, Name, StringInterner};
use rill_scope::SharedScope;

use crate::error::EvalError;

/// Scope binding names to runtime values.
pub type ValueScope = SharedScope<Value>;

pub type BuiltinFn = dyn Fn(Vec<Value>) -> Result<Value, EvalError>;

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(BigInt),
    Decimal(BigDecimal),
    Char(char),
    Str(Arc<str>),
    List(Rc<Vec<Value>>),
    Function(FunctionValue),
    Object(ObjectValue),
}

#[derive(Clone)]
pub struct FunctionValue {
    pub name: Name,
    pub kind: FunctionKind,
}

#[derive(Clone)]
pub enum FunctionKind {
    /// User function: the definition plus the scope it closed over. Methods
    /// additionally carry the object `this` refers to.
    Declared {
        def: Rc<DefStmt>,
        captured: ValueScope,
        this: Option<Box<Value>>,
    },
    Builtin(Rc<BuiltinFn>),
}

/// An object is a debug name plus its own parentless member scope. Cloning
/// shares the scope handle, so objects have reference semantics.
#[derive(Clone)]
pub struct ObjectValue {
    pub name: Option<Name>,
    pub scope: ValueScope,
}

impl Value {
    pub fn string(text: impl Into<Arc<str>>) -> Value {
        Value::Str(text.into())
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Decimal(_) => "Decimal",
            Value::Char(_) => "Character",
            Value::Str(_) => "String",
            Value::List(_) => "List",
            Value::Function(_) => "Function",
            Value::Object(_) => "Object",
        }
    }

    /// Render the value the way `log` and `print` show it.
    pub fn print(&self, interner: &StringInterner) -> String {
        match self {
            Value::Nil => "NIL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(value) => value.to_string(),
            Value::Decimal(value) => value.to_string(),
            Value::Char(value) => value.to_string(),
            Value::Str(value) => value.to_string(),
            Value::List(items) => {
                let rendered: Vec<String> =
                    items.iter().map(|item| item.print(interner)).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Function(function) => {
                format!("DEF {}(?) DO ... END", interner.resolve(function.name))
            }
            Value::Object(object) => {
                let mut out = String::from("OBJECT ");
                if let Some(name) = object.name {
                    out.push_str(&interner.resolve(name));
                    out.push(' ');
                }
                out.push_str("DO");
                for (member, value) in object.scope.flatten(false) {
                    out.push_str("\n    ");
                    match &value {
                        Value::Function(_) => out.push_str(&value.print(interner)),
                        Value::Object(_) => {
                            let rendered = value.print(interner);
                            let inlined: Vec<&str> =
                                rendered.split('\n').map(str::trim_start).collect();
                            out.push_str(&format!(
                                "LET {} = {};",
                                interner.resolve(member),
                                inlined.join(" ")
                            ));
                        }
                        _ => out.push_str(&format!(
                            "LET {} = {};",
                            interner.resolve(member),
                            value.print(interner)
                        )),
                    }
                }
                out.push_str("\nEND");
                out
            }
        }
    }
}

/// Functions compare by name; objects compare structurally by name and
/// member map, order-insensitively.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.name == b.name,
            (Value::Object(a), Value::Object(b)) => {
                a.name == b.name && a.scope.flatten(false) == b.scope.flatten(false)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(value) => write!(f, "Bool({value})"),
            Value::Int(value) => write!(f, "Int({value})"),
            Value::Decimal(value) => write!(f, "Decimal({value})"),
            Value::Char(value) => write!(f, "Char({value:?})"),
            Value::Str(value) => write!(f, "Str({value:?})"),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Function(function) => write!(f, "Function({:?})", function.name),
            Value::Object(object) => f
                .debug_struct("Object")
                .field("name", &object.name)
                .field("members", &object.scope)
                .finish(),
        }
    }
}
