//! The type model: primitives, function types, and object types whose
//! members live in a shared scope.

use std::fmt;
use std::rc::Rc;

use rill_ir::{Name, StringInterner};
use rill_scope::SharedScope;

/// Scope binding names to types.
pub type TypeScope = SharedScope<Type>;

/// Names with fixed meaning in the type system, interned once up front.
#[derive(Debug, Clone, Copy)]
pub struct WellKnown {
    pub prototype: Name,
    pub this: Name,
}

impl WellKnown {
    pub fn new(interner: &StringInterner) -> Self {
        WellKnown {
            prototype: interner.intern("prototype"),
            this: interner.intern("this"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Any,
    Nil,
    Dynamic,
    Boolean,
    Integer,
    Decimal,
    Character,
    String,
    Equatable,
    Comparable,
    Iterable,
}

impl Primitive {
    pub const ALL: [Primitive; 11] = [
        Primitive::Any,
        Primitive::Nil,
        Primitive::Dynamic,
        Primitive::Boolean,
        Primitive::Integer,
        Primitive::Decimal,
        Primitive::Character,
        Primitive::String,
        Primitive::Equatable,
        Primitive::Comparable,
        Primitive::Iterable,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Any => "Any",
            Primitive::Nil => "Nil",
            Primitive::Dynamic => "Dynamic",
            Primitive::Boolean => "Boolean",
            Primitive::Integer => "Integer",
            Primitive::Decimal => "Decimal",
            Primitive::Character => "Character",
            Primitive::String => "String",
            Primitive::Equatable => "Equatable",
            Primitive::Comparable => "Comparable",
            Primitive::Iterable => "Iterable",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub returns: Type,
}

/// An object's type: optional debug name plus a member scope. The member
/// scope handle is shared with the analyzed object expression, so members
/// registered during analysis are visible through every clone of the type.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub name: Option<Name>,
    pub members: TypeScope,
}

#[derive(Debug, Clone)]
pub enum Type {
    Primitive(Primitive),
    Function(Rc<FunctionType>),
    Object(ObjectType),
}

impl Type {
    pub const ANY: Type = Type::Primitive(Primitive::Any);
    pub const NIL: Type = Type::Primitive(Primitive::Nil);
    pub const DYNAMIC: Type = Type::Primitive(Primitive::Dynamic);
    pub const BOOLEAN: Type = Type::Primitive(Primitive::Boolean);
    pub const INTEGER: Type = Type::Primitive(Primitive::Integer);
    pub const DECIMAL: Type = Type::Primitive(Primitive::Decimal);
    pub const CHARACTER: Type = Type::Primitive(Primitive::Character);
    pub const STRING: Type = Type::Primitive(Primitive::String);
    pub const EQUATABLE: Type = Type::Primitive(Primitive::Equatable);
    pub const COMPARABLE: Type = Type::Primitive(Primitive::Comparable);
    pub const ITERABLE: Type = Type::Primitive(Primitive::Iterable);

    pub fn function(params: Vec<Type>, returns: Type) -> Type {
        Type::Function(Rc::new(FunctionType { params, returns }))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Dynamic))
    }

    /// Human-readable rendering for diagnostics.
    pub fn display(&self, interner: &StringInterner) -> String {
        match self {
            Type::Primitive(primitive) => primitive.name().to_string(),
            Type::Function(function) => {
                let params: Vec<String> = function
                    .params
                    .iter()
                    .map(|param| param.display(interner))
                    .collect();
                format!("({}) -> {}", params.join(", "), function.returns.display(interner))
            }
            Type::Object(object) => match object.name {
                Some(name) => format!("Object {}", interner.resolve(name)),
                None => "Object".to_string(),
            },
        }
    }
}

/// Object types compare structurally: same name and the same full member
/// map, prototype members included. Binding order is irrelevant.
impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.members.flatten(false) == other.members.flatten(false)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Function(a), Type::Function(b)) => **a == **b,
            (Type::Object(a), Type::Object(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn function_types_compare_structurally() {
        let a = Type::function(vec![Type::INTEGER], Type::STRING);
        let b = Type::function(vec![Type::INTEGER], Type::STRING);
        let c = Type::function(vec![Type::DECIMAL], Type::STRING);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn object_types_compare_by_members_not_handle() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let first = TypeScope::root();
        first.define(x, Type::INTEGER).unwrap();
        let second = TypeScope::root();
        second.define(x, Type::INTEGER).unwrap();

        let a = Type::Object(ObjectType { name: None, members: first });
        let b = Type::Object(ObjectType { name: None, members: second.clone() });
        assert_eq!(a, b);

        let named = Type::Object(ObjectType {
            name: Some(interner.intern("Point")),
            members: second,
        });
        assert_ne!(a, named);
    }

    #[test]
    fn display_renders_function_signatures() {
        let interner = StringInterner::new();
        let ty = Type::function(vec![Type::ANY, Type::INTEGER], Type::NIL);
        assert_eq!(ty.display(&interner), "(Any, Integer) -> Nil");
    }
}
