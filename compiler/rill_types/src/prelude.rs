//! Named types and the bindings every program starts with.

use rustc_hash::FxHashMap;

use rill_ir::{Name, StringInterner};

use crate::ty::{ObjectType, Primitive, Type, TypeScope};

/// Maps type annotation names (`Integer`, `Iterable`, ...) to types.
#[derive(Debug)]
pub struct TypeRegistry {
    map: FxHashMap<Name, Type>,
}

impl TypeRegistry {
    pub fn new(interner: &StringInterner) -> Self {
        let mut map = FxHashMap::default();
        for primitive in Primitive::ALL {
            map.insert(interner.intern(primitive.name()), Type::Primitive(primitive));
        }
        TypeRegistry { map }
    }

    pub fn lookup(&self, name: Name) -> Option<&Type> {
        self.map.get(&name)
    }
}

/// The root static scope: built-in functions plus a small family of
/// pre-typed variables and objects used by programs and tests.
pub fn prelude_scope(interner: &StringInterner) -> TypeScope {
    let scope = TypeScope::root();
    let define = |name: &str, ty: Type| {
        let _ = scope.define(interner.intern(name), ty);
    };

    define("any", Type::ANY);
    define("dynamic", Type::DYNAMIC);
    define("equatable", Type::EQUATABLE);
    define("comparable", Type::COMPARABLE);
    define("iterable", Type::ITERABLE);

    define("log", Type::function(vec![Type::ANY], Type::DYNAMIC));
    define("debug", Type::function(vec![Type::ANY], Type::NIL));
    define("print", Type::function(vec![Type::ANY], Type::NIL));
    define(
        "range",
        Type::function(vec![Type::INTEGER, Type::INTEGER], Type::ITERABLE),
    );

    define("variable", Type::STRING);
    define("function", Type::function(vec![], Type::NIL));
    define("functionAny", Type::function(vec![Type::ANY], Type::ANY));
    define(
        "functionString",
        Type::function(vec![Type::STRING], Type::STRING),
    );

    let prototype_members = TypeScope::root();
    let _ = prototype_members.define(interner.intern("inherited_property"), Type::STRING);
    let _ = prototype_members.define(
        interner.intern("inherited_method"),
        Type::function(vec![], Type::NIL),
    );
    let prototype = Type::Object(ObjectType {
        name: Some(interner.intern("Prototype")),
        members: prototype_members,
    });
    define("prototype", prototype.clone());

    let object_members = TypeScope::root();
    let _ = object_members.define(interner.intern("prototype"), prototype);
    let _ = object_members.define(interner.intern("property"), Type::STRING);
    let _ = object_members.define(interner.intern("method"), Type::function(vec![], Type::NIL));
    let _ = object_members.define(
        interner.intern("methodAny"),
        Type::function(vec![Type::ANY], Type::ANY),
    );
    let _ = object_members.define(
        interner.intern("methodString"),
        Type::function(vec![Type::STRING], Type::STRING),
    );
    define(
        "object",
        Type::Object(ObjectType {
            name: Some(interner.intern("Object")),
            members: object_members,
        }),
    );

    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::WellKnown;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_resolves_every_primitive_name() {
        let interner = StringInterner::new();
        let registry = TypeRegistry::new(&interner);
        for primitive in Primitive::ALL {
            let name = interner.intern(primitive.name());
            assert_eq!(registry.lookup(name), Some(&Type::Primitive(primitive)));
        }
        assert_eq!(registry.lookup(interner.intern("NotAType")), None);
    }

    #[test]
    fn prelude_object_inherits_from_prototype() {
        let interner = StringInterner::new();
        let names = WellKnown::new(&interner);
        let scope = prelude_scope(&interner);

        let object = scope.resolve(interner.intern("object"), false).unwrap();
        let prototype = scope.resolve(interner.intern("prototype"), false).unwrap();
        assert!(object.is_subtype_of(&prototype, &names));
    }

    #[test]
    fn prelude_builtins_are_functions() {
        let interner = StringInterner::new();
        let scope = prelude_scope(&interner);
        let log = scope.resolve(interner.intern("log"), false).unwrap();
        assert_eq!(log, Type::function(vec![Type::ANY], Type::DYNAMIC));
    }
}
