//! The subtype relation.
//!
//! `Any` is the top type and `Dynamic` is compatible in both directions.
//! `Comparable` covers the ordered primitives, `Equatable` additionally
//! covers `Nil` and `Iterable`. Object subtyping follows the `prototype`
//! member chain.

use crate::ty::{Primitive, Type, WellKnown};

impl Type {
    pub fn is_subtype_of(&self, supertype: &Type, names: &WellKnown) -> bool {
        if matches!(supertype, Type::Primitive(Primitive::Any)) {
            return true;
        }
        if self.is_dynamic() || supertype.is_dynamic() {
            return true;
        }
        if self == supertype {
            return true;
        }
        match supertype {
            Type::Primitive(Primitive::Equatable) => {
                matches!(
                    self,
                    Type::Primitive(Primitive::Nil | Primitive::Comparable | Primitive::Iterable)
                ) || self.is_subtype_of(&Type::COMPARABLE, names)
            }
            Type::Primitive(Primitive::Comparable) => matches!(
                self,
                Type::Primitive(
                    Primitive::Boolean
                        | Primitive::Integer
                        | Primitive::Decimal
                        | Primitive::Character
                        | Primitive::String
                )
            ),
            Type::Object(_) => self.prototype_chain_reaches(supertype, names),
            _ => false,
        }
    }

    /// Walk `self`'s `prototype` links looking for `supertype`. A `Dynamic`
    /// prototype makes the rest of the chain unknowable, so it matches.
    fn prototype_chain_reaches(&self, supertype: &Type, names: &WellKnown) -> bool {
        let mut current = self.clone();
        while let Type::Object(object) = &current {
            if current == *supertype {
                return true;
            }
            let Some(prototype) = object.members.resolve(names.prototype, true) else {
                break;
            };
            if prototype.is_dynamic() {
                return true;
            }
            current = prototype;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{ObjectType, TypeScope};
    use proptest::prelude::*;
    use rill_ir::StringInterner;

    fn names() -> (StringInterner, WellKnown) {
        let interner = StringInterner::new();
        let names = WellKnown::new(&interner);
        (interner, names)
    }

    #[test]
    fn any_is_top() {
        let (_, names) = names();
        for primitive in Primitive::ALL {
            assert!(Type::Primitive(primitive).is_subtype_of(&Type::ANY, &names));
        }
        assert!(Type::function(vec![], Type::NIL).is_subtype_of(&Type::ANY, &names));
    }

    #[test]
    fn dynamic_is_compatible_both_ways() {
        let (_, names) = names();
        assert!(Type::DYNAMIC.is_subtype_of(&Type::INTEGER, &names));
        assert!(Type::INTEGER.is_subtype_of(&Type::DYNAMIC, &names));
    }

    #[test]
    fn comparable_covers_ordered_primitives() {
        let (_, names) = names();
        for ty in [
            Type::BOOLEAN,
            Type::INTEGER,
            Type::DECIMAL,
            Type::CHARACTER,
            Type::STRING,
        ] {
            assert!(ty.is_subtype_of(&Type::COMPARABLE, &names));
        }
        assert!(!Type::NIL.is_subtype_of(&Type::COMPARABLE, &names));
        assert!(!Type::ITERABLE.is_subtype_of(&Type::COMPARABLE, &names));
    }

    #[test]
    fn equatable_extends_comparable_with_nil_and_iterable() {
        let (_, names) = names();
        assert!(Type::NIL.is_subtype_of(&Type::EQUATABLE, &names));
        assert!(Type::ITERABLE.is_subtype_of(&Type::EQUATABLE, &names));
        assert!(Type::STRING.is_subtype_of(&Type::EQUATABLE, &names));
        assert!(!Type::ANY.is_subtype_of(&Type::EQUATABLE, &names));
    }

    #[test]
    fn object_subtypes_its_prototype() {
        let (interner, names) = names();
        let proto_members = TypeScope::root();
        let prototype = Type::Object(ObjectType {
            name: Some(interner.intern("Prototype")),
            members: proto_members,
        });

        let members = TypeScope::root();
        members.define(names.prototype, prototype.clone()).unwrap();
        let object = Type::Object(ObjectType {
            name: Some(interner.intern("Object")),
            members,
        });

        assert!(object.is_subtype_of(&prototype, &names));
        assert!(!prototype.is_subtype_of(&object, &names));
    }

    #[test]
    fn dynamic_prototype_matches_any_object() {
        let (interner, names) = names();
        let members = TypeScope::root();
        members.define(names.prototype, Type::DYNAMIC).unwrap();
        let object = Type::Object(ObjectType { name: None, members });

        let other = Type::Object(ObjectType {
            name: Some(interner.intern("Other")),
            members: TypeScope::root(),
        });
        assert!(object.is_subtype_of(&other, &names));
    }

    #[test]
    fn function_types_relate_only_reflexively() {
        let (_, names) = names();
        let a = Type::function(vec![Type::INTEGER], Type::NIL);
        let b = Type::function(vec![Type::STRING], Type::NIL);
        assert!(a.is_subtype_of(&a, &names));
        assert!(!a.is_subtype_of(&b, &names));
        assert!(!a.is_subtype_of(&Type::COMPARABLE, &names));
    }

    proptest! {
        #[test]
        fn reflexive_over_primitives(index in 0..Primitive::ALL.len()) {
            let (_, names) = names();
            let ty = Type::Primitive(Primitive::ALL[index]);
            prop_assert!(ty.is_subtype_of(&ty, &names));
        }

        #[test]
        fn every_primitive_flows_into_any_and_dynamic(index in 0..Primitive::ALL.len()) {
            let (_, names) = names();
            let ty = Type::Primitive(Primitive::ALL[index]);
            prop_assert!(ty.is_subtype_of(&Type::ANY, &names));
            prop_assert!(ty.is_subtype_of(&Type::DYNAMIC, &names));
        }
    }
}
