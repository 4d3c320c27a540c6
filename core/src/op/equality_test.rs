#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::op::abstract_eq;
    use crate::val::{HostValue, ObjectModel, Val};

    #[derive(Debug)]
    struct Boxed(f64, &'static str);

    impl ObjectModel for Boxed {
        fn to_number(&self) -> Val {
            Val::Num(self.0)
        }

        fn to_str(&self) -> Val {
            Val::Str(Arc::from(self.1))
        }
    }

    #[derive(Debug)]
    struct Tag(&'static str);

    impl HostValue for Tag {
        fn host_eq(&self, other: &dyn HostValue) -> bool {
            self.describe() == other.describe()
        }

        fn describe(&self) -> String {
            self.0.to_string()
        }
    }

    fn symmetric(l: &Val, r: &Val, expected: bool) {
        assert_eq!(abstract_eq(l, r), expected, "{l} == {r}");
        assert_eq!(abstract_eq(r, l), expected, "{r} == {l}");
    }

    #[test]
    fn same_shape_cases() {
        symmetric(&Val::Undefined, &Val::Undefined, true);
        symmetric(&Val::Null, &Val::Null, true);
        symmetric(&Val::Nan, &Val::Nan, true);
        symmetric(&Val::Num(1.0), &Val::Num(1.0), true);
        symmetric(&Val::Num(1.0), &Val::Num(2.0), false);
        symmetric(&Val::from("a"), &Val::from("a"), true);
        symmetric(&Val::from("a"), &Val::from("b"), false);
        symmetric(&Val::Bool(true), &Val::Bool(true), true);
        symmetric(&Val::Bool(true), &Val::Bool(false), false);
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Arc::new(Boxed(1.0, "x"));
        symmetric(&Val::Obj(a.clone()), &Val::Obj(a.clone()), true);
        // Same contents, different instance
        symmetric(&Val::Obj(a), &Val::Obj(Arc::new(Boxed(1.0, "x"))), false);
    }

    #[test]
    fn host_values_compare_structurally() {
        symmetric(
            &Val::Host(Arc::new(Tag("a"))),
            &Val::Host(Arc::new(Tag("a"))),
            true,
        );
        symmetric(
            &Val::Host(Arc::new(Tag("a"))),
            &Val::Host(Arc::new(Tag("b"))),
            false,
        );
    }

    #[test]
    fn absence_equals_undefined_regardless_of_order() {
        symmetric(&Val::Null, &Val::Undefined, true);
    }

    #[test]
    fn numeric_coercion_cases() {
        symmetric(&Val::Num(1.0), &Val::from("1"), true);
        symmetric(&Val::Num(1.0), &Val::from("2"), false);
        symmetric(&Val::Num(1.0), &Val::Bool(true), true);
        symmetric(&Val::Num(0.0), &Val::Bool(false), true);
        symmetric(&Val::Num(2.0), &Val::Bool(true), false);
        // An unparsable string never equals a number
        symmetric(&Val::Num(1.0), &Val::from("one"), false);
    }

    #[test]
    fn object_against_primitive_coerces_the_object() {
        let obj = Val::Obj(Arc::new(Boxed(5.0, "five")));
        symmetric(&obj, &Val::Num(5.0), true);
        symmetric(&obj, &Val::Num(6.0), false);
        symmetric(&obj, &Val::from("five"), true);
        symmetric(&obj, &Val::from("six"), false);
        // Bool against an object is false, no coercion applies
        symmetric(&obj, &Val::Bool(true), false);
    }

    #[test]
    fn remaining_combinations_are_false() {
        symmetric(&Val::Nan, &Val::Num(1.0), false);
        symmetric(&Val::Nan, &Val::Undefined, false);
        symmetric(&Val::Null, &Val::Num(0.0), false);
        symmetric(&Val::Undefined, &Val::from("undefined"), false);
        symmetric(&Val::Bool(false), &Val::from(""), false);
        symmetric(
            &Val::Host(Arc::new(Tag("a"))),
            &Val::Obj(Arc::new(Boxed(1.0, "a"))),
            false,
        );
    }
}
