use std::sync::Arc;

use crate::val::{Val, to_number};

/// Abstract (coercing) equality.
///
/// Cases are checked top to bottom: same-shape comparisons first, then the
/// cross-shape coercion rules, then false. The table is total; no operand
/// combination escapes it.
pub fn abstract_eq(target: &Val, arg: &Val) -> bool {
    match (target, arg) {
        // Same shape
        (Val::Undefined, Val::Undefined) => true,
        (Val::Null, Val::Null) => true,
        (Val::Nan, Val::Nan) => true,
        (Val::Num(a), Val::Num(b)) => a == b,
        (Val::Str(a), Val::Str(b)) => a == b,
        (Val::Bool(a), Val::Bool(b)) => a == b,
        // Reference identity, not structural equality
        (Val::Obj(a), Val::Obj(b)) => Arc::ptr_eq(a, b),
        // Host data compares through the embedder's structural contract
        (Val::Host(a), Val::Host(b)) => a.host_eq(b.as_ref()),

        // Absence and undefined are mutually equal, in either order
        (Val::Null, Val::Undefined) | (Val::Undefined, Val::Null) => true,

        // Num vs Str / Num vs Bool: coerce both sides to number
        (Val::Num(_), Val::Str(_))
        | (Val::Str(_), Val::Num(_))
        | (Val::Num(_), Val::Bool(_))
        | (Val::Bool(_), Val::Num(_)) => numeric_eq(target, arg),

        // Num or Str vs object: coerce the object to the matching primitive.
        // Any other primitive against an object (Bool, sentinels) is false.
        (Val::Num(a), Val::Obj(o)) | (Val::Obj(o), Val::Num(a)) => match o.to_number() {
            Val::Num(b) => *a == b,
            _ => false,
        },
        (Val::Str(s), Val::Obj(o)) | (Val::Obj(o), Val::Str(s)) => match o.to_str() {
            Val::Str(t) => *s == t,
            _ => false,
        },

        _ => false,
    }
}

fn numeric_eq(l: &Val, r: &Val) -> bool {
    match (to_number(l), to_number(r)) {
        (Val::Num(a), Val::Num(b)) => a == b,
        _ => false,
    }
}
