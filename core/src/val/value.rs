use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::convert::number_to_string;

/// Object-to-primitive contract assumed from the object system.
///
/// The coercion and equality layers never look inside an object; they only
/// ask it for a primitive through these hooks. An implementation must return
/// `Val::Num`/`Val::Nan` from `to_number` and `Val::Str` from `to_str`.
pub trait ObjectModel: Debug {
    fn to_number(&self) -> Val;
    fn to_str(&self) -> Val;
}

/// Structural-equality contract for embedded host data.
///
/// Host values sit outside the primitive set; comparing two of them falls
/// back to this hook rather than reference identity.
pub trait HostValue: Debug {
    fn host_eq(&self, other: &dyn HostValue) -> bool;
    fn describe(&self) -> String;
}

/// Runtime value.
#[derive(Debug, Clone, Default)]
pub enum Val {
    #[default]
    Undefined,
    /// Not-a-number sentinel. Kept separate from `Num` so callers can match
    /// it structurally instead of testing float NaN payloads.
    Nan,
    /// Invariant: the payload is never `f64::NAN`; indeterminate numeric
    /// results are `Val::Nan`.
    Num(f64),
    /// Wrapped in `Arc<str>` for cheap cloning across frames and caches.
    Str(Arc<str>),
    Bool(bool),
    /// Language object; equality is reference identity.
    Obj(Arc<dyn ObjectModel>),
    /// Embedded host data; equality is the host's structural contract.
    Host(Arc<dyn HostValue>),
    /// Absence marker (the language's null).
    Null,
}

/// Runtime type tag of a value. Every dispatch decision is made on shapes,
/// never on value content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Shape {
    Undefined,
    Nan,
    Num,
    Str,
    Bool,
    Obj,
    Host,
    Null,
}

impl Val {
    /// Build a number, normalizing float NaN into the structural sentinel.
    #[inline]
    pub fn number(n: f64) -> Val {
        if n.is_nan() { Val::Nan } else { Val::Num(n) }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        match self {
            Val::Undefined => Shape::Undefined,
            Val::Nan => Shape::Nan,
            Val::Num(_) => Shape::Num,
            Val::Str(_) => Shape::Str,
            Val::Bool(_) => Shape::Bool,
            Val::Obj(_) => Shape::Obj,
            Val::Host(_) => Shape::Host,
            Val::Null => Shape::Null,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.shape().name()
    }
}

impl Shape {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Undefined => "Undefined",
            Shape::Nan => "NaN",
            Shape::Num => "Num",
            Shape::Str => "Str",
            Shape::Bool => "Bool",
            Shape::Obj => "Obj",
            Shape::Host => "Host",
            Shape::Null => "Null",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Strict structural equality. This is what `assert_eq!` and host embeddings
/// see; the language-level coercing comparison lives in `op::abstract_eq`.
impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Val::Undefined, Val::Undefined) => true,
            (Val::Nan, Val::Nan) => true,
            (Val::Num(a), Val::Num(b)) => a == b,
            (Val::Str(a), Val::Str(b)) => a == b,
            (Val::Bool(a), Val::Bool(b)) => a == b,
            (Val::Obj(a), Val::Obj(b)) => Arc::ptr_eq(a, b),
            (Val::Host(a), Val::Host(b)) => a.host_eq(b.as_ref()),
            (Val::Null, Val::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Undefined => write!(f, "undefined"),
            Val::Nan => write!(f, "NaN"),
            Val::Num(n) => write!(f, "{}", number_to_string(*n)),
            Val::Str(s) => write!(f, "{}", s.as_ref()),
            Val::Bool(b) => write!(f, "{b}"),
            Val::Obj(_) => write!(f, "<object>"),
            Val::Host(h) => write!(f, "{}", h.describe()),
            Val::Null => write!(f, "null"),
        }
    }
}

impl Serialize for Val {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Val::Undefined | Val::Null => serializer.serialize_unit(),
            // JSON has no NaN; keep the sentinel readable in dumps
            Val::Nan => serializer.serialize_str("NaN"),
            Val::Num(n) => serializer.serialize_f64(*n),
            Val::Str(s) => serializer.serialize_str(s.as_ref()),
            Val::Bool(b) => serializer.serialize_bool(*b),
            Val::Obj(_) => serializer.serialize_str("<object>"),
            Val::Host(h) => serializer.serialize_str(&h.describe()),
        }
    }
}
