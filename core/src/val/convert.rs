use std::sync::Arc;

use super::value::Val;

/// ToNumber abstract operation. Always yields `Num` or `Nan`; parse failure
/// degrades to the sentinel instead of raising, so callers can test for it
/// structurally.
pub fn to_number(v: &Val) -> Val {
    match v {
        Val::Num(_) | Val::Nan => v.clone(),
        Val::Bool(true) => Val::Num(1.0),
        Val::Bool(false) => Val::Num(0.0),
        Val::Str(s) => match s.trim().parse::<f64>() {
            Ok(n) => Val::number(n),
            Err(_) => Val::Nan,
        },
        Val::Undefined => Val::Nan,
        // Absence coerces like the language's null
        Val::Null => Val::Num(0.0),
        Val::Obj(o) => match o.to_number() {
            v @ (Val::Num(_) | Val::Nan) => v,
            _ => Val::Nan,
        },
        Val::Host(_) => Val::Nan,
    }
}

/// ToString abstract operation. Always yields a `Str`.
pub fn to_str(v: &Val) -> Val {
    match v {
        Val::Str(_) => v.clone(),
        Val::Num(n) => Val::Str(Arc::from(number_to_string(*n).as_str())),
        Val::Nan => Val::Str(Arc::from("NaN")),
        Val::Bool(true) => Val::Str(Arc::from("true")),
        Val::Bool(false) => Val::Str(Arc::from("false")),
        Val::Undefined => Val::Str(Arc::from("undefined")),
        Val::Null => Val::Str(Arc::from("null")),
        Val::Obj(o) => match o.to_str() {
            v @ Val::Str(_) => v,
            other => to_str(&other),
        },
        Val::Host(h) => Val::Str(Arc::from(h.describe().as_str())),
    }
}

// Doubles that hold an exact integer print without a fractional part, so
// string concatenation of a whole number reads "1x", not "1.0x".
pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    if n.fract() == 0.0 && n.abs() <= 9_007_199_254_740_992.0 {
        let mut buf = itoa::Buffer::new();
        buf.format(n as i64).to_string()
    } else {
        let mut buf = ryu::Buffer::new();
        buf.format(n).to_string()
    }
}

impl From<f64> for Val {
    #[inline]
    fn from(n: f64) -> Self {
        Val::number(n)
    }
}

impl From<bool> for Val {
    #[inline]
    fn from(b: bool) -> Self {
        Val::Bool(b)
    }
}

impl From<&str> for Val {
    #[inline]
    fn from(s: &str) -> Self {
        Val::Str(Arc::from(s))
    }
}

impl From<String> for Val {
    #[inline]
    fn from(s: String) -> Self {
        Val::Str(Arc::<str>::from(s))
    }
}
