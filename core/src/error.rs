use std::fmt;

use crate::op::BinOp;
use crate::val::Shape;

/// Failures that must reach the embedding layer as distinguishable signals.
///
/// Carried inside `anyhow::Error`; callers branch on the kind with
/// `err.downcast_ref::<EvalError>()`. Coercion failure is never an error
/// (it is the `Val::Nan` sentinel), and a stale dispatch guard is recovered
/// inside `op::dispatch` without surfacing here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// An operator/shape combination with no implemented rule.
    UnsupportedOp { op: BinOp, lhs: Shape, rhs: Shape },
    /// A variable read that reached the end of the frame chain.
    UnboundVar { name: String },
    /// A variable-table lookup on a function the analyzer has not visited.
    Unanalyzed { func: String, name: String },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnsupportedOp { op, lhs, rhs } => {
                write!(f, "unsupported operands for {op}: {lhs} {op} {rhs}")
            }
            EvalError::UnboundVar { name } => write!(f, "unbound variable: {name}"),
            EvalError::Unanalyzed { func, name } => {
                write!(f, "lookup of '{name}' in unanalyzed function '{func}'")
            }
        }
    }
}

impl std::error::Error for EvalError {}
