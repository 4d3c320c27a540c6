//! Per-call-site operator dispatch with a guarded inline cache.
//!
//! Deriving the rule for an operator plus two dynamic shapes is a small type
//! system in its own right, so each call site remembers the plan it derived
//! last time together with the shape pair that justified it. While live
//! operands keep matching the guard, the plan runs directly; a mismatch
//! discards the entry and derives once for the new shapes
//! (monomorphic-with-fallback, never shared across sites).

use std::sync::Arc;

use anyhow::Result;

use crate::error::EvalError;
use crate::val::{Shape, Val, to_number, to_str};

use super::equality::abstract_eq;
use super::ops::BinOp;

/// Shape pair a cached plan was specialized against. The sentinels
/// (`Undefined`, `Nan`, `Null`) are ordinary variant tags, so singleton
/// operands guard by shape like everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Guard {
    lhs: Shape,
    rhs: Shape,
}

impl Guard {
    #[inline]
    fn of(lhs: &Val, rhs: &Val) -> Self {
        Self {
            lhs: lhs.shape(),
            rhs: rhs.shape(),
        }
    }

    #[inline]
    fn holds(&self, lhs: &Val, rhs: &Val) -> bool {
        lhs.shape() == self.lhs && rhs.shape() == self.rhs
    }
}

/// Specialized executor for one (operator, shape pair). Infallible once
/// built; anything that can fail does so during rule derivation.
#[derive(Clone, Copy)]
enum Plan {
    /// String concatenation of both operands' ToString coercions.
    Concat,
    /// Numeric arithmetic over both operands' ToNumber coercions.
    Arith(fn(f64, f64) -> f64),
    /// Numeric relational comparison over both ToNumber coercions.
    Compare(fn(f64, f64) -> bool),
    Equal,
    NotEqual,
}

impl Plan {
    fn run(&self, lhs: &Val, rhs: &Val) -> Val {
        match self {
            Plan::Concat => {
                let a = to_str(lhs);
                let b = to_str(rhs);
                match (&a, &b) {
                    (Val::Str(a), Val::Str(b)) => {
                        let mut s = String::with_capacity(a.len() + b.len());
                        s.push_str(a);
                        s.push_str(b);
                        Val::Str(Arc::from(s.as_str()))
                    }
                    _ => Val::Nan,
                }
            }
            // An indeterminate operand forces the whole result to the
            // sentinel, for comparisons as well as arithmetic.
            Plan::Arith(f) => match (to_number(lhs), to_number(rhs)) {
                (Val::Num(a), Val::Num(b)) => Val::number(f(a, b)),
                _ => Val::Nan,
            },
            Plan::Compare(f) => match (to_number(lhs), to_number(rhs)) {
                (Val::Num(a), Val::Num(b)) => Val::Bool(f(a, b)),
                _ => Val::Nan,
            },
            Plan::Equal => Val::Bool(abstract_eq(lhs, rhs)),
            Plan::NotEqual => Val::Bool(!abstract_eq(lhs, rhs)),
        }
    }
}

/// Derive the executable rule for an operator and a shape pair. Coercion is
/// part of the rule itself, not of the cache: a plan re-coerces on every run.
fn rule_for(op: BinOp, lhs: Shape, rhs: Shape) -> Result<Plan> {
    let plan = match op {
        BinOp::Add => {
            if lhs == Shape::Str || rhs == Shape::Str {
                Plan::Concat
            } else {
                Plan::Arith(|a, b| a + b)
            }
        }
        BinOp::Sub => Plan::Arith(|a, b| a - b),
        BinOp::Mul => Plan::Arith(|a, b| a * b),
        BinOp::Div => Plan::Arith(|a, b| a / b),
        BinOp::Mod => Plan::Arith(|a, b| a % b),
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
            if lhs == Shape::Str && rhs == Shape::Str {
                // Lexicographic string comparison has no implemented rule;
                // guessing a numeric answer here would change language
                // semantics, so the gap surfaces as a hard failure.
                return Err(EvalError::UnsupportedOp { op, lhs, rhs }.into());
            }
            match op {
                BinOp::Lt => Plan::Compare(|a, b| a < b),
                BinOp::Gt => Plan::Compare(|a, b| a > b),
                BinOp::Le => Plan::Compare(|a, b| a <= b),
                _ => Plan::Compare(|a, b| a >= b),
            }
        }
        BinOp::Eq => Plan::Equal,
        BinOp::Ne => Plan::NotEqual,
    };
    Ok(plan)
}

/// One operator occurrence in the program: the inline cache plus its
/// instrumentation counters.
pub struct OpSite {
    op: BinOp,
    entry: Option<(Guard, Plan)>,
    hits: u64,
    specializations: u64,
}

impl OpSite {
    pub fn new(op: BinOp) -> Self {
        Self {
            op,
            entry: None,
            hits: 0,
            specializations: 0,
        }
    }

    #[inline]
    pub fn op(&self) -> BinOp {
        self.op
    }

    /// Evaluate this site's operator against two live operands.
    ///
    /// Guard hit: run the cached plan. Guard miss or cold site: discard the
    /// entry, derive the rule for the current shapes, cache it, run it.
    pub fn eval(&mut self, lhs: &Val, rhs: &Val) -> Result<Val> {
        if let Some((guard, plan)) = self.entry {
            if guard.holds(lhs, rhs) {
                self.hits += 1;
                return Ok(plan.run(lhs, rhs));
            }
            tracing::debug!(
                target: "jx::op::respecialize",
                op = %self.op,
                lhs = lhs.type_name(),
                rhs = rhs.type_name(),
                "guard miss, rebuilding plan"
            );
            self.entry = None;
        }
        let guard = Guard::of(lhs, rhs);
        let plan = rule_for(self.op, guard.lhs, guard.rhs)?;
        self.specializations += 1;
        self.entry = Some((guard, plan));
        Ok(plan.run(lhs, rhs))
    }

    /// How many times a cached plan ran without re-deriving the rule.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// How many times the rule was derived (initial build plus rebuilds).
    #[inline]
    pub fn specializations(&self) -> u64 {
        self.specializations
    }
}

/// Single-shot rule derivation and execution, bypassing any cache. The
/// cached path must agree with this for every operand pair.
pub fn eval_uncached(op: BinOp, lhs: &Val, rhs: &Val) -> Result<Val> {
    let plan = rule_for(op, lhs.shape(), rhs.shape())?;
    Ok(plan.run(lhs, rhs))
}
