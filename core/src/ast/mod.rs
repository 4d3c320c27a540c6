//! Minimal AST surface consumed by the scope analyzer.
//!
//! The parser collaborator builds these nodes; only the function and
//! statement kinds the analyzer needs are modeled. Every node supports a
//! diagnostic s-expression dump via `write`.


use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::error::EvalError;
use crate::op::BinOp;
use crate::scope::VarUse;

/// Synthetic always-first parameter carrying the enclosing-closure
/// reference. The leading slashes keep it unlexable as a user identifier.
pub const CLOSURE_PARAM: &str = "//closure";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// The synthetic closure slot, always index 0.
    Closure,
    Param,
    Local,
}

/// One declared name in a function's variable table. `kind` and `index`
/// are what the executor later uses to decide between a local slot and an
/// ascent of the frame chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    pub index: u16,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
    Ident(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Assign {
        name: String,
        value: Box<Expr>,
    },
    Func(Arc<Func>),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    Var { name: String, init: Option<Expr> },
    Return(Option<Expr>),
    Block(Vec<Stmt>),
}

/// One function definition. The variable table starts empty and is only
/// valid after the scope analyzer has visited the node; lookups before
/// that fail loudly instead of returning absence.
#[derive(Debug)]
pub struct Func {
    name: Option<String>,
    params: Vec<String>,
    body: Stmt,
    vars: RefCell<FxHashMap<String, Variable>>,
    uses: RefCell<Vec<VarUse>>,
    analyzed: Cell<bool>,
}

impl Func {
    /// The synthetic closure parameter is inserted ahead of the declared
    /// parameter names.
    pub fn new(name: Option<String>, params: Vec<String>, body: Stmt) -> Arc<Func> {
        let mut all = Vec::with_capacity(params.len() + 1);
        all.push(CLOSURE_PARAM.to_string());
        all.extend(params);
        Arc::new(Func {
            name,
            params: all,
            body,
            vars: RefCell::new(FxHashMap::default()),
            uses: RefCell::new(Vec::new()),
            analyzed: Cell::new(false),
        })
    }

    #[inline]
    pub fn is_lambda(&self) -> bool {
        self.name.is_none()
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// All parameter names, synthetic closure slot included.
    #[inline]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// The parameters the program actually declared.
    pub fn declared_params(&self) -> impl Iterator<Item = &str> {
        self.params.iter().skip(1).map(String::as_str)
    }

    #[inline]
    pub fn body(&self) -> &Stmt {
        &self.body
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<lambda>")
    }

    #[inline]
    pub fn analyzed(&self) -> bool {
        self.analyzed.get()
    }

    /// Look up a declared name. Errors if the analyzer has not run, or if
    /// the name is not in this function's table.
    pub fn var(&self, name: &str) -> Result<Variable> {
        if !self.analyzed.get() {
            return Err(EvalError::Unanalyzed {
                func: self.display_name().to_string(),
                name: name.to_string(),
            }
            .into());
        }
        self.vars
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundVar { name: name.to_string() }.into())
    }

    /// Full table in declaration order. Same analyzed-only contract as
    /// [`Func::var`].
    pub fn variables(&self) -> Result<Vec<Variable>> {
        if !self.analyzed.get() {
            return Err(EvalError::Unanalyzed {
                func: self.display_name().to_string(),
                name: "*".to_string(),
            }
            .into());
        }
        let mut all: Vec<Variable> = self.vars.borrow().values().cloned().collect();
        all.sort_by_key(|v| v.index);
        Ok(all)
    }

    /// Use sites recorded by the analyzer, in visit order.
    pub fn uses(&self) -> Vec<VarUse> {
        self.uses.borrow().clone()
    }

    // Analyzer-side table access; bypasses the analyzed gate because the
    // table is being built while nested lookups run.
    pub(crate) fn lookup(&self, name: &str) -> Option<Variable> {
        self.vars.borrow().get(name).cloned()
    }

    pub(crate) fn reset_table(&self) {
        self.vars.borrow_mut().clear();
        self.uses.borrow_mut().clear();
        self.analyzed.set(false);
    }

    /// Register a name, allocating the next slot index. Re-declaring an
    /// existing name reuses its slot.
    pub(crate) fn declare(&self, name: &str, kind: VarKind) -> u16 {
        let mut vars = self.vars.borrow_mut();
        if let Some(existing) = vars.get(name) {
            return existing.index;
        }
        let index = vars.len() as u16;
        vars.insert(
            name.to_string(),
            Variable {
                name: name.to_string(),
                kind,
                index,
            },
        );
        index
    }

    pub(crate) fn record_use(&self, var_use: VarUse) {
        self.uses.borrow_mut().push(var_use);
    }

    pub(crate) fn mark_analyzed(&self) {
        self.analyzed.set(true);
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

impl Expr {
    pub fn write(&self, out: &mut String, depth: usize) {
        match self {
            Expr::Num(n) => {
                indent(out, depth);
                out.push_str(&format!("(Num {n})\n"));
            }
            Expr::Str(s) => {
                indent(out, depth);
                out.push_str(&format!("(Str {s:?})\n"));
            }
            Expr::Bool(b) => {
                indent(out, depth);
                out.push_str(&format!("(Bool {b})\n"));
            }
            Expr::Null => {
                indent(out, depth);
                out.push_str("(Null)\n");
            }
            Expr::Undefined => {
                indent(out, depth);
                out.push_str("(Undefined)\n");
            }
            Expr::Ident(name) => {
                indent(out, depth);
                out.push_str(&format!("(Ident {name})\n"));
            }
            Expr::Binary { op, lhs, rhs } => {
                indent(out, depth);
                out.push_str(&format!("(Binary {op}\n"));
                lhs.write(out, depth + 1);
                rhs.write(out, depth + 1);
                indent(out, depth);
                out.push_str(")\n");
            }
            Expr::Assign { name, value } => {
                indent(out, depth);
                out.push_str(&format!("(Assign {name}\n"));
                value.write(out, depth + 1);
                indent(out, depth);
                out.push_str(")\n");
            }
            Expr::Func(f) => f.write_at(out, depth),
            Expr::Call { callee, args } => {
                indent(out, depth);
                out.push_str("(Call\n");
                callee.write(out, depth + 1);
                for a in args {
                    a.write(out, depth + 1);
                }
                indent(out, depth);
                out.push_str(")\n");
            }
        }
    }
}

impl Stmt {
    pub fn write(&self, out: &mut String, depth: usize) {
        match self {
            Stmt::Expr(e) => e.write(out, depth),
            Stmt::Var { name, init } => {
                indent(out, depth);
                out.push_str(&format!("(Var {name}\n"));
                if let Some(e) = init {
                    e.write(out, depth + 1);
                }
                indent(out, depth);
                out.push_str(")\n");
            }
            Stmt::Return(e) => {
                indent(out, depth);
                out.push_str("(Return\n");
                if let Some(e) = e {
                    e.write(out, depth + 1);
                }
                indent(out, depth);
                out.push_str(")\n");
            }
            Stmt::Block(stmts) => {
                indent(out, depth);
                out.push_str("(Block\n");
                for s in stmts {
                    s.write(out, depth + 1);
                }
                indent(out, depth);
                out.push_str(")\n");
            }
        }
    }
}

impl Func {
    /// Diagnostic dump. The variable table appears once the analyzer has
    /// populated it.
    pub fn write(&self, out: &mut String, depth: usize) {
        self.write_at(out, depth);
    }

    fn write_at(&self, out: &mut String, depth: usize) {
        indent(out, depth);
        out.push_str(&format!("(Func {}\n", self.display_name()));
        if self.analyzed.get() {
            indent(out, depth + 1);
            out.push_str("(Variables\n");
            let mut all: Vec<Variable> = self.vars.borrow().values().cloned().collect();
            all.sort_by_key(|v| v.index);
            for v in all {
                indent(out, depth + 2);
                out.push_str(&format!("({:?} {} {})\n", v.kind, v.name, v.index));
            }
            indent(out, depth + 1);
            out.push_str(")\n");
        }
        self.body.write(out, depth + 1);
        indent(out, depth);
        out.push_str(")\n");
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_at(&mut out, 0);
        write!(f, "{out}")
    }
}
