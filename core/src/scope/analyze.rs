//! Static scope analysis over function AST nodes.
//!
//! One pass per function definition, run by the front end before any
//! execution. The analyzer keeps a stack of the functions it is inside;
//! the top of the stack is the current scope for every lookup. Each
//! function's variable table is registered in full (synthetic closure
//! slot, parameters, hoisted locals) before its body is walked, so body
//! references resolve against a complete table.

use std::sync::Arc;

use crate::ast::{CLOSURE_PARAM, Expr, Func, Stmt, VarKind};

/// Where an identifier reference lands: a slot of the current function, a
/// slot some number of functions out, or nowhere in the lexical chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Local(u16),
    Enclosing { depth: u16, index: u16 },
    Global,
}

/// One identifier reference, classified. The executor reads these to pick
/// between a local slot and a frame-chain ascent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarUse {
    pub name: String,
    pub target: Resolved,
}

#[derive(Debug, Default)]
pub struct ScopeAnalyzer {
    stack: Vec<Arc<Func>>,
}

impl ScopeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze one function definition, recursing into nested functions.
    /// Re-analyzing a node rebuilds its table from scratch, so the result
    /// is identical on every run.
    pub fn analyze(&mut self, func: &Arc<Func>) {
        // A named function resolves its own name in the enclosing scope
        // before that scope gains the new frame.
        if let Some(name) = func.name()
            && !self.stack.is_empty()
        {
            self.record_use(name);
        }

        func.reset_table();
        debug_assert_eq!(func.params().first().map(String::as_str), Some(CLOSURE_PARAM));
        for (i, p) in func.params().iter().enumerate() {
            let kind = if i == 0 { VarKind::Closure } else { VarKind::Param };
            func.declare(p, kind);
        }
        Self::hoist_stmt(func, func.body());

        self.stack.push(Arc::clone(func));
        self.walk_stmt(func.body());
        self.stack.pop();

        func.mark_analyzed();
    }

    /// Classify `name` against the current analysis stack, innermost
    /// function first.
    pub fn resolve(&self, name: &str) -> Resolved {
        for (depth, func) in self.stack.iter().rev().enumerate() {
            if let Some(var) = func.lookup(name) {
                return if depth == 0 {
                    Resolved::Local(var.index)
                } else {
                    Resolved::Enclosing {
                        depth: depth as u16,
                        index: var.index,
                    }
                };
            }
        }
        Resolved::Global
    }

    // Register local declarations ahead of the body walk. Does not descend
    // into nested functions; those own their declarations.
    fn hoist_stmt(func: &Arc<Func>, stmt: &Stmt) {
        match stmt {
            Stmt::Var { name, .. } => {
                func.declare(name, VarKind::Local);
            }
            Stmt::Block(stmts) => {
                for s in stmts {
                    Self::hoist_stmt(func, s);
                }
            }
            Stmt::Expr(_) | Stmt::Return(_) => {}
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(e) => self.walk_expr(e),
            Stmt::Var { name, init } => {
                if let Some(e) = init {
                    self.walk_expr(e);
                }
                self.record_use(name);
            }
            Stmt::Return(e) => {
                if let Some(e) = e {
                    self.walk_expr(e);
                }
            }
            Stmt::Block(stmts) => {
                for s in stmts {
                    self.walk_stmt(s);
                }
            }
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Num(_) | Expr::Str(_) | Expr::Bool(_) | Expr::Null | Expr::Undefined => {}
            Expr::Ident(name) => self.record_use(name),
            Expr::Binary { lhs, rhs, .. } => {
                self.walk_expr(lhs);
                self.walk_expr(rhs);
            }
            Expr::Assign { name, value } => {
                self.walk_expr(value);
                self.record_use(name);
            }
            Expr::Func(f) => self.analyze(f),
            Expr::Call { callee, args } => {
                self.walk_expr(callee);
                for a in args {
                    self.walk_expr(a);
                }
            }
        }
    }

    fn record_use(&mut self, name: &str) {
        let target = self.resolve(name);
        if let Some(cur) = self.stack.last() {
            cur.record_use(VarUse {
                name: name.to_string(),
                target,
            });
        }
    }
}
