//! Activation frames for dynamic variable access.
//!
//! A frame maps names to values and chains to exactly one enclosing frame.
//! Reads ("pull") and writes ("push") walk the chain outward; what happens
//! when the chain runs out is a policy of the root frame, not an implicit
//! side effect.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::ast::Func;
use crate::error::EvalError;
use crate::val::Val;

/// Shared handle to a frame, confined to one execution thread. A closure
/// capturing a frame extends its lifetime to the longest-lived holder.
pub type FrameRef = Rc<RefCell<Frame>>;

/// What `pull` does when a name is absent from the whole chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnboundRead {
    /// Surface `EvalError::UnboundVar`; an unbound read is a programmer
    /// error and must not be masked.
    #[default]
    Fail,
    /// Yield `Val::Undefined`, the lenient semantics some dialects use.
    Undefined,
}

/// What `push` does when no frame in the chain owns the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownWrite {
    /// Create the name in the outermost (global) frame.
    #[default]
    CreateGlobal,
    /// Reject the write with `EvalError::UnboundVar`.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopePolicy {
    pub unbound_read: UnboundRead,
    pub unknown_write: UnknownWrite,
}

#[derive(Debug)]
pub struct Frame {
    vars: FxHashMap<Arc<str>, Val>,
    parent: Option<FrameRef>,
    // Set on the root frame only; inner frames defer to it.
    policy: ScopePolicy,
}

impl Frame {
    /// Root frame of a chain. Unresolved reads and writes bottom out here
    /// and are handled per `policy`.
    pub fn global(policy: ScopePolicy) -> FrameRef {
        Rc::new(RefCell::new(Frame {
            vars: FxHashMap::default(),
            parent: None,
            policy,
        }))
    }

    /// Activation frame enclosed by `parent`.
    pub fn nested(parent: &FrameRef) -> FrameRef {
        Rc::new(RefCell::new(Frame {
            vars: FxHashMap::default(),
            parent: Some(Rc::clone(parent)),
            policy: ScopePolicy::default(),
        }))
    }

    /// Bind a name in this frame directly, without chain traversal. Used
    /// when an activation seeds its parameters and locals.
    pub fn declare(frame: &FrameRef, name: &str, value: Val) {
        frame.borrow_mut().vars.insert(Arc::from(name), value);
    }

    /// Read `name`, walking the chain outward from `frame`.
    pub fn pull(frame: &FrameRef, name: &str) -> Result<Val> {
        let mut cur = Rc::clone(frame);
        loop {
            let next = {
                let f = cur.borrow();
                if let Some(v) = f.vars.get(name) {
                    return Ok(v.clone());
                }
                f.parent.clone()
            };
            match next {
                Some(p) => cur = p,
                None => break,
            }
        }
        // `cur` is the root frame here
        match cur.borrow().policy.unbound_read {
            UnboundRead::Undefined => Ok(Val::Undefined),
            UnboundRead::Fail => Err(EvalError::UnboundVar { name: name.to_string() }.into()),
        }
    }

    /// Write `name`, mutating the first frame in the chain that owns it.
    /// Returns the written value.
    pub fn push(frame: &FrameRef, name: &str, value: Val) -> Result<Val> {
        let mut cur = Rc::clone(frame);
        loop {
            let next = {
                let mut f = cur.borrow_mut();
                if let Some(slot) = f.vars.get_mut(name) {
                    *slot = value.clone();
                    return Ok(value);
                }
                f.parent.clone()
            };
            match next {
                Some(p) => cur = p,
                None => break,
            }
        }
        let mut root = cur.borrow_mut();
        match root.policy.unknown_write {
            UnknownWrite::CreateGlobal => {
                tracing::debug!(target: "jx::scope", name, "implicit global created");
                root.vars.insert(Arc::from(name), value.clone());
                Ok(value)
            }
            UnknownWrite::Fail => Err(EvalError::UnboundVar { name: name.to_string() }.into()),
        }
    }

    /// Whether this frame itself owns `name` (no chain traversal).
    pub fn owns(frame: &FrameRef, name: &str) -> bool {
        frame.borrow().vars.contains_key(name)
    }
}

/// Runtime closure value: a function plus the frame chain it captured at
/// the point the function expression was evaluated.
#[derive(Debug, Clone)]
pub struct Closure {
    func: Arc<Func>,
    scope: FrameRef,
}

impl Closure {
    pub fn capture(func: Arc<Func>, scope: &FrameRef) -> Self {
        Self {
            func,
            scope: Rc::clone(scope),
        }
    }

    #[inline]
    pub fn func(&self) -> &Arc<Func> {
        &self.func
    }

    #[inline]
    pub fn scope(&self) -> &FrameRef {
        &self.scope
    }

    /// Begin an activation: a fresh frame under the captured scope with the
    /// declared parameters bound to `args` (missing arguments become
    /// `Undefined`). The synthetic closure slot is compile-time only and
    /// takes no binding here.
    pub fn activate(&self, args: &[Val]) -> FrameRef {
        let frame = Frame::nested(&self.scope);
        for (i, param) in self.func.declared_params().enumerate() {
            let value = args.get(i).cloned().unwrap_or(Val::Undefined);
            Frame::declare(&frame, param, value);
        }
        frame
    }
}
