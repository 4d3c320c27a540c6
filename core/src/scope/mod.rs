mod analyze;
mod frame;

#[cfg(test)]
mod analyze_test;

pub use analyze::{Resolved, ScopeAnalyzer, VarUse};
pub use frame::{Closure, Frame, FrameRef, ScopePolicy, UnboundRead, UnknownWrite};
