mod dispatch;
mod equality;
mod ops;

#[cfg(test)]
mod equality_test;

pub use dispatch::{OpSite, eval_uncached};
pub use equality::abstract_eq;
pub use ops::BinOp;
