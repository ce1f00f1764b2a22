//! Delegated-execution simulator.
//!
//! Models the difference between two execution-delegation primitives over a
//! shared storage slot: an *external call* runs a callee's logic in the
//! callee's own context, while a *borrowed-context* (delegated) call runs the
//! same code against the caller's storage and identity. A small fungible
//! token ledger rides along as an independent collaborator.

pub mod ledger;
pub mod runtime;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;
