//! Failure kinds for machine call dispatch.

use crate::types::address::Address;
use callsim_derive::Error;

/// Errors that can occur while dispatching a call through either execution
/// mode.
///
/// None of these escape a machine operation as a panic or an `Err`: the outer
/// operation always reports them as a `(0, false)` sum-and-success pair, and
/// any writes staged under the failing context are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CallError {
    /// Checked addition overflowed the 64-bit result width.
    #[error("arithmetic overflow: {a} + {b} does not fit in 64 bits")]
    ArithmeticOverflow { a: i64, b: i64 },
    /// Target address does not resolve to executable logic.
    #[error("no executable logic at {0}")]
    InvalidTarget(Address),
    /// Target resolved, but a borrowed context cannot be built over its code.
    #[error("contract at {0} exposes no delegatable logic")]
    ContextConstructionFailure(Address),
}
