//! The shared unit of logic invoked by both call modes.

use crate::runtime::context::{ContextOverlay, ContractLogic, ExecutionContext, ResultSlots};
use crate::runtime::error::CallError;
use crate::types::address::Address;

/// A deployed calculator: an address plus its own result slots.
///
/// The calculator's logic writes through whichever context it runs under. Its
/// own slots are only touched when the logic executes in *own-context* mode;
/// a borrowing machine that runs the same code never reaches them.
pub struct Calculator {
    address: Address,
    slots: ResultSlots,
}

impl Calculator {
    /// Creates a calculator at the given address with zeroed slots.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            slots: ResultSlots::new(),
        }
    }

    /// Returns the calculator's deployed address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the calculator's own result slots, for context construction.
    pub fn slots(&self) -> &ResultSlots {
        &self.slots
    }

    /// Returns the calculator's own last computed result.
    ///
    /// Own context only: values written while a caller borrowed this
    /// calculator's code are never visible here.
    pub fn last_result(&self) -> i64 {
        self.slots.last_result()
    }

    /// Returns the identity that last called into this calculator's own
    /// context, or the zero address if it was never called.
    pub fn last_caller(&self) -> Address {
        self.slots.last_caller()
    }

    /// Invokes the calculator directly in its own context.
    ///
    /// `caller` is the explicit identity of whoever is making the call; there
    /// is no ambient "current caller".
    pub fn compute_sum_as(&self, caller: Address, a: i64, b: i64) -> Result<i64, CallError> {
        let ctx = ExecutionContext::new(None, caller, &self.slots);
        ctx.execute(self, a, b)
    }
}

impl ContractLogic for Calculator {
    /// Checked addition over `i64`: overflow fails the whole call rather than
    /// wrapping. The sum and the active caller identity go into whichever
    /// context is running; the sum is also staged for the context's storage
    /// cell when one exists.
    fn compute_sum(&self, overlay: &mut ContextOverlay, a: i64, b: i64) -> Result<i64, CallError> {
        let sum = a
            .checked_add(b)
            .ok_or(CallError::ArithmeticOverflow { a, b })?;
        overlay.record_result(sum);
        overlay.record_caller(overlay.caller());
        overlay.store(sum);
        Ok(sum)
    }
}
