//! Execution contexts and transactional write staging.
//!
//! An [`ExecutionContext`] is the transient `{storage, caller, slots}` record
//! that decides whose state a piece of running logic observes and mutates.
//! The two call modes construct it differently; the logic itself is oblivious.
//!
//! Writes never hit the owner directly while logic runs. They are staged in a
//! [`ContextOverlay`] and applied only after the logic returns successfully,
//! so a failed call is indistinguishable from one that never ran.

use crate::runtime::cell::StorageCell;
use crate::runtime::error::CallError;
use crate::types::address::Address;
use std::sync::{Arc, Mutex};

/// The `{last_result, last_caller}` mirror pair owned by each contract.
///
/// Shared by reference, like [`StorageCell`]: a clone aliases the same pair.
/// Both fields start at their zero sentinels and are overwritten together on
/// every successful call that runs under the owning context (last-write-wins).
#[derive(Clone, Debug)]
pub struct ResultSlots {
    inner: Arc<Mutex<SlotValues>>,
}

#[derive(Clone, Copy, Debug)]
struct SlotValues {
    last_result: i64,
    last_caller: Address,
}

impl ResultSlots {
    /// Creates slots at their defaults: result `0`, caller zero address.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SlotValues {
                last_result: 0,
                last_caller: Address::zero(),
            })),
        }
    }

    /// Returns the last computed result.
    pub fn last_result(&self) -> i64 {
        self.inner.lock().unwrap().last_result
    }

    /// Returns the identity recorded by the last call, or the zero address.
    pub fn last_caller(&self) -> Address {
        self.inner.lock().unwrap().last_caller
    }

    /// Applies committed slot writes under a single lock.
    fn apply(&self, result: Option<i64>, caller: Option<Address>) {
        let mut values = self.inner.lock().unwrap();
        if let Some(result) = result {
            values.last_result = result;
        }
        if let Some(caller) = caller {
            values.last_caller = caller;
        }
    }
}

impl Default for ResultSlots {
    fn default() -> Self {
        Self::new()
    }
}

/// Staging area for writes attempted under one execution context.
///
/// Collects pending writes while logic runs; nothing reaches the context
/// owner until [`ExecutionContext::execute`] commits. Dropping the overlay
/// discards everything, which is how failed calls stay atomic.
pub struct ContextOverlay {
    /// Identity the running logic observes as its caller.
    caller: Address,
    /// Pending `last_result` write.
    result: Option<i64>,
    /// Pending `last_caller` write.
    recorded_caller: Option<Address>,
    /// Pending storage-cell write, applied only if the context carries a cell.
    stored: Option<i64>,
}

impl ContextOverlay {
    fn new(caller: Address) -> Self {
        Self {
            caller,
            result: None,
            recorded_caller: None,
            stored: None,
        }
    }

    /// Returns the caller identity of the active context.
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Stages a write to the context owner's `last_result` slot.
    pub fn record_result(&mut self, result: i64) {
        self.result = Some(result);
    }

    /// Stages a write to the context owner's `last_caller` slot.
    pub fn record_caller(&mut self, caller: Address) {
        self.recorded_caller = Some(caller);
    }

    /// Stages a write to the context owner's storage cell.
    pub fn store(&mut self, value: i64) {
        self.stored = Some(value);
    }
}

/// Logic that can run under a foreign execution context.
///
/// Implementors read and write exclusively through the overlay they are
/// handed; they never touch their own fields directly. That single rule is
/// what lets the same code mutate either side depending on the call mode.
pub trait ContractLogic: Send + Sync {
    /// Computes `a + b`, recording the sum and the active caller identity
    /// into the running context.
    fn compute_sum(&self, overlay: &mut ContextOverlay, a: i64, b: i64) -> Result<i64, CallError>;
}

/// Transient per-invocation execution context.
///
/// Invariant: `storage`, `caller`, and `slots` all belong to the same logical
/// context owner for the duration of one call. Contexts whose owner holds no
/// storage cell (a bare calculator) simply have no cell to commit into.
pub struct ExecutionContext<'a> {
    storage: Option<&'a StorageCell>,
    caller: Address,
    slots: &'a ResultSlots,
}

impl<'a> ExecutionContext<'a> {
    /// Builds a context over the given owner state.
    pub fn new(storage: Option<&'a StorageCell>, caller: Address, slots: &'a ResultSlots) -> Self {
        Self {
            storage,
            caller,
            slots,
        }
    }

    /// Runs `logic` under this context and commits its writes atomically.
    ///
    /// On error the staged overlay is dropped untouched: the owner's slots
    /// and cell keep their pre-call values.
    pub fn execute(
        &self,
        logic: &dyn ContractLogic,
        a: i64,
        b: i64,
    ) -> Result<i64, CallError> {
        let mut overlay = ContextOverlay::new(self.caller);
        let sum = logic.compute_sum(&mut overlay, a, b)?;
        self.commit(overlay);
        Ok(sum)
    }

    fn commit(&self, overlay: ContextOverlay) {
        self.slots.apply(overlay.result, overlay.recorded_caller);
        if let (Some(cell), Some(value)) = (self.storage, overlay.stored) {
            cell.write(value);
        }
    }
}
