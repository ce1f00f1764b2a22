//! The orchestrator dispatching both execution-delegation modes.

use crate::runtime::cell::StorageCell;
use crate::runtime::context::{ExecutionContext, ResultSlots};
use crate::runtime::error::CallError;
use crate::runtime::event::{EventLog, MachineEvent};
use crate::runtime::world::World;
use crate::types::address::Address;
use crate::warn;

/// A machine holding its own storage cell, result slots, and event log.
///
/// Every call dispatch is a single-step transition with two mutually
/// exclusive outcomes: own-context mode mutates the target calculator,
/// borrowed-context mode mutates the machine itself. Exactly one side
/// changes per successful call; a failed call changes neither.
pub struct Machine {
    address: Address,
    cell: StorageCell,
    slots: ResultSlots,
    events: EventLog<MachineEvent>,
}

impl Machine {
    /// Creates a machine at the given address over an existing storage cell.
    pub fn new(address: Address, cell: StorageCell) -> Self {
        Self {
            address,
            cell,
            slots: ResultSlots::new(),
            events: EventLog::new(),
        }
    }

    /// Returns the machine's deployed address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Writes `v` into the machine's owned storage cell. No failure modes.
    pub fn save_value(&self, v: i64) {
        self.cell.write(v);
    }

    /// Reads the machine's owned storage cell.
    pub fn get_value(&self) -> i64 {
        self.cell.read()
    }

    /// Returns the machine's own last computed result.
    ///
    /// Stays at `0` until a borrowed-context call succeeds; own-context
    /// calls never touch it.
    pub fn last_result(&self) -> i64 {
        self.slots.last_result()
    }

    /// Returns the caller identity recorded by the machine's own context,
    /// or the zero address.
    pub fn last_caller(&self) -> Address {
        self.slots.last_caller()
    }

    /// Returns all events emitted by this machine, in emission order.
    pub fn events(&self) -> Vec<MachineEvent> {
        self.events.snapshot()
    }

    /// Invokes the target calculator in its *own* context (external call).
    ///
    /// The callee runs against its own slots and sees this machine as its
    /// caller; the machine's mirrored fields stay untouched. `caller` is the
    /// original external caller, carried for traceability only — own-context
    /// execution replaces it with the machine's address.
    ///
    /// Returns the sum and a success flag, and emits
    /// [`MachineEvent::ComputedByOwnContext`] either way.
    pub fn add_values_with_external_call(
        &self,
        world: &World,
        caller: Address,
        target: Address,
        a: i64,
        b: i64,
    ) -> (i64, bool) {
        let outcome = self.external_call(world, target, a, b);
        let (sum, success) = settle("external call", caller, outcome);
        self.events
            .emit(MachineEvent::ComputedByOwnContext { a, b, success });
        (sum, success)
    }

    /// Invokes the target's logic under this machine's *borrowed* context
    /// (delegated call).
    ///
    /// The callee's code runs against the machine's own cell and slots, and
    /// the caller identity it observes is `caller`, the original external
    /// caller. The target's own fields stay untouched.
    ///
    /// Returns the sum and a success flag, and emits
    /// [`MachineEvent::ComputedByBorrowedContext`] either way.
    pub fn add_values_with_borrowed_context(
        &self,
        world: &World,
        caller: Address,
        target: Address,
        a: i64,
        b: i64,
    ) -> (i64, bool) {
        let outcome = self.borrowed_call(world, caller, target, a, b);
        let (sum, success) = settle("borrowed-context call", caller, outcome);
        self.events
            .emit(MachineEvent::ComputedByBorrowedContext { a, b, success });
        (sum, success)
    }

    fn external_call(
        &self,
        world: &World,
        target: Address,
        a: i64,
        b: i64,
    ) -> Result<i64, CallError> {
        let contract = world
            .contract(target)
            .ok_or(CallError::InvalidTarget(target))?;
        let calculator = contract
            .as_calculator()
            .ok_or(CallError::InvalidTarget(target))?;

        // Own context: the callee's slots, the machine as caller identity.
        let ctx = ExecutionContext::new(None, self.address, calculator.slots());
        ctx.execute(calculator.as_ref(), a, b)
    }

    fn borrowed_call(
        &self,
        world: &World,
        caller: Address,
        target: Address,
        a: i64,
        b: i64,
    ) -> Result<i64, CallError> {
        let contract = world
            .contract(target)
            .ok_or(CallError::InvalidTarget(target))?;
        let logic = contract
            .delegatable_logic()
            .ok_or(CallError::ContextConstructionFailure(target))?;

        // Borrowed context: the machine's own cell and slots, the original
        // external caller as identity. Only the code comes from the target.
        let ctx = ExecutionContext::new(Some(&self.cell), caller, &self.slots);
        ctx.execute(logic, a, b)
    }

}

/// Flattens a dispatch outcome into the sum-and-success pair the caller
/// always receives.
fn settle(mode: &str, caller: Address, outcome: Result<i64, CallError>) -> (i64, bool) {
    match outcome {
        Ok(sum) => (sum, true),
        Err(err) => {
            warn!("{} from {} failed: {}", mode, caller, err);
            (0, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::utils::{addr, deploy_machine, deploy_machine_with_calculator};

    #[test]
    fn save_value_then_get_value() {
        let (_world, machine) = deploy_machine(0);
        machine.save_value(54);
        assert_eq!(machine.get_value(), 54);
    }

    #[test]
    fn external_call_mutates_only_the_calculator() {
        let (world, machine, calculator) = deploy_machine_with_calculator(0);
        let owner = addr(1);

        let (sum, success) =
            machine.add_values_with_external_call(&world, owner, calculator.address(), 1, 2);

        assert_eq!((sum, success), (3, true));
        let event = machine.events().pop().unwrap();
        assert_eq!(
            event,
            MachineEvent::ComputedByOwnContext {
                a: 1,
                b: 2,
                success: true
            }
        );

        // Callee side changed
        assert_eq!(calculator.last_result(), 3);
        assert_eq!(calculator.last_caller(), machine.address());

        // Machine side untouched
        assert_eq!(machine.last_result(), 0);
        assert_eq!(machine.last_caller(), Address::zero());
        assert_eq!(machine.get_value(), 0);
    }

    #[test]
    fn borrowed_context_mutates_only_the_machine() {
        let (world, machine, calculator) = deploy_machine_with_calculator(0);
        let owner = addr(1);

        let (sum, success) =
            machine.add_values_with_borrowed_context(&world, owner, calculator.address(), 1, 2);

        assert_eq!((sum, success), (3, true));
        let event = machine.events().pop().unwrap();
        assert_eq!(
            event,
            MachineEvent::ComputedByBorrowedContext {
                a: 1,
                b: 2,
                success: true
            }
        );

        // Machine side changed, including its storage cell
        assert_eq!(machine.last_result(), 3);
        assert_eq!(machine.last_caller(), owner);
        assert_eq!(machine.get_value(), 3);

        // Callee side untouched
        assert_eq!(calculator.last_result(), 0);
        assert_eq!(calculator.last_caller(), Address::zero());
    }

    #[test]
    fn exactly_one_side_changes_per_call() {
        let (world, machine, calculator) = deploy_machine_with_calculator(0);
        let owner = addr(1);

        machine.add_values_with_external_call(&world, owner, calculator.address(), 2, 3);
        assert_eq!(calculator.last_result(), 5);
        assert_eq!(machine.last_result(), 0);

        machine.add_values_with_borrowed_context(&world, owner, calculator.address(), 10, 20);
        assert_eq!(machine.last_result(), 30);
        // The calculator still holds its own-context value, not 30
        assert_eq!(calculator.last_result(), 5);
    }

    #[test]
    fn repeated_calls_are_last_write_wins() {
        let (world, machine, calculator) = deploy_machine_with_calculator(0);
        let first = addr(1);
        let second = addr(2);

        machine.add_values_with_borrowed_context(&world, first, calculator.address(), 1, 1);
        machine.add_values_with_borrowed_context(&world, second, calculator.address(), 2, 2);

        assert_eq!(machine.last_result(), 4);
        assert_eq!(machine.last_caller(), second);
    }

    #[test]
    fn overflow_reports_failure_and_changes_nothing() {
        let (world, machine, calculator) = deploy_machine_with_calculator(7);
        let owner = addr(1);

        let (sum, success) = machine.add_values_with_borrowed_context(
            &world,
            owner,
            calculator.address(),
            i64::MAX,
            1,
        );

        assert_eq!((sum, success), (0, false));
        assert_eq!(machine.get_value(), 7);
        assert_eq!(machine.last_result(), 0);
        assert_eq!(machine.last_caller(), Address::zero());
        assert_eq!(calculator.last_result(), 0);

        // The failure is still observable
        let event = machine.events().pop().unwrap();
        assert_eq!(event.payload(), (i64::MAX, 1, false));
    }

    #[test]
    fn unknown_target_reports_failure_in_both_modes() {
        let (world, machine) = deploy_machine(0);
        let owner = addr(1);
        let nowhere = addr(0xEE);

        let (_, ok_external) =
            machine.add_values_with_external_call(&world, owner, nowhere, 1, 2);
        let (_, ok_borrowed) =
            machine.add_values_with_borrowed_context(&world, owner, nowhere, 1, 2);

        assert!(!ok_external);
        assert!(!ok_borrowed);
        assert_eq!(machine.last_result(), 0);
        assert_eq!(machine.get_value(), 0);
    }

    #[test]
    fn borrowing_a_non_delegatable_contract_fails_cleanly() {
        let (world, machine) = deploy_machine(0);
        let owner = addr(1);
        let token = world.deploy_token(owner);

        let (sum, success) =
            machine.add_values_with_borrowed_context(&world, owner, token.address(), 1, 2);

        assert_eq!((sum, success), (0, false));
        assert_eq!(machine.last_result(), 0);
        assert_eq!(machine.last_caller(), Address::zero());

        let event = machine.events().pop().unwrap();
        assert_eq!(event.payload(), (1, 2, false));
    }

    #[test]
    fn machine_cell_aliases_the_deployment_cell() {
        let cell = StorageCell::new(5);
        let world = World::new();
        let machine = world.deploy_machine(cell.clone());

        machine.save_value(11);
        assert_eq!(cell.read(), 11);

        cell.write(12);
        assert_eq!(machine.get_value(), 12);
    }

    #[test]
    fn events_accumulate_across_modes() {
        let (world, machine, calculator) = deploy_machine_with_calculator(0);
        let owner = addr(1);

        machine.add_values_with_external_call(&world, owner, calculator.address(), 1, 2);
        machine.add_values_with_borrowed_context(&world, owner, calculator.address(), 3, 4);

        let events = machine.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            MachineEvent::ComputedByOwnContext { .. }
        ));
        assert!(matches!(
            events[1],
            MachineEvent::ComputedByBorrowedContext { .. }
        ));
    }
}
