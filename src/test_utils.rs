//! Shared deployment fixtures for tests.

#[cfg(test)]
pub mod utils {
    use crate::ledger::token::FunToken;
    use crate::runtime::calculator::Calculator;
    use crate::runtime::cell::StorageCell;
    use crate::runtime::machine::Machine;
    use crate::runtime::world::World;
    use crate::types::address::Address;
    use std::sync::Arc;

    /// Builds a recognizable external-account address from a single byte.
    pub fn addr(tag: u8) -> Address {
        Address([tag; 20])
    }

    /// Deploys a machine over a fresh storage cell holding `initial`.
    pub fn deploy_machine(initial: i64) -> (World, Arc<Machine>) {
        let world = World::new();
        let machine = world.deploy_machine(StorageCell::new(initial));
        (world, machine)
    }

    /// Deploys a machine and a calculator into the same world.
    pub fn deploy_machine_with_calculator(
        initial: i64,
    ) -> (World, Arc<Machine>, Arc<Calculator>) {
        let world = World::new();
        let calculator = world.deploy_calculator();
        let machine = world.deploy_machine(StorageCell::new(initial));
        (world, machine, calculator)
    }

    /// Deploys a token, minting the supply to a fixed owner account.
    pub fn deploy_token() -> (World, Arc<FunToken>, Address) {
        let world = World::new();
        let owner = addr(1);
        let token = world.deploy_token(owner);
        (world, token, owner)
    }
}
