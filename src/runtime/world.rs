//! Contract registry and address assignment.

use crate::info;
use crate::ledger::token::FunToken;
use crate::runtime::calculator::Calculator;
use crate::runtime::cell::StorageCell;
use crate::runtime::context::ContractLogic;
use crate::runtime::machine::Machine;
use crate::types::address::Address;
use crate::types::hash::Hash;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A deployed contract, as seen by target resolution.
#[derive(Clone)]
pub enum Contract {
    Calculator(Arc<Calculator>),
    Machine(Arc<Machine>),
    Token(Arc<FunToken>),
}

impl Contract {
    /// Returns the contract's deployed address.
    pub fn address(&self) -> Address {
        match self {
            Contract::Calculator(calculator) => calculator.address(),
            Contract::Machine(machine) => machine.address(),
            Contract::Token(token) => token.address(),
        }
    }

    /// Returns the contract as a calculator, if it is one.
    pub fn as_calculator(&self) -> Option<&Arc<Calculator>> {
        match self {
            Contract::Calculator(calculator) => Some(calculator),
            _ => None,
        }
    }

    /// Returns the contract's logic if it can run under a borrowed context.
    ///
    /// Only calculators expose delegatable logic; borrowing any other
    /// contract's code fails context construction.
    pub fn delegatable_logic(&self) -> Option<&dyn ContractLogic> {
        match self {
            Contract::Calculator(calculator) => Some(calculator.as_ref()),
            _ => None,
        }
    }
}

/// Registry of deployed contracts keyed by address.
///
/// Deployment assigns fresh addresses from a domain-separated hash over a
/// monotonic nonce, so no two contracts ever collide. The world never clones
/// contract state: resolution hands back shared references, preserving the
/// aliasing the borrowed-context mode depends on.
pub struct World {
    contracts: DashMap<Address, Contract>,
    deploy_nonce: AtomicU64,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        Self {
            contracts: DashMap::new(),
            deploy_nonce: AtomicU64::new(0),
        }
    }

    /// Derives the next fresh contract address.
    fn next_address(&self) -> Address {
        let nonce = self.deploy_nonce.fetch_add(1, Ordering::Relaxed);
        let mut h = Hash::sha3();
        h.update(b"CONTRACT");
        h.update(&nonce.to_le_bytes());
        Address::from_hash(h.finalize())
    }

    /// Deploys a calculator and returns a shared handle to it.
    pub fn deploy_calculator(&self) -> Arc<Calculator> {
        let calculator = Arc::new(Calculator::new(self.next_address()));
        self.contracts.insert(
            calculator.address(),
            Contract::Calculator(Arc::clone(&calculator)),
        );
        info!("deployed calculator at {}", calculator.address());
        calculator
    }

    /// Deploys a machine over the given storage cell.
    ///
    /// The cell is shared by handle: the caller keeps an aliasing reference
    /// to the slot the machine will mutate.
    pub fn deploy_machine(&self, cell: StorageCell) -> Arc<Machine> {
        let machine = Arc::new(Machine::new(self.next_address(), cell));
        self.contracts
            .insert(machine.address(), Contract::Machine(Arc::clone(&machine)));
        info!("deployed machine at {}", machine.address());
        machine
    }

    /// Deploys a fungible token, minting the full supply to `deployer`.
    pub fn deploy_token(&self, deployer: Address) -> Arc<FunToken> {
        let token = Arc::new(FunToken::new(self.next_address(), deployer));
        self.contracts
            .insert(token.address(), Contract::Token(Arc::clone(&token)));
        info!("deployed token at {}", token.address());
        token
    }

    /// Resolves a deployed contract by address.
    pub fn contract(&self, address: Address) -> Option<Contract> {
        self.contracts.get(&address).map(|entry| entry.clone())
    }

    /// Returns the number of deployed contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns true if nothing has been deployed.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
