//! Fixed-supply fungible token with an allowance ledger.

use crate::runtime::event::EventLog;
use crate::types::address::Address;
use crate::types::encoding::Encode;
use crate::types::hash::Hash;
use callsim_derive::{BinaryCodec, Error};
use dashmap::DashMap;

/// Token decimal places.
pub const DECIMALS: u8 = 18;

/// Fixed total supply: one million whole tokens at 18 decimals.
pub const TOTAL_SUPPLY: u128 = 1_000_000_000_000_000_000_000_000;

/// Ledger failures, the Rust rendering of an ERC20 `false`/revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Sender balance is smaller than the transfer amount.
    #[error("insufficient balance: have {balance}, need {amount}")]
    InsufficientBalance { balance: u128, amount: u128 },
    /// Spender allowance is smaller than the requested amount.
    #[error("insufficient allowance: have {allowance}, need {amount}")]
    InsufficientAllowance { allowance: u128, amount: u128 },
    /// Allowance increase would overflow the 128-bit amount width.
    #[error("allowance overflow")]
    AllowanceOverflow,
}

/// Observability events emitted by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BinaryCodec)]
pub enum TokenEvent {
    /// `amount` tokens moved from `from` to `to`. Minting uses the zero
    /// address as `from`.
    Transfer {
        from: Address,
        to: Address,
        amount: u128,
    },
    /// `owner` set `spender`'s allowance to `amount`.
    Approval {
        owner: Address,
        spender: Address,
        amount: u128,
    },
}

impl TokenEvent {
    /// Computes a domain-separated hash of this event.
    pub fn hash(&self) -> Hash {
        let mut h = Hash::sha3();
        h.update(b"EVENT");
        self.encode(&mut h);
        h.finalize()
    }
}

/// Fixed-supply fungible token.
///
/// The whole supply is minted to the deployer at construction; no further
/// minting or burning exists. Every operation takes the caller's identity as
/// an explicit parameter.
pub struct FunToken {
    address: Address,
    name: String,
    symbol: String,
    balances: DashMap<Address, u128>,
    allowances: DashMap<(Address, Address), u128>,
    events: EventLog<TokenEvent>,
}

impl FunToken {
    /// Creates the token at `address` and mints the full supply to
    /// `deployer`.
    pub fn new(address: Address, deployer: Address) -> Self {
        let token = Self {
            address,
            name: "FunToken".to_string(),
            symbol: "FUN".to_string(),
            balances: DashMap::new(),
            allowances: DashMap::new(),
            events: EventLog::new(),
        };
        token.balances.insert(deployer, TOTAL_SUPPLY);
        token.events.emit(TokenEvent::Transfer {
            from: Address::zero(),
            to: deployer,
            amount: TOTAL_SUPPLY,
        });
        token
    }

    /// Returns the token's deployed address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the decimal places.
    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// Returns the fixed total supply.
    pub fn total_supply(&self) -> u128 {
        TOTAL_SUPPLY
    }

    /// Returns the balance of `account`, zero if it never held tokens.
    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).map(|b| *b).unwrap_or(0)
    }

    /// Returns the remaining allowance `owner` granted to `spender`.
    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances
            .get(&(owner, spender))
            .map(|a| *a)
            .unwrap_or(0)
    }

    /// Returns all emitted ledger events, in emission order.
    pub fn events(&self) -> Vec<TokenEvent> {
        self.events.snapshot()
    }

    /// Moves `amount` tokens from the caller to `to`.
    pub fn transfer(&self, caller: Address, to: Address, amount: u128) -> Result<(), TokenError> {
        self.move_balance(caller, to, amount)
    }

    /// Sets `spender`'s allowance over the caller's tokens to `amount`.
    pub fn approve(
        &self,
        caller: Address,
        spender: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.allowances.insert((caller, spender), amount);
        self.events.emit(TokenEvent::Approval {
            owner: caller,
            spender,
            amount,
        });
        Ok(())
    }

    /// Moves `amount` tokens from `from` to `to`, spending the caller's
    /// allowance.
    ///
    /// The allowance is committed only after the balance move succeeds, so a
    /// failed transfer leaves both the allowance and the balances untouched.
    pub fn transfer_from(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(from, caller);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance { allowance, amount });
        }

        self.move_balance(from, to, amount)?;
        *self.allowances.entry((from, caller)).or_insert(0) -= amount;
        Ok(())
    }

    /// Raises `spender`'s allowance by `delta`.
    pub fn increase_allowance(
        &self,
        caller: Address,
        spender: Address,
        delta: u128,
    ) -> Result<(), TokenError> {
        let updated = {
            let mut allowance = self.allowances.entry((caller, spender)).or_insert(0);
            *allowance = allowance
                .checked_add(delta)
                .ok_or(TokenError::AllowanceOverflow)?;
            *allowance
        };
        self.events.emit(TokenEvent::Approval {
            owner: caller,
            spender,
            amount: updated,
        });
        Ok(())
    }

    /// Lowers `spender`'s allowance by `delta`; fails below zero.
    pub fn decrease_allowance(
        &self,
        caller: Address,
        spender: Address,
        delta: u128,
    ) -> Result<(), TokenError> {
        let updated = {
            let mut allowance = self.allowances.entry((caller, spender)).or_insert(0);
            if *allowance < delta {
                return Err(TokenError::InsufficientAllowance {
                    allowance: *allowance,
                    amount: delta,
                });
            }
            *allowance -= delta;
            *allowance
        };
        self.events.emit(TokenEvent::Approval {
            owner: caller,
            spender,
            amount: updated,
        });
        Ok(())
    }

    /// Debits `from`, credits `to`, and emits the transfer event.
    ///
    /// The debit guard is released before the credit so both entries may live
    /// in the same map shard.
    fn move_balance(&self, from: Address, to: Address, amount: u128) -> Result<(), TokenError> {
        {
            let mut balance = self.balances.entry(from).or_insert(0);
            if *balance < amount {
                return Err(TokenError::InsufficientBalance {
                    balance: *balance,
                    amount,
                });
            }
            *balance -= amount;
        }
        *self.balances.entry(to).or_insert(0) += amount;

        self.events.emit(TokenEvent::Transfer { from, to, amount });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::utils::{addr, deploy_token};

    #[test]
    fn deploys_with_name_symbol_and_decimals() {
        let (_world, token, _owner) = deploy_token();
        assert_eq!(token.name(), "FunToken");
        assert_eq!(token.symbol(), "FUN");
        assert_eq!(token.decimals(), 18);
    }

    #[test]
    fn mints_full_supply_to_deployer() {
        let (_world, token, owner) = deploy_token();
        assert_eq!(token.total_supply(), TOTAL_SUPPLY);
        assert_eq!(token.balance_of(owner), TOTAL_SUPPLY);

        let mint = token.events()[0];
        assert_eq!(
            mint,
            TokenEvent::Transfer {
                from: Address::zero(),
                to: owner,
                amount: TOTAL_SUPPLY,
            }
        );
    }

    #[test]
    fn transfer_moves_the_right_amount() {
        let (_world, token, owner) = deploy_token();
        let recipient = addr(2);

        token.transfer(owner, recipient, 1000).unwrap();

        assert_eq!(token.balance_of(owner), TOTAL_SUPPLY - 1000);
        assert_eq!(token.balance_of(recipient), 1000);
    }

    #[test]
    fn transfer_emits_event_with_right_arguments() {
        let (_world, token, owner) = deploy_token();
        let recipient = addr(2);

        token.transfer(owner, recipient, 1000).unwrap();

        let event = token.events().pop().unwrap();
        assert_eq!(
            event,
            TokenEvent::Transfer {
                from: owner,
                to: recipient,
                amount: 1000,
            }
        );
    }

    #[test]
    fn cannot_transfer_more_than_balance() {
        let (_world, token, owner) = deploy_token();
        let recipient = addr(2);

        let err = token
            .transfer(recipient, owner, 1)
            .unwrap_err();

        assert_eq!(
            err,
            TokenError::InsufficientBalance {
                balance: 0,
                amount: 1
            }
        );
        assert_eq!(token.balance_of(owner), TOTAL_SUPPLY);
    }

    #[test]
    fn approve_sets_allowance_and_emits() {
        let (_world, token, owner) = deploy_token();
        let spender = addr(2);

        token.approve(owner, spender, 500).unwrap();

        assert_eq!(token.allowance(owner, spender), 500);
        let event = token.events().pop().unwrap();
        assert_eq!(
            event,
            TokenEvent::Approval {
                owner,
                spender,
                amount: 500,
            }
        );
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let (_world, token, owner) = deploy_token();
        let spender = addr(2);
        let recipient = addr(3);

        token.approve(owner, spender, 500).unwrap();
        token.transfer_from(spender, owner, recipient, 300).unwrap();

        assert_eq!(token.balance_of(recipient), 300);
        assert_eq!(token.allowance(owner, spender), 200);

        let event = token.events().pop().unwrap();
        assert_eq!(
            event,
            TokenEvent::Transfer {
                from: owner,
                to: recipient,
                amount: 300,
            }
        );
    }

    #[test]
    fn transfer_from_with_insufficient_balance_keeps_allowance() {
        let (_world, token, _owner) = deploy_token();
        let poor = addr(4);
        let spender = addr(2);
        let recipient = addr(3);

        token.approve(poor, spender, 500).unwrap();
        let err = token
            .transfer_from(spender, poor, recipient, 300)
            .unwrap_err();

        assert_eq!(
            err,
            TokenError::InsufficientBalance {
                balance: 0,
                amount: 300
            }
        );
        // Nothing half-applied: allowance and balances keep pre-call values
        assert_eq!(token.allowance(poor, spender), 500);
        assert_eq!(token.balance_of(recipient), 0);
    }

    #[test]
    fn transfer_from_beyond_allowance_fails() {
        let (_world, token, owner) = deploy_token();
        let spender = addr(2);
        let recipient = addr(3);

        token.approve(owner, spender, 100).unwrap();
        let err = token
            .transfer_from(spender, owner, recipient, 101)
            .unwrap_err();

        assert_eq!(
            err,
            TokenError::InsufficientAllowance {
                allowance: 100,
                amount: 101
            }
        );
        assert_eq!(token.balance_of(recipient), 0);
        assert_eq!(token.allowance(owner, spender), 100);
    }

    #[test]
    fn increase_and_decrease_allowance() {
        let (_world, token, owner) = deploy_token();
        let spender = addr(2);

        token.increase_allowance(owner, spender, 50).unwrap();
        token.increase_allowance(owner, spender, 25).unwrap();
        assert_eq!(token.allowance(owner, spender), 75);

        token.decrease_allowance(owner, spender, 30).unwrap();
        assert_eq!(token.allowance(owner, spender), 45);
    }

    #[test]
    fn decrease_allowance_below_zero_fails() {
        let (_world, token, owner) = deploy_token();
        let spender = addr(2);

        token.increase_allowance(owner, spender, 10).unwrap();
        let err = token.decrease_allowance(owner, spender, 11).unwrap_err();

        assert_eq!(
            err,
            TokenError::InsufficientAllowance {
                allowance: 10,
                amount: 11
            }
        );
        assert_eq!(token.allowance(owner, spender), 10);
    }

    #[test]
    fn increase_allowance_overflow_fails() {
        let (_world, token, owner) = deploy_token();
        let spender = addr(2);

        token.increase_allowance(owner, spender, u128::MAX).unwrap();
        let err = token.increase_allowance(owner, spender, 1).unwrap_err();
        assert_eq!(err, TokenError::AllowanceOverflow);
    }

    #[test]
    fn self_transfer_preserves_balance() {
        let (_world, token, owner) = deploy_token();
        token.transfer(owner, owner, 1000).unwrap();
        assert_eq!(token.balance_of(owner), TOTAL_SUPPLY);
    }
}
