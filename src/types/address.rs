//! 20-byte identities for accounts and deployed contracts.

use crate::types::hash::{Hash, HASH_LEN};
use callsim_derive::BinaryCodec;
use std::fmt;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Fixed-size 20-byte address identifying an external account or a deployed
/// contract.
///
/// Contract addresses are derived from a domain-separated SHA3-256 hash,
/// taking the last 20 bytes. The all-zero address is the sentinel for "no
/// caller recorded yet". This type is `Copy` for efficient threading through
/// call boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, BinaryCodec)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// Returns the all-zero sentinel address.
    pub fn zero() -> Address {
        Address([0u8; ADDRESS_LEN])
    }

    /// Returns true if this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Derives an address from a hash by taking its last 20 bytes.
    pub fn from_hash(hash: Hash) -> Address {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash.as_slice()[HASH_LEN - ADDRESS_LEN..]);
        Address(bytes)
    }

    /// Returns the address as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
