//! Core type definitions shared across the simulator.
//!
//! - `Address`: 20-byte account and contract identities
//! - `Hash`: fixed-size 32-byte SHA3-256 hashes
//! - `encoding`: deterministic binary serialization traits backing the
//!   `BinaryCodec` derive

pub mod address;
pub mod encoding;
pub mod hash;
