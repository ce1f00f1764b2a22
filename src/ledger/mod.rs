//! Fungible-token ledger collaborator.
//!
//! Independent of the delegated-execution core: the two share only the
//! address/event plumbing and a deployment registry. Balance bookkeeping is
//! plain CRUD over concurrent maps.

pub mod token;
