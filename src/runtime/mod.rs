//! Delegated-execution core: two call modes over shared storage.
//!
//! A [`machine::Machine`] can run a [`calculator::Calculator`]'s logic in two
//! ways that differ only in which execution context the logic observes:
//!
//! - **Own-context (external call)**: the logic runs against the target
//!   calculator's own state, and the caller identity it sees is the machine.
//! - **Borrowed-context (delegated call)**: the machine borrows the target's
//!   code but runs it against its own storage cell and result slots, and the
//!   caller identity it sees is the original external caller.
//!
//! The context is an explicit [`context::ExecutionContext`] value instead of
//! implicit VM-level switching: `{storage, caller, slots}` always belong to
//! the same context owner for the duration of one call. Writes are staged in
//! a [`context::ContextOverlay`] and committed only on success, so a failing
//! call never leaves half-applied state.
//!
//! # Modules
//!
//! - [`calculator`]: the shared unit of logic (checked addition)
//! - [`cell`]: aliasable single-slot storage
//! - [`context`]: execution contexts, overlays, and the logic trait
//! - [`error`]: call failure kinds
//! - [`event`]: event log and machine events
//! - [`machine`]: the orchestrator dispatching both call modes
//! - [`world`]: contract registry and address assignment

pub mod calculator;
pub mod cell;
pub mod context;
pub mod error;
pub mod event;
pub mod machine;
pub mod world;
