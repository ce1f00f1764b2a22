//! Observable events emitted by contracts.
//!
//! Each contract owns an [`EventLog`]; emitted events are appended in call
//! order and read back by tests and the demo driver. Events encode
//! deterministically via `BinaryCodec`, so they can be hashed with domain
//! separation like any other committed record.

use crate::types::encoding::Encode;
use crate::types::hash::Hash;
use callsim_derive::BinaryCodec;
use std::sync::Mutex;

/// Events emitted by a machine, one per dispatched call.
///
/// Field order is part of the observable surface: operands first, success
/// flag last. Failed dispatches still emit, with `success = false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BinaryCodec)]
pub enum MachineEvent {
    /// An own-context (external call) dispatch completed.
    ComputedByOwnContext { a: i64, b: i64, success: bool },
    /// A borrowed-context (delegated call) dispatch completed.
    ComputedByBorrowedContext { a: i64, b: i64, success: bool },
}

impl MachineEvent {
    /// Returns the operands and success flag, regardless of mode.
    pub fn payload(&self) -> (i64, i64, bool) {
        match *self {
            MachineEvent::ComputedByOwnContext { a, b, success }
            | MachineEvent::ComputedByBorrowedContext { a, b, success } => (a, b, success),
        }
    }

    /// Computes a domain-separated hash of this event.
    ///
    /// The `"EVENT"` prefix prevents collisions with other hash domains.
    pub fn hash(&self) -> Hash {
        let mut h = Hash::sha3();
        h.update(b"EVENT");
        self.encode(&mut h);
        h.finalize()
    }
}

/// Append-only log of emitted events.
///
/// Run-to-completion execution means emissions never interleave within one
/// call, but the log is still lock-protected so a threaded embedder keeps a
/// consistent order.
pub struct EventLog<E> {
    entries: Mutex<Vec<E>>,
}

impl<E: Clone> EventLog<E> {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Appends an event to the log.
    pub fn emit(&self, event: E) {
        self.entries.lock().unwrap().push(event);
    }

    /// Returns a copy of all emitted events in emission order.
    pub fn snapshot(&self) -> Vec<E> {
        self.entries.lock().unwrap().clone()
    }

    /// Returns the most recently emitted event, if any.
    pub fn last(&self) -> Option<E> {
        self.entries.lock().unwrap().last().cloned()
    }

    /// Returns the number of emitted events.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns true if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Clone> Default for EventLog<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::encoding::Decode;

    #[test]
    fn log_preserves_emission_order() {
        let log = EventLog::new();
        log.emit(MachineEvent::ComputedByOwnContext {
            a: 1,
            b: 2,
            success: true,
        });
        log.emit(MachineEvent::ComputedByBorrowedContext {
            a: 3,
            b: 4,
            success: false,
        });

        let events = log.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].payload(), (1, 2, true));
        assert_eq!(events[1].payload(), (3, 4, false));
        assert_eq!(log.last(), Some(events[1]));
    }

    #[test]
    fn empty_log_has_no_last_event() {
        let log: EventLog<MachineEvent> = EventLog::new();
        assert!(log.is_empty());
        assert_eq!(log.last(), None);
    }

    #[test]
    fn event_encode_decode_roundtrip() {
        let event = MachineEvent::ComputedByBorrowedContext {
            a: -7,
            b: 12,
            success: true,
        };
        let bytes = event.to_bytes();
        let decoded = MachineEvent::from_bytes(&bytes).expect("decode failed");
        assert_eq!(event, decoded);
    }

    #[test]
    fn event_hash_distinguishes_modes() {
        let own = MachineEvent::ComputedByOwnContext {
            a: 1,
            b: 2,
            success: true,
        };
        let borrowed = MachineEvent::ComputedByBorrowedContext {
            a: 1,
            b: 2,
            success: true,
        };
        // Same payload, different discriminant
        assert_ne!(own.hash(), borrowed.hash());
    }

    #[test]
    fn event_hash_domain_separated() {
        let event = MachineEvent::ComputedByOwnContext {
            a: 1,
            b: 2,
            success: true,
        };

        let mut h = Hash::sha3();
        event.encode(&mut h);
        let raw_hash = h.finalize();

        assert_ne!(event.hash(), raw_hash);
    }
}
