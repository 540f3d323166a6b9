//! Per-aggregate pending-event registry.

/// Append-only list of events recorded on an aggregate instance but not yet
/// delivered to the publishing collaborator.
///
/// Events are never removed except by the drain step: [`EventLog::take`]
/// empties the registry exactly once per successful commit, so a second drain
/// without new mutations yields nothing (no duplicate delivery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog<E> {
    pending: Vec<E>,
}

impl<E> EventLog<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Append an event. Registration order is delivery order.
    pub fn record(&mut self, event: E) {
        self.pending.push(event);
    }

    pub fn pending(&self) -> &[E] {
        &self.pending
    }

    /// Drain all pending events, leaving the registry empty.
    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

impl<E> Default for EventLog<E> {
    fn default() -> Self {
        Self::new()
    }
}
