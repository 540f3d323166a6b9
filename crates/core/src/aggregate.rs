//! Aggregate root trait for validate-then-commit domain models.

use crate::error::Error;
use crate::outcome::Outcome;

/// Aggregate root: a consistency boundary whose invariants are enforced by
/// its own factory and mutator methods.
///
/// Conventions:
/// - no public constructor; a static `create(...) -> Outcome<Self>` validates
///   sub-parts and aggregate invariants before any instance exists,
/// - every mutator goes through a [`Change`](crate::change::Change) pipeline
///   and returns an [`Outcome`],
/// - state changes record domain events in the per-instance registry, drained
///   by the publishing collaborator via [`AggregateRoot::take_events`].
///
/// An aggregate instance is single-threaded by design: one unit-of-work scope
/// owns it and must not hand it to concurrent operations.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Domain event type recorded by this aggregate.
    type Event: Clone + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per successfully applied change; the persistence
    /// collaborator uses it for optimistic concurrency.
    fn version(&self) -> u64;

    /// Advance the version by one. Called by a successful change pipeline,
    /// never by callers directly.
    fn bump_version(&mut self);

    /// Append an event to the pending registry.
    fn record(&mut self, event: Self::Event);

    /// Events recorded but not yet delivered.
    fn pending_events(&self) -> &[Self::Event];

    /// Drain the pending registry exactly once (publishing contract).
    fn take_events(&mut self) -> Vec<Self::Event>;
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (idempotent commands, migrations, ...).
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    /// Surface a mismatch as a `Conflict` error so persistence failures
    /// compose transparently with railway chains.
    pub fn check(self, actual: u64) -> Outcome<()> {
        if self.matches(actual) {
            Outcome::done()
        } else {
            Outcome::failure(Error::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn any_matches_every_version() {
        assert!(ExpectedVersion::Any.matches(0));
        assert!(ExpectedVersion::Any.matches(42));
        assert!(ExpectedVersion::Any.check(7).is_success());
    }

    #[test]
    fn exact_mismatch_is_a_conflict() {
        assert!(ExpectedVersion::Exact(3).check(3).is_success());

        let out = ExpectedVersion::Exact(3).check(4);
        assert_eq!(out.errors()[0].kind(), ErrorKind::Conflict);
        assert!(out.errors()[0].message().contains("expected"));
    }
}
