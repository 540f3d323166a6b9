//! Validate-then-commit mutation pipeline.
//!
//! A [`Change`] stages checks, field writes, collection operations and event
//! registrations against one aggregate instance, then applies them as a
//! single unit: either every staged write runs and every staged event is
//! recorded, or the aggregate is left bit-for-bit untouched and the collected
//! errors come back as a failure outcome.
//!
//! Writes are staged as closures and only executed once all checks have
//! passed, so a failed pipeline never has anything to roll back. Checks are
//! evaluated eagerly against the *pre-change* state; a reader of the
//! aggregate can never observe a half-applied change.
//!
//! The builder consumes itself on every step and [`Change::apply`] takes it
//! by value, so reusing a finished pipeline is a compile error rather than a
//! runtime fault.

use crate::aggregate::AggregateRoot;
use crate::error::Error;
use crate::outcome::Outcome;

type StagedWrite<'a, A> = Box<dyn FnOnce(&mut A) + 'a>;
type StagedEvent<'a, A> = Box<dyn FnOnce(&A) -> <A as AggregateRoot>::Event + 'a>;

/// Single-use mutation pipeline bound to one aggregate instance.
pub struct Change<'a, A: AggregateRoot> {
    target: &'a mut A,
    /// Cleared by a false `when` gate; an inactive pipeline applies as a
    /// successful no-op.
    active: bool,
    /// First failing check. Later checks are skipped entirely.
    failed: Vec<Error>,
    staged: Vec<StagedWrite<'a, A>>,
    events: Vec<StagedEvent<'a, A>>,
}

impl<'a, A: AggregateRoot> Change<'a, A> {
    pub fn new(target: &'a mut A) -> Self {
        Self {
            target,
            active: true,
            failed: Vec::new(),
            staged: Vec::new(),
            events: Vec::new(),
        }
    }

    fn live(&self) -> bool {
        self.active && self.failed.is_empty()
    }

    /// Gate the entire remaining pipeline: when the predicate is false every
    /// later step is skipped and `apply` returns success with the aggregate
    /// unchanged (e.g. "change status to `None`" is a no-op, not an error).
    #[must_use]
    pub fn when(mut self, predicate: impl FnOnce(&A) -> bool) -> Self {
        if self.live() && !predicate(&*self.target) {
            self.active = false;
        }
        self
    }

    /// Check an invariant against the pre-change state. The first failure
    /// marks the pipeline failed; later predicates are not evaluated and no
    /// staged write will run.
    #[must_use]
    pub fn ensure(mut self, predicate: impl FnOnce(&A) -> bool, error: Error) -> Self {
        if self.live() && !predicate(&*self.target) {
            self.failed.push(error);
        }
        self
    }

    /// Stage a field write. Multiple `set` calls form one atomic unit and
    /// run in declaration order on success.
    #[must_use]
    pub fn set(mut self, mutate: impl FnOnce(&mut A) + 'a) -> Self {
        if self.live() {
            self.staged.push(Box::new(mutate));
        }
        self
    }

    /// Stage an append to an owned child collection.
    #[must_use]
    pub fn add<T: 'a>(self, select: impl Fn(&mut A) -> &mut Vec<T> + 'a, item: T) -> Self {
        self.set(move |aggregate| select(aggregate).push(item))
    }

    /// Stage a removal from an owned child collection, failing the pipeline
    /// with `error` when no element matches `id` in the pre-change state.
    #[must_use]
    pub fn remove_by_id<T, K, S, F>(mut self, select: S, key: F, id: K, error: Error) -> Self
    where
        T: 'a,
        K: PartialEq + 'a,
        S: Fn(&mut A) -> &mut Vec<T> + 'a,
        F: Fn(&T) -> K + 'a,
    {
        if !self.live() {
            return self;
        }
        let exists = select(&mut *self.target).iter().any(|item| key(item) == id);
        if !exists {
            self.failed.push(error);
            return self;
        }
        self.staged.push(Box::new(move |aggregate| {
            select(aggregate).retain(|item| key(item) != id);
        }));
        self
    }

    /// Stage a domain event. The factory runs *after* the staged writes, so
    /// it snapshots post-change state; the event reaches the aggregate's
    /// registry only when the whole pipeline succeeds.
    #[must_use]
    pub fn record_with(mut self, factory: impl FnOnce(&A) -> A::Event + 'a) -> Self {
        if self.live() {
            self.events.push(Box::new(factory));
        }
        self
    }

    /// Terminal step: run all staged writes and record all staged events, or
    /// do neither and return the collected errors.
    pub fn apply(self) -> Outcome<()> {
        let Change {
            target,
            active,
            failed,
            staged,
            events,
        } = self;

        if !active {
            return Outcome::done();
        }
        if !failed.is_empty() {
            return Outcome::failure_all(failed);
        }

        let changed = !staged.is_empty() || !events.is_empty();
        for write in staged {
            write(&mut *target);
        }
        if changed {
            target.bump_version();
        }
        for factory in events {
            let event = factory(&*target);
            target.record(event);
        }
        Outcome::done()
    }
}

/// Entry point: `aggregate.change()` begins a new single-use pipeline.
pub trait Mutate: AggregateRoot + Sized {
    fn change(&mut self) -> Change<'_, Self> {
        Change::new(self)
    }
}

impl<A: AggregateRoot> Mutate for A {}
