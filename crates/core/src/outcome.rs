//! Railway-oriented success/failure type.
//!
//! [`Outcome`] is the return type of every factory and mutator in the domain
//! layer. A failure carries one or more [`Error`]s in insertion order; a
//! success carries the value. Combinators short-circuit on the first failure
//! and never downgrade a failure back to success.

use std::future::Future;

use crate::error::Error;

/// Either a value or one-or-more errors.
///
/// Invariants:
/// - a failure carries at least one error (constructing one with zero errors
///   is a programmer error and panics),
/// - combinators produce a *new* outcome, never mutate in place,
/// - errors flow through chains unmodified, in insertion order, without
///   deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(Vec<Error>),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    pub fn failure(error: Error) -> Self {
        Self::Failure(vec![error])
    }

    /// Build a failure from an already-collected error list.
    ///
    /// Panics when `errors` is empty: a failure without errors violates the
    /// type's core invariant and is a fatal programmer error, not a
    /// recoverable condition.
    pub fn failure_all(errors: Vec<Error>) -> Self {
        assert!(
            !errors.is_empty(),
            "a failure outcome must carry at least one error"
        );
        Self::Failure(errors)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Errors carried by a failure; empty for a success.
    pub fn errors(&self) -> &[Error] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(errors) => errors,
        }
    }

    /// Unwrap the success value.
    ///
    /// Panics on a failure: reading the value of a failed outcome is a
    /// programmer error and must fail loudly rather than return a default.
    pub fn into_value(self) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(errors) => {
                panic!("called `into_value` on a failure outcome: {errors:?}")
            }
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Interop seam for `?`-style call sites outside the railway.
    pub fn into_result(self) -> Result<T, Vec<Error>> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(errors) => Err(errors),
        }
    }

    /// Append `error` and flip to failure when `predicate` is false.
    ///
    /// Short-circuits: on an already-failed outcome the predicate is not
    /// evaluated and the original errors pass through untouched. A false
    /// predicate is expressed through the return value, never by panicking.
    pub fn ensure(self, predicate: impl FnOnce(&T) -> bool, error: Error) -> Self {
        match self {
            Self::Success(value) => {
                if predicate(&value) {
                    Self::Success(value)
                } else {
                    Self::Failure(vec![error])
                }
            }
            failed => failed,
        }
    }

    /// Fail with `error` when the predicate is *true*.
    ///
    /// The inverse of [`Outcome::ensure`], used for business-rule checks
    /// phrased as "this must not be the case" (e.g. uniqueness).
    pub fn unless(self, predicate: impl FnOnce(&T) -> bool, error: Error) -> Self {
        match self {
            Self::Success(value) => {
                if predicate(&value) {
                    Self::Failure(vec![error])
                } else {
                    Self::Success(value)
                }
            }
            failed => failed,
        }
    }

    /// Monadic bind: invoke `f` on success, pass errors through otherwise.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(errors) => Outcome::Failure(errors),
        }
    }

    /// Transform the success value; never fails on its own.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(errors) => Outcome::Failure(errors),
        }
    }

    /// Run a side effect on success; the outcome passes through unchanged.
    pub fn tap(self, f: impl FnOnce(&T)) -> Self {
        if let Self::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Async bind. The continuation future is never constructed when the
    /// outcome is already failed. Cancellation is cooperative: dropping the
    /// returned future abandons the chain before any mutation took place.
    pub async fn and_then_async<U, F, Fut>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U>>,
    {
        match self {
            Self::Success(value) => f(value).await,
            Self::Failure(errors) => Outcome::Failure(errors),
        }
    }

    /// Async variant of [`Outcome::map`].
    pub async fn map_async<U, F, Fut>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        match self {
            Self::Success(value) => Outcome::Success(f(value).await),
            Self::Failure(errors) => Outcome::Failure(errors),
        }
    }

    /// Async variant of [`Outcome::tap`].
    pub async fn tap_async<F, Fut>(self, f: F) -> Self
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Self::Success(value) = &self {
            f(value).await;
        }
        self
    }

    /// Async variant of [`Outcome::unless`], for predicates that query a
    /// collaborator (e.g. a uniqueness check against a store).
    pub async fn unless_async<F, Fut>(self, predicate: F, error: Error) -> Self
    where
        F: FnOnce(&T) -> Fut,
        Fut: Future<Output = bool>,
    {
        match self {
            Self::Success(value) => {
                let violated = predicate(&value).await;
                if violated {
                    Self::Failure(vec![error])
                } else {
                    Self::Success(value)
                }
            }
            failed => failed,
        }
    }
}

impl Outcome<()> {
    /// A valueless success, the usual return of aggregate mutators.
    pub fn done() -> Self {
        Self::Success(())
    }
}

impl<T> From<Result<T, Error>> for Outcome<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(vec![error]),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::ErrorKind;

    fn boom() -> Error {
        Error::validation("boom")
    }

    #[test]
    fn bind_on_success_equals_applying_the_function() {
        let f = |x: i32| Outcome::success(x * 2);
        assert_eq!(Outcome::success(21).and_then(f), f(21));
    }

    #[test]
    fn bind_on_failure_passes_errors_through_and_never_invokes_f() {
        let called = Cell::new(false);
        let out: Outcome<i32> = Outcome::failure(boom()).and_then(|x: i32| {
            called.set(true);
            Outcome::success(x + 1)
        });
        assert!(!called.get());
        assert_eq!(out, Outcome::failure(boom()));
    }

    #[test]
    fn map_identity_is_identity() {
        let out = Outcome::success(7);
        assert_eq!(out.clone().map(|x| x), out);
    }

    #[test]
    fn ensure_flips_to_failure_on_false_predicate() {
        let out = Outcome::success(5).ensure(|n| *n > 10, boom());
        assert!(out.is_failure());
        assert_eq!(out.errors()[0].kind(), ErrorKind::Validation);
    }

    #[test]
    fn ensure_short_circuits_after_first_failure() {
        let second_evaluated = Cell::new(false);
        let out = Outcome::success(5)
            .ensure(|_| false, Error::validation("first"))
            .ensure(
                |_| {
                    second_evaluated.set(true);
                    true
                },
                Error::validation("second"),
            );
        assert!(!second_evaluated.get());
        assert_eq!(out.errors().len(), 1);
        assert_eq!(out.errors()[0].message(), "first");
    }

    #[test]
    fn unless_fails_when_the_predicate_holds() {
        let out = Outcome::success("x").unless(|_| true, Error::conflict("taken"));
        assert_eq!(out.errors()[0].kind(), ErrorKind::Conflict);

        let out = Outcome::success("x").unless(|_| false, Error::conflict("taken"));
        assert!(out.is_success());
    }

    #[test]
    fn tap_runs_on_success_only_and_returns_the_original() {
        let seen = Cell::new(0);
        let out = Outcome::success(3).tap(|n| seen.set(*n));
        assert_eq!(seen.get(), 3);
        assert_eq!(out, Outcome::success(3));

        let out: Outcome<i32> = Outcome::failure(boom()).tap(|n| seen.set(*n * 100));
        assert_eq!(seen.get(), 3);
        assert!(out.is_failure());
    }

    #[test]
    fn errors_keep_insertion_order_without_deduplication() {
        let out: Outcome<()> =
            Outcome::failure_all(vec![boom(), Error::not_found("gone"), boom()]);
        let messages: Vec<&str> = out.errors().iter().map(Error::message).collect();
        assert_eq!(messages, vec!["boom", "gone", "boom"]);
    }

    #[test]
    #[should_panic(expected = "at least one error")]
    fn failure_without_errors_is_a_programmer_error() {
        let _ = Outcome::<()>::failure_all(Vec::new());
    }

    #[test]
    #[should_panic(expected = "failure outcome")]
    fn into_value_on_failure_fails_loudly() {
        let _ = Outcome::<i32>::failure(boom()).into_value();
    }

    #[test]
    fn into_result_is_a_lossless_seam() {
        assert_eq!(Outcome::success(1).into_result(), Ok(1));
        assert_eq!(
            Outcome::<i32>::failure(boom()).into_result(),
            Err(vec![boom()])
        );
    }

    #[tokio::test]
    async fn and_then_async_runs_the_continuation_on_success() {
        let out = Outcome::success(2)
            .and_then_async(|n| async move { Outcome::success(n * 10) })
            .await;
        assert_eq!(out, Outcome::success(20));
    }

    #[tokio::test]
    async fn and_then_async_skips_the_continuation_on_failure() {
        let called = Cell::new(false);
        let out: Outcome<i32> = Outcome::failure(boom())
            .and_then_async(|n| {
                called.set(true);
                async move { Outcome::success(n) }
            })
            .await;
        assert!(!called.get());
        assert!(out.is_failure());
    }

    #[tokio::test]
    async fn map_and_tap_async_preserve_short_circuiting() {
        let touched = Cell::new(false);
        let out: Outcome<i32> = Outcome::failure(boom())
            .map_async(|n: i32| async move { n + 1 })
            .await
            .tap_async(|_| {
                touched.set(true);
                async {}
            })
            .await;
        assert!(!touched.get());
        assert_eq!(out.errors()[0].message(), "boom");
    }

    #[tokio::test]
    async fn unless_async_fails_when_the_async_predicate_holds() {
        let out = Outcome::success("john@example.com")
            .unless_async(|_| async { true }, Error::conflict("email taken"))
            .await;
        assert_eq!(out.errors()[0].message(), "email taken");

        let out = Outcome::success("john@example.com")
            .unless_async(|_| async { false }, Error::conflict("email taken"))
            .await;
        assert!(out.is_success());
    }

    #[tokio::test]
    async fn unless_async_skips_the_predicate_on_failure() {
        let queried = Cell::new(false);
        let out: Outcome<&str> = Outcome::failure(boom())
            .unless_async(
                |_| {
                    queried.set(true);
                    async { true }
                },
                Error::conflict("email taken"),
            )
            .await;
        assert!(!queried.get());
        assert_eq!(out.errors()[0].message(), "boom");
    }
}
