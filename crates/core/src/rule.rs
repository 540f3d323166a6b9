//! Composable pre-check rules.
//!
//! A [`Rule`] chain evaluates predicates with AND semantics and surfaces the
//! first failing predicate's error as an [`Outcome`]. Predicates must be free
//! of side effects; after the first failure later predicates are not
//! evaluated at all.

use std::future::Future;

use crate::error::Error;
use crate::outcome::Outcome;

/// A short-circuiting chain of boolean checks.
///
/// ```
/// use keelcrm_core::{Error, Rule, rules};
///
/// let outcome = Rule::new()
///     .must(|| rules::not_empty("John"), Error::validation("first name must not be empty"))
///     .must(|| rules::max_len("John", 100), Error::validation("first name is too long"))
///     .check();
/// assert!(outcome.is_success());
/// ```
#[derive(Debug, Default)]
pub struct Rule {
    failed: Option<Error>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `predicate`; on the first false result the attached error is
    /// kept and every later predicate is skipped.
    #[must_use]
    pub fn must(mut self, predicate: impl FnOnce() -> bool, error: Error) -> Self {
        if self.failed.is_none() && !predicate() {
            self.failed = Some(error);
        }
        self
    }

    /// Async sibling of [`Rule::must`] for predicates that await a
    /// collaborator. Chains as `.must(..).must_async(..).await.check()`.
    #[must_use]
    pub async fn must_async<F, Fut>(mut self, predicate: F, error: Error) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        if self.failed.is_none() && !predicate().await {
            self.failed = Some(error);
        }
        self
    }

    /// Resolve the chain into an outcome.
    pub fn check(self) -> Outcome<()> {
        match self.failed {
            None => Outcome::done(),
            Some(error) => Outcome::failure(error),
        }
    }
}

/// Reusable named predicates for composition inside `ensure`/`must`.
pub mod rules {
    use chrono::NaiveDate;

    /// True when `value` contains at least one non-whitespace character.
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    pub fn max_len(value: &str, max: usize) -> bool {
        value.chars().count() <= max
    }

    pub fn less_than<T: PartialOrd>(value: T, limit: T) -> bool {
        value < limit
    }

    pub fn greater_than<T: PartialOrd>(value: T, limit: T) -> bool {
        value > limit
    }

    /// Inclusive on both ends.
    pub fn in_range<T: PartialOrd>(value: T, min: T, max: T) -> bool {
        value >= min && value <= max
    }

    /// Structural email check: one `@`, non-empty local and domain parts, a
    /// dotted domain, no whitespace. Deliverability is not our concern.
    pub fn valid_email(value: &str) -> bool {
        let mut parts = value.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if local.is_empty() || domain.is_empty() {
            return false;
        }
        if value.chars().any(char::is_whitespace) {
            return false;
        }
        domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    }

    pub fn not_in_future(date: NaiveDate, today: NaiveDate) -> bool {
        date <= today
    }
}
