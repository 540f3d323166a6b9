//! `keelcrm-core` — railway-oriented domain kernel.
//!
//! This crate contains **pure domain** building blocks (no infrastructure
//! concerns): the [`Outcome`] railway type, the [`Error`] taxonomy, composable
//! [`Rule`] checks and the [`Change`] builder that aggregates use for
//! validate-then-commit mutations.

pub mod aggregate;
pub mod change;
pub mod entity;
pub mod error;
pub mod event_log;
pub mod id;
pub mod outcome;
pub mod rule;
pub mod value_object;

pub use aggregate::{AggregateRoot, ExpectedVersion};
pub use change::{Change, Mutate};
pub use entity::Entity;
pub use error::{Error, ErrorKind};
pub use event_log::EventLog;
pub use id::{AggregateId, EventId};
pub use outcome::Outcome;
pub use rule::{Rule, rules};
pub use value_object::ValueObject;
