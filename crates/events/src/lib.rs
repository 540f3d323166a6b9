//! `keelcrm-events` — domain-event plumbing.
//!
//! The aggregate records events into its own registry (see
//! `keelcrm-core::EventLog`); this crate carries them the rest of the way:
//! the [`Event`] contract, the persisted [`EventEnvelope`], the [`EventBus`]
//! transport abstraction and the [`EventPublisher`] that drains an
//! aggregate's registry exactly once per commit.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod publisher;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::InMemoryEventBus;
pub use publisher::EventPublisher;
