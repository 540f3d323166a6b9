//! Drains an aggregate's pending events and hands them to the bus.

use chrono::Utc;

use keelcrm_core::{AggregateRoot, EventId};

use crate::bus::EventBus;
use crate::envelope::EventEnvelope;
use crate::event::Event;

/// Publishing collaborator: wraps pending events in envelopes and publishes
/// them after the aggregate change has been durably committed.
///
/// The registry is drained exactly once per call; a second call without new
/// mutations publishes nothing, so consumers never see duplicate batches
/// from the same commit.
pub struct EventPublisher<B> {
    bus: B,
}

impl<B> EventPublisher<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Drain and publish every pending event of `aggregate`.
    ///
    /// Sequence numbers are derived from the aggregate version so the last
    /// envelope of a batch carries the current version. Returns the number
    /// of published events.
    pub fn publish_pending<A>(
        &self,
        aggregate: &mut A,
        aggregate_type: &str,
    ) -> Result<usize, B::Error>
    where
        A: AggregateRoot,
        A::Id: core::fmt::Display,
        A::Event: Event,
        B: EventBus<EventEnvelope<A::Event>>,
    {
        let events = aggregate.take_events();
        let count = events.len();
        if count == 0 {
            return Ok(0);
        }

        let aggregate_id = aggregate.id().to_string();
        let first_sequence = aggregate.version().saturating_sub(count as u64 - 1);

        for (offset, payload) in events.into_iter().enumerate() {
            let envelope = EventEnvelope::new(
                EventId::new(),
                aggregate_id.clone(),
                aggregate_type,
                first_sequence + offset as u64,
                Utc::now(),
                payload,
            );
            self.bus.publish(envelope)?;
        }

        tracing::debug!(
            aggregate_type,
            aggregate_id = %aggregate_id,
            count,
            "published pending domain events"
        );
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use keelcrm_core::{EventLog, Mutate};

    use super::*;
    use crate::in_memory_bus::InMemoryEventBus;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Ticket {
        id: u32,
        subject: String,
        version: u64,
        events: EventLog<TicketEvent>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TicketEvent {
        subject: String,
        occurred_at: DateTime<Utc>,
    }

    impl Event for TicketEvent {
        fn event_type(&self) -> &'static str {
            "support.ticket.resubjected"
        }

        fn version(&self) -> u32 {
            1
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.occurred_at
        }
    }

    impl AggregateRoot for Ticket {
        type Id = u32;
        type Event = TicketEvent;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn version(&self) -> u64 {
            self.version
        }

        fn bump_version(&mut self) {
            self.version += 1;
        }

        fn record(&mut self, event: TicketEvent) {
            self.events.record(event);
        }

        fn pending_events(&self) -> &[TicketEvent] {
            self.events.pending()
        }

        fn take_events(&mut self) -> Vec<TicketEvent> {
            self.events.take()
        }
    }

    fn ticket() -> Ticket {
        Ticket {
            id: 7,
            subject: "printer".to_string(),
            version: 0,
            events: EventLog::new(),
        }
    }

    #[test]
    fn publishes_each_pending_event_and_clears_the_registry() {
        let bus = InMemoryEventBus::new();
        let subscription = bus.subscribe();
        let publisher = EventPublisher::new(&bus);

        let mut ticket = ticket();
        ticket
            .change()
            .set(|t| t.subject = "printer on fire".to_string())
            .record_with(|t| TicketEvent {
                subject: t.subject.clone(),
                occurred_at: Utc::now(),
            })
            .apply()
            .into_value();

        let published = publisher.publish_pending(&mut ticket, "ticket").unwrap();
        assert_eq!(published, 1);
        assert!(ticket.pending_events().is_empty());

        let envelope = subscription.try_recv().unwrap();
        assert_eq!(envelope.aggregate_id(), "7");
        assert_eq!(envelope.aggregate_type(), "ticket");
        assert_eq!(envelope.sequence_number(), 1);
        assert_eq!(envelope.payload().subject, "printer on fire");
    }

    #[test]
    fn a_second_drain_without_new_changes_publishes_nothing() {
        let bus = InMemoryEventBus::new();
        let subscription = bus.subscribe();
        let publisher = EventPublisher::new(&bus);

        let mut ticket = ticket();
        ticket
            .change()
            .set(|t| t.subject = "vpn".to_string())
            .record_with(|t| TicketEvent {
                subject: t.subject.clone(),
                occurred_at: Utc::now(),
            })
            .apply()
            .into_value();

        assert_eq!(publisher.publish_pending(&mut ticket, "ticket").unwrap(), 1);
        assert_eq!(publisher.publish_pending(&mut ticket, "ticket").unwrap(), 0);

        assert!(subscription.try_recv().is_ok());
        assert!(subscription.try_recv().is_err());
    }
}
