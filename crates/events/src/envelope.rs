use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keelcrm_core::EventId;

/// Envelope for an event, containing stream metadata.
///
/// This is the unit you persist/append to an event stream and hand to the
/// bus.
///
/// Notes:
/// - **Append-only**: `sequence_number` is intended to be monotonically
///   increasing per aggregate stream.
/// - `recorded_at` is infrastructure time (when the envelope was built);
///   business time lives on the payload.
/// - `payload` is the domain-agnostic event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: EventId,

    aggregate_id: String,
    aggregate_type: String,

    /// Monotonically increasing position in the aggregate stream.
    sequence_number: u64,

    recorded_at: DateTime<Utc>,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: EventId,
        aggregate_id: impl Into<String>,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        recorded_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            aggregate_id: aggregate_id.into(),
            aggregate_type: aggregate_type.into(),
            sequence_number,
            recorded_at,
            payload,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct Renamed {
        name: String,
    }

    #[test]
    fn serializes_stream_metadata_alongside_the_payload() {
        let envelope = EventEnvelope::new(
            EventId::new(),
            "7",
            "ticket",
            3,
            Utc::now(),
            Renamed {
                name: "vpn".to_string(),
            },
        );

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["aggregate_id"], "7");
        assert_eq!(json["aggregate_type"], "ticket");
        assert_eq!(json["sequence_number"], 3);
        assert_eq!(json["payload"]["name"], "vpn");

        let decoded: EventEnvelope<Renamed> = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, envelope);
    }
}
