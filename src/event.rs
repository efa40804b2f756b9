use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::model::{ElectionId, Identity};

/// Notifications published by successful mutating calls.
///
/// These exist for off-band bookkeeping (audit logs, UI updates); the
/// registry has no dependency on whether anyone consumes them. A failed call
/// publishes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ElectionStarted {
        id: ElectionId,
        initiator: Identity,
        registration_end: DateTime<Utc>,
        voting_end: DateTime<Utc>,
        election_end: DateTime<Utc>,
    },
    CandidateRegistered {
        election_id: ElectionId,
        candidate: Identity,
    },
    Voted {
        voter: Identity,
        election_id: ElectionId,
        candidate: Identity,
    },
}

/// Ordered list of events awaiting a consumer.
///
/// The registry appends on every successful mutation; the embedding
/// application drains the list after each call (or batch of calls) and ships
/// the events over whatever notification transport it uses.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to the log.
    pub fn publish(&mut self, event: Event) {
        info!("event: {event:?}");
        self.events.push(event);
    }

    /// Events published since the last drain, oldest first.
    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// Take ownership of all pending events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
