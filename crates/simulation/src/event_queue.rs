//! Event queue with deterministic ordering.

use stakesim_core::Event;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Duration;

/// Key for ordering events in the queue.
///
/// Events are ordered by:
/// 1. Time (earlier first)
/// 2. Sequence number (FIFO for the same time)
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EventKey {
    /// When this event should be processed.
    pub time: Duration,
    /// Insertion counter for deterministic FIFO ordering.
    pub sequence: u64,
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => {}
            ord => return ord,
        }
        self.sequence.cmp(&other.sequence)
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered queue of pending events.
#[derive(Debug, Default)]
pub struct EventScheduler {
    events: BTreeMap<EventKey, Event>,
    /// Next insertion sequence. Never reset, so keys stay unique across
    /// `clear`.
    sequence: u64,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event. Returns the key it is ordered by.
    pub fn push(&mut self, event: Event) -> EventKey {
        let key = EventKey {
            time: event.time,
            sequence: self.sequence,
        };
        self.sequence += 1;
        self.events.insert(key, event);
        key
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_first().map(|(_, event)| event)
    }

    /// The event `pop` would return.
    pub fn peek(&self) -> Option<&Event> {
        self.events.first_key_value().map(|(_, event)| event)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pending events in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }
}
