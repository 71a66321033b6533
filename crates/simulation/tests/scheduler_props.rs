//! Property tests for event ordering.

use proptest::prelude::*;
use stakesim_core::{Event, EventKind};
use stakesim_simulation::EventScheduler;
use stakesim_types::NodeId;
use std::time::Duration;

proptest! {
    #[test]
    fn pops_are_time_ordered_and_fifo(times in prop::collection::vec(0u64..20, 0..64)) {
        let mut queue = EventScheduler::new();
        for (i, t) in times.iter().enumerate() {
            // The destination records insertion order.
            queue.push(Event::new(Duration::from_secs(*t), NodeId(i as u64), EventKind::Break));
        }
        prop_assert_eq!(queue.len(), times.len());

        let mut popped = Vec::new();
        while let Some(event) = queue.pop() {
            popped.push((event.time, event.destination.map(|d| d.0).unwrap_or_default()));
        }

        let mut expected: Vec<_> = times
            .iter()
            .enumerate()
            .map(|(i, t)| (Duration::from_secs(*t), i as u64))
            .collect();
        expected.sort();
        prop_assert_eq!(popped, expected);
        prop_assert!(queue.is_empty());
    }

    #[test]
    fn peek_matches_pop(times in prop::collection::vec(0u64..5, 1..16)) {
        let mut queue = EventScheduler::new();
        for t in &times {
            queue.push(Event::breakpoint(Duration::from_secs(*t)));
        }
        while let Some(head) = queue.peek().cloned() {
            prop_assert_eq!(queue.pop(), Some(head));
        }
    }
}
