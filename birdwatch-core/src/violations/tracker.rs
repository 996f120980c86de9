//! Rolling violation history and the closest-violation reduction.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::record::{ClosestViolationSet, ViolationRecord};

/// Per-drone violation history over a trailing time window.
///
/// The tracker is the sole owner of the history. It has no internal
/// synchronization; callers drive it from one logical thread (the server's
/// tick subsystem) and never expose partial state to the publisher.
pub struct ViolationTracker {
    window: Duration,
    history: HashMap<String, Vec<ViolationRecord>>,
}

impl ViolationTracker {
    pub fn new(window: Duration) -> Self {
        ViolationTracker {
            window,
            history: HashMap::new(),
        }
    }

    /// Append this tick's violations, creating a sequence on first sight
    /// of a serial. A drone re-violating after its history was evicted
    /// starts a fresh sequence.
    pub fn record(&mut self, records: impl IntoIterator<Item = ViolationRecord>) {
        for record in records {
            self.history
                .entry(record.serial_number.clone())
                .or_default()
                .push(record);
        }
    }

    /// Drop every record older than the trailing window, and every serial
    /// whose sequence becomes empty. Sequences in the map are never empty.
    pub fn evict(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.window;
        self.history.retain(|_, records| {
            records.retain(|record| record.timestamp > cutoff);
            !records.is_empty()
        });
    }

    /// Reduce each drone's history to its minimum-distance record.
    ///
    /// The incumbent is only replaced on a strictly smaller distance, so
    /// the first-seen record wins ties.
    pub fn closest_set(&self) -> ClosestViolationSet {
        self.history
            .values()
            .filter_map(|records| {
                records.iter().reduce(|closest, record| {
                    if record.distance_mm < closest.distance_mm {
                        record
                    } else {
                        closest
                    }
                })
            })
            .cloned()
            .collect()
    }

    /// Number of drones with at least one violation in the window.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
