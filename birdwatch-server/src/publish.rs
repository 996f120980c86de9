//! Change-gated violation publishing.
//!
//! Wraps the core `ChangeGate` with the broadcast channel SSE subscribers
//! listen on. One mutex guards the gate and the retained payload, so a
//! subscriber joining concurrently with a publish either sees the new
//! payload as its resync state or receives it as its first broadcast,
//! never neither.

use birdwatch_core::{ChangeGate, ClosestViolationSet};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

const BROADCAST_CAPACITY: usize = 16;

struct PublishState {
    gate: ChangeGate,
    /// Serialized form of the last admitted set, for new-subscriber resync.
    current: Arc<str>,
}

/// Broadcasts the closest-violation set to subscribers when it changes.
pub struct ViolationPublisher {
    tx: broadcast::Sender<Arc<str>>,
    state: Mutex<PublishState>,
}

impl ViolationPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        ViolationPublisher {
            tx,
            state: Mutex::new(PublishState {
                gate: ChangeGate::new(),
                current: Arc::from("[]"),
            }),
        }
    }

    /// Publish `set` to all subscribers if it differs from the last
    /// published set. Returns whether a broadcast went out.
    pub fn maybe_publish(&self, set: ClosestViolationSet) -> bool {
        let mut state = self.state.lock().unwrap();
        let payload: Arc<str> = match state.gate.update(set) {
            None => return false,
            Some(changed) => match serde_json::to_string(changed) {
                Ok(json) => Arc::from(json),
                Err(e) => {
                    log::error!("violation set serialization failed: {}", e);
                    return false;
                }
            },
        };
        state.current = payload.clone();
        // A send error just means nobody is subscribed right now.
        let receivers = self.tx.send(payload).unwrap_or(0);
        log::debug!("published violation update to {} subscribers", receivers);
        true
    }

    /// The current payload plus a receiver for future updates, taken
    /// atomically with respect to `maybe_publish`.
    pub fn subscribe(&self) -> (Arc<str>, broadcast::Receiver<Arc<str>>) {
        let state = self.state.lock().unwrap();
        (state.current.clone(), self.tx.subscribe())
    }
}

impl Default for ViolationPublisher {
    fn default() -> Self {
        ViolationPublisher::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdwatch_core::ViolationRecord;
    use chrono::{TimeZone, Utc};
    use tokio::sync::broadcast::error::TryRecvError;

    fn set(serials: &[&str]) -> ClosestViolationSet {
        serials
            .iter()
            .map(|serial| ViolationRecord {
                serial_number: serial.to_string(),
                timestamp: Utc.with_ymd_and_hms(2023, 1, 7, 10, 0, 0).unwrap(),
                distance_mm: 50_000.0,
                pilot: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_identical_sets_broadcast_once() {
        let publisher = ViolationPublisher::new();
        let (_, mut rx) = publisher.subscribe();

        assert!(publisher.maybe_publish(set(&["SN-1"])));
        assert!(!publisher.maybe_publish(set(&["SN-1"])));

        assert!(rx.try_recv().is_ok());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_new_subscriber_resyncs_with_current_state() {
        let publisher = ViolationPublisher::new();
        publisher.maybe_publish(set(&["SN-1"]));

        // No change since the last broadcast, but a late joiner still gets
        // the full current state immediately.
        let (current, _rx) = publisher.subscribe();
        assert!(current.contains("SN-1"));
    }

    #[tokio::test]
    async fn test_subscriber_before_any_publish_sees_empty_set() {
        let publisher = ViolationPublisher::new();
        let (current, _rx) = publisher.subscribe();
        assert_eq!(&*current, "[]");
    }

    #[tokio::test]
    async fn test_removal_is_broadcast() {
        let publisher = ViolationPublisher::new();
        publisher.maybe_publish(set(&["SN-1"]));

        let (_, mut rx) = publisher.subscribe();
        assert!(publisher.maybe_publish(set(&[])));
        assert_eq!(&*rx.try_recv().unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let publisher = ViolationPublisher::new();
        assert!(publisher.maybe_publish(set(&["SN-1"])));
        let (current, _rx) = publisher.subscribe();
        assert!(current.contains("SN-1"));
    }
}
