//! HTTP server: the SSE violation stream and a liveness probe.
//!
//! Per subscriber the stream is: one immediate event with the current
//! closest-violation set (resync, independent of the change gate), then
//! one event per gated broadcast. Reconnects are the client's concern;
//! EventSource does them natively.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_graceful_shutdown::SubsystemHandle;

use crate::publish::ViolationPublisher;

#[derive(Clone)]
struct WebState {
    publisher: Arc<ViolationPublisher>,
}

pub struct Web {
    port: u16,
    publisher: Arc<ViolationPublisher>,
}

impl Web {
    pub fn new(port: u16, publisher: Arc<ViolationPublisher>) -> Self {
        Web { port, publisher }
    }

    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), std::io::Error> {
        let app = router(self.publisher);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { subsys.on_shutdown_requested().await })
            .await
    }
}

fn router(publisher: Arc<ViolationPublisher>) -> Router {
    Router::new()
        .route("/stream", get(stream_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(WebState { publisher })
}

/// The per-subscriber payload sequence: the current set first, then every
/// gated broadcast until the publisher goes away.
fn payload_stream(publisher: &ViolationPublisher) -> impl Stream<Item = Arc<str>> {
    let (current, rx) = publisher.subscribe();

    let resync = stream::once(async move { current });
    let updates = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(payload) => return Some((payload, rx)),
                // A slow subscriber that lagged just skips to the newest
                // updates; every event carries the full set anyway.
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("SSE subscriber lagged by {} updates", skipped);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    resync.chain(updates)
}

async fn stream_handler(
    State(state): State<WebState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = payload_stream(&state.publisher)
        .map(|payload| Ok::<_, Infallible>(Event::default().data(&*payload)));
    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use birdwatch_core::{ClosestViolationSet, ViolationRecord};
    use chrono::{TimeZone, Utc};

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
    async fn test_subscriber_resyncs_then_follows_broadcasts() {
        let publisher = ViolationPublisher::new();
        publisher.maybe_publish(set(&["SN-1"]));

        // Joining after a quiet period still yields the current state
        // immediately, ahead of any new broadcast.
        let mut payloads = Box::pin(payload_stream(&publisher));
        let first = payloads.next().await.unwrap();
        assert!(first.contains("SN-1"));

        publisher.maybe_publish(set(&["SN-1", "SN-2"]));
        let second = payloads.next().await.unwrap();
        assert!(second.contains("SN-2"));
    }

    #[tokio::test]
    async fn test_subscriber_before_any_broadcast_gets_empty_set() {
        let publisher = ViolationPublisher::new();
        let mut payloads = Box::pin(payload_stream(&publisher));
        assert_eq!(&*payloads.next().await.unwrap(), "[]");
    }
}
