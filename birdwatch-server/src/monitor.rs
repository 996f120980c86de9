//! The violation monitor tick loop.
//!
//! One subsystem owns the tracker and drives the whole pipeline: fetch a
//! snapshot, classify violations, resolve pilots, merge into the history,
//! evict, reduce, publish. The loop awaits each tick to completion before
//! taking the next interval, so reductions never overlap and the tracker
//! needs no locking.

use birdwatch_core::{geo, Position, Snapshot, ViolationRecord, ViolationTracker};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_graceful_shutdown::SubsystemHandle;

use crate::fetch::{FetchError, SnapshotFetcher};
use crate::pilots::PilotResolver;
use crate::publish::ViolationPublisher;

pub struct ViolationMonitor {
    nest: Position,
    radius_mm: f64,
    interval: Duration,
    tracker: ViolationTracker,
    fetcher: Box<dyn SnapshotFetcher>,
    resolver: Box<dyn PilotResolver>,
    publisher: Arc<ViolationPublisher>,
}

impl ViolationMonitor {
    pub fn new(
        nest: Position,
        radius_mm: f64,
        window: chrono::Duration,
        interval: Duration,
        fetcher: Box<dyn SnapshotFetcher>,
        resolver: Box<dyn PilotResolver>,
        publisher: Arc<ViolationPublisher>,
    ) -> Self {
        ViolationMonitor {
            nest,
            radius_mm,
            interval,
            tracker: ViolationTracker::new(window),
            fetcher,
            resolver,
            publisher,
        }
    }

    pub async fn run(mut self, subsys: SubsystemHandle) -> Result<(), FetchError> {
        log::info!(
            "monitoring no-fly zone: center ({}, {}) mm, radius {} mm, every {:?}",
            self.nest.x,
            self.nest.y,
            self.radius_mm,
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = subsys.on_shutdown_requested() => {
                    log::debug!("violation monitor: shutdown");
                    return Ok(());
                },
                _ = ticker.tick() => {
                    // A failed fetch abandons the tick: no history mutation,
                    // the previously published set stands, retry next tick.
                    if let Err(e) = self.process_tick(Utc::now()).await {
                        log::warn!("tick skipped: {}", e);
                    }
                },
            }
        }
    }

    /// One full tick of the pipeline. Public for tests; the subsystem loop
    /// is the only production caller.
    pub async fn process_tick(&mut self, now: DateTime<Utc>) -> Result<(), FetchError> {
        let snapshot = self.fetcher.fetch().await?;
        let records = self.violations_in(&snapshot).await;
        if !records.is_empty() {
            log::debug!("{} drones violating at {}", records.len(), snapshot.timestamp);
        }
        self.tracker.record(records);
        self.tracker.evict(now);
        self.publisher.maybe_publish(self.tracker.closest_set());
        Ok(())
    }

    /// Classify the snapshot against the zone and build one violation
    /// record per offending drone, pilots resolved concurrently. The tick
    /// waits for every resolution; a failed lookup becomes a missing pilot
    /// without blocking the others.
    async fn violations_in(&self, snapshot: &Snapshot) -> Vec<ViolationRecord> {
        let violating: Vec<_> = snapshot
            .drones
            .iter()
            .filter_map(|drone| {
                let distance_mm = geo::distance_mm(&drone.position, &self.nest);
                geo::is_violating(distance_mm, self.radius_mm).then_some((drone, distance_mm))
            })
            .collect();

        let pilots = join_all(
            violating
                .iter()
                .map(|(drone, _)| self.resolver.resolve(&drone.serial_number)),
        )
        .await;

        violating
            .into_iter()
            .zip(pilots)
            .map(|((drone, distance_mm), pilot)| ViolationRecord {
                serial_number: drone.serial_number.clone(),
                timestamp: snapshot.timestamp,
                distance_mm,
                pilot,
            })
            .collect()
    }
}
