//! Upstream snapshot fetching.
//!
//! `SnapshotFetcher` is the boundary the monitor polls; the HTTP
//! implementation fetches the XML report endpoint and parses it into the
//! typed `Snapshot` the core consumes. Any transport or parse problem is a
//! `FetchError`, which skips the whole tick.

use async_trait::async_trait;
use birdwatch_core::{DronePosition, Position, Snapshot};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

// A fetch slower than this fails the tick instead of stalling it; the next
// interval retries.
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed report payload: {0}")]
    Payload(#[from] quick_xml::DeError),
}

/// Source of timestamped drone position snapshots.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, FetchError>;
}

// Wire shape of the upstream XML report. Fields the monitor does not use
// (device information, altitude, ...) deserialize into nothing.

#[derive(Debug, Deserialize)]
struct Report {
    capture: Capture,
}

#[derive(Debug, Deserialize)]
struct Capture {
    #[serde(rename = "@snapshotTimestamp")]
    snapshot_timestamp: DateTime<Utc>,
    #[serde(rename = "drone", default)]
    drones: Vec<Drone>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Drone {
    serial_number: String,
    position_x: f64,
    position_y: f64,
}

impl From<Report> for Snapshot {
    fn from(report: Report) -> Self {
        Snapshot {
            timestamp: report.capture.snapshot_timestamp,
            drones: report
                .capture
                .drones
                .into_iter()
                .map(|drone| DronePosition {
                    serial_number: drone.serial_number,
                    position: Position::new(drone.position_x, drone.position_y),
                })
                .collect(),
        }
    }
}

fn parse_report(xml: &str) -> Result<Snapshot, quick_xml::DeError> {
    quick_xml::de::from_str::<Report>(xml).map(Snapshot::from)
}

/// Fetches snapshots from the upstream XML report endpoint.
pub struct HttpSnapshotFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotFetcher {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(HttpSnapshotFetcher {
            client: reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SnapshotFetcher for HttpSnapshotFetcher {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response.text().await?;
        Ok(parse_report(&body)?)
    }
}
