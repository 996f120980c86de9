//! Upstream Report Types
//!
//! Typed form of one polled batch of drone position reports, plus the
//! pilot identity returned by the registry. How these are fetched and
//! parsed off the wire is the server's concern; the core only consumes
//! the typed result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A planar position in millimeters, the native unit of the drone feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// One drone position report within a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DronePosition {
    pub serial_number: String,
    pub position: Position,
}

/// One timestamped batch of drone position reports.
///
/// Immutable once fetched; consumed by exactly one monitor tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub drones: Vec<DronePosition>,
}

/// Pilot identity from the registry.
///
/// The registry payload carries more fields than these; only the contact
/// details shown to viewers are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pilot {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}
