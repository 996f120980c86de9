//! Birdwatch core - no-fly-zone violation tracking.
//!
//! Platform-independent logic for the Birdwatch monitor: protected-zone
//! geometry, the rolling per-drone violation history, the closest-violation
//! reduction, and the change gate that decides when subscribers need a new
//! push. No I/O and no async runtime here; the server crate wires these
//! pieces to the upstream feed and the SSE stream.

pub mod geo;
pub mod report;
pub mod violations;

pub use report::{DronePosition, Pilot, Position, Snapshot};
pub use violations::{ChangeGate, ClosestViolationSet, ViolationRecord, ViolationTracker};
