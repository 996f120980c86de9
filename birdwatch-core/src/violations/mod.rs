//! Violation History Tracking
//!
//! This module keeps the rolling per-drone violation history for the
//! trailing time window, reduces each drone's history to its single
//! closest-approach record, and gates publishing on actual change.
//!
//! # Example
//!
//! ```rust,ignore
//! use birdwatch_core::violations::{ChangeGate, ViolationTracker};
//! use chrono::{Duration, Utc};
//!
//! let mut tracker = ViolationTracker::new(Duration::minutes(10));
//! let mut gate = ChangeGate::new();
//!
//! // Once per tick:
//! tracker.record(new_violations);
//! tracker.evict(Utc::now());
//! if let Some(changed) = gate.update(tracker.closest_set()) {
//!     // broadcast `changed` to subscribers
//! }
//! ```

mod gate;
mod record;
mod tracker;

pub use gate::*;
pub use record::*;
pub use tracker::*;
