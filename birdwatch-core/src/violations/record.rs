//! Violation records and the reduced per-drone result set.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use crate::geo;
use crate::report::Pilot;

/// A single protected-zone violation by one drone at one snapshot.
///
/// The distance is stored in millimeters, the unit the violation threshold
/// is compared in. Clients see `distToNest` as meters with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    pub serial_number: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "distToNest", serialize_with = "serialize_dist_to_nest")]
    pub distance_mm: f64,
    /// `None` when the registry lookup failed or the drone is unregistered.
    pub pilot: Option<Pilot>,
}

fn serialize_dist_to_nest<S>(distance_mm: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{:.2}", geo::distance_to_meters(*distance_mm)))
}

/// The closest violation per drone, keyed and ordered by serial number.
///
/// The canonical ordering makes equality and serialization independent of
/// the order violations were recorded in, so the change gate never sees a
/// spurious difference. Serializes as a JSON array of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClosestViolationSet {
    records: BTreeMap<String, ViolationRecord>,
}

impl ClosestViolationSet {
    pub fn new() -> Self {
        ClosestViolationSet::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, serial_number: &str) -> Option<&ViolationRecord> {
        self.records.get(serial_number)
    }

    /// Records in serial-number order.
    pub fn iter(&self) -> impl Iterator<Item = &ViolationRecord> {
        self.records.values()
    }
}

impl FromIterator<ViolationRecord> for ClosestViolationSet {
    fn from_iter<I: IntoIterator<Item = ViolationRecord>>(iter: I) -> Self {
        ClosestViolationSet {
            records: iter
                .into_iter()
                .map(|record| (record.serial_number.clone(), record))
                .collect(),
        }
    }
}

impl Serialize for ClosestViolationSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in self.records.values() {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}
