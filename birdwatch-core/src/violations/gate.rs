//! Change gate for outbound publishes.

use super::record::ClosestViolationSet;

/// Suppresses a publish when the newly reduced set equals the last one.
///
/// Comparison is structural over the canonically ordered set, so identical
/// mappings compare equal regardless of how they were built. Starts with
/// the empty set, so a quiet startup admits nothing.
#[derive(Debug, Default)]
pub struct ChangeGate {
    last: ClosestViolationSet,
}

impl ChangeGate {
    pub fn new() -> Self {
        ChangeGate::default()
    }

    /// Admit `set` if it differs from the last admitted set, retaining it
    /// as the new comparison baseline.
    pub fn update(&mut self, set: ClosestViolationSet) -> Option<&ClosestViolationSet> {
        if set == self.last {
            return None;
        }
        self.last = set;
        Some(&self.last)
    }

    /// The last admitted set.
    pub fn last(&self) -> &ClosestViolationSet {
        &self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violations::ViolationRecord;
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

    #[test]
    fn test_identical_sets_admit_once() {
        let mut gate = ChangeGate::new();
        assert!(gate.update(set(&["SN-1"])).is_some());
        assert!(gate.update(set(&["SN-1"])).is_none());
    }

    #[test]
    fn test_changed_set_admitted() {
        let mut gate = ChangeGate::new();
        assert!(gate.update(set(&["SN-1"])).is_some());
        assert!(gate.update(set(&["SN-1", "SN-2"])).is_some());
        // Removal is a change too.
        assert!(gate.update(set(&[])).is_some());
    }

    #[test]
    fn test_quiet_startup_admits_nothing() {
        let mut gate = ChangeGate::new();
        assert!(gate.update(set(&[])).is_none());
        assert!(gate.last().is_empty());
    }
}
