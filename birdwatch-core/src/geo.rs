//! Protected-Zone Geometry
//!
//! Pure functions for classifying drone positions against the no-fly zone.
//! Distances are computed and compared in millimeters, the native unit of
//! the upstream feed; meters only appear when a distance is formatted for
//! clients.

use crate::report::Position;

/// Euclidean distance from a position to the zone center, in millimeters.
pub fn distance_mm(position: &Position, center: &Position) -> f64 {
    (position.x - center.x).hypot(position.y - center.y)
}

/// Whether a distance counts as a violation of the protected zone.
///
/// The boundary is exclusive: a drone sitting exactly on the radius is not
/// in violation.
pub fn is_violating(distance_mm: f64, radius_mm: f64) -> bool {
    distance_mm < radius_mm
}

/// Convert a millimeter distance to meters, rounded half-away-from-zero to
/// two decimals.
///
/// The epsilon nudge keeps values like 1.005 m, which sit just below the
/// rounding boundary in binary floating point, from truncating to 1.00.
pub fn distance_to_meters(distance_mm: f64) -> f64 {
    ((distance_mm / 1000.0 + f64::EPSILON) * 100.0).round() / 100.0
}
