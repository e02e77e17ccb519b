//! Parcel area estimation.
//!
//! The shoelace formula is applied directly to (lat, lng) as if degrees were planar units,
//! then converted with the equatorial length of one degree on both axes.  This overestimates
//! east-west distances away from the equator (by `1/cos(lat)`), so areas are only indicative.
//! Stored areas were computed this way, keep the constants as they are.
//!

use tracing::trace;

use crate::GeoPoint;

/// One degree at the equator, in meters
pub const METERS_PER_DEGREE: f64 = 111_320.;
/// Square yards in one square meter
pub const SQ_YARDS_PER_SQ_METER: f64 = 1.196;

/// Notice to show next to any computed area.
pub const AREA_DISCLAIMER: &str = "Area is approximate: computed in flat latitude/longitude \
space with the equatorial length of a degree, it grows less accurate away from the equator.";

/// Unsigned polygon area in "square degrees", polygon closed from the last point to the first.
///
pub fn shoelace_sq_degrees(points: &[GeoPoint]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.;
    }

    let sum: f64 = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].lat * points[j].lng - points[j].lat * points[i].lng
        })
        .sum();
    sum.abs() / 2.
}

/// Round half away from zero, negative and non-finite values give 0.
///
#[inline]
pub fn round_area(v: f64) -> u64 {
    if v.is_finite() && v > 0. {
        v.round() as u64
    } else {
        0
    }
}

/// Approximate enclosed area in square yards.
///
#[tracing::instrument]
pub fn estimate_area_sq_yd(points: &[GeoPoint]) -> u64 {
    let sq_deg = shoelace_sq_degrees(points);
    let sq_m = sq_deg * METERS_PER_DEGREE * METERS_PER_DEGREE;
    let sq_yd = round_area(sq_m * SQ_YARDS_PER_SQ_METER);
    trace!("{sq_deg} deg² = {sq_m} m² = {sq_yd} yd²");
    sq_yd
}
