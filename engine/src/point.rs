//! Boundary vertices.
//!
//! A `GeoPoint` is one clicked corner of a parcel.  Coordinates are kept as given, there is no
//! wrapping or normalisation: the order and values are what the user selected.
//!

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PointError;

/// One boundary vertex, in degrees.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }
}

/// Parse `lat,lng` as typed on the command-line.
///
impl FromStr for GeoPoint {
    type Err = PointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || PointError::BadFormat(s.to_string());

        let (lat, lng) = s.split_once(',').ok_or_else(bad)?;
        let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
        let lng: f64 = lng.trim().parse().map_err(|_| bad())?;

        if !(-90. ..=90.).contains(&lat) {
            return Err(PointError::LatitudeRange(lat));
        }
        if !(-180. ..=180.).contains(&lng) {
            return Err(PointError::LongitudeRange(lng));
        }
        Ok(GeoPoint { lat, lng })
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Arithmetic mean of the points, `None` if there are none.
///
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
    let lng = points.iter().map(|p| p.lng).sum::<f64>() / n;
    Some(GeoPoint { lat, lng })
}
