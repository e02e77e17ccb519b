use std::time::Duration;

use thiserror::Error;

/// Errors when reading a boundary point from text.
///
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointError {
    #[error("Bad point format '{0}', expected 'lat,lng'")]
    BadFormat(String),
    #[error("Latitude {0} out of range")]
    LatitudeRange(f64),
    #[error("Longitude {0} out of range")]
    LongitudeRange(f64),
    #[error("{0} points given, a boundary has at most {1}")]
    TooManyPoints(usize, usize),
}

/// Custom error type for geocoding, allow us to differentiate between a lookup that found
/// nothing and one that could not be done.
///
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeocodeError {
    #[error("Empty search query")]
    EmptyQuery,
    #[error("Location not found: {0}")]
    NotFound(String),
    #[error("HTTP Error: {0}")]
    Transport(String),
    #[error("No answer from geocoder after {0:?}")]
    Timeout(Duration),
    #[error("Decoding geocoder answer: {0}")]
    Decoding(String),
}
