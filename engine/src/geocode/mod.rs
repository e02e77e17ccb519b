//! Geocoding: turning coordinates into place names and back.
//!
//! `reverse()` is what fills the place names of a completed parcel, `search()` is only used to
//! move the map before selection starts.  Both can fail, the caller decides what to do with a
//! failure (the selection still gets its area, a search just reports it).
//!

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

pub use nominatim::*;

use crate::GeocodeError;

mod nominatim;

/// Administrative names for a location, empty when unknown.
///
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlaceDetails {
    /// Suburb, neighbourhood or hamlet
    pub area: String,
    /// City, town or village
    pub city: String,
    /// County or state district
    pub district: String,
    pub state: String,
    pub country: String,
    pub postcode: String,
}

/// Result of a forward search.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchHit {
    pub lat: f64,
    pub lng: f64,
    /// Full display name of the place
    pub address: String,
}

/// This trait enables us to use different geocoding services under a single interface.
///
#[allow(async_fn_in_trait)]
pub trait Geocoder: Debug {
    /// Return service name
    fn name(&self) -> String;
    /// Place names for a coordinate, `None` if the service knows no address there
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<PlaceDetails>, GeocodeError>;
    /// Best match for a free-form query
    async fn search(&self, query: &str) -> Result<SearchHit, GeocodeError>;
}

/// Geocoder used when working without network: knows nothing.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct Offline;

impl Geocoder for Offline {
    fn name(&self) -> String {
        "offline".to_string()
    }

    async fn reverse(&self, _lat: f64, _lng: f64) -> Result<Option<PlaceDetails>, GeocodeError> {
        Ok(None)
    }

    async fn search(&self, query: &str) -> Result<SearchHit, GeocodeError> {
        Err(GeocodeError::NotFound(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline() {
        let g = Offline;
        assert_eq!(Ok(None), g.reverse(1., 2.).await);
        assert_eq!(
            Err(GeocodeError::NotFound("Pune".to_string())),
            g.search("Pune").await
        );
    }
}
