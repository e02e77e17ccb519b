//! Boundary selection session.
//!
//! A `Selection` ties the point collector to the derived `LocationResult`:
//!
//! 1. points are added until the boundary is complete, which yields a `GeocodeRequest`
//!    tagged with the collector generation
//! 2. `Selection::lookup()` runs the reverse query for that request, it does not borrow the
//!    selection so points can be changed while it is in flight
//! 3. `apply()` takes the reply; if the generation does not match anymore it is dropped,
//!    otherwise the area is computed and the result published
//!
//! The result is published on a `watch` channel, `None` meaning there is no valid result.  A
//! failed lookup still publishes a result, with empty place names.
//!

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    BoundarySet, Change, DEF_TIMEOUT, GeoPoint, GeocodeError, Geocoder, PlaceDetails,
    PointCollector, centroid, estimate_area_sq_yd,
};

/// Default wait for a reverse lookup
pub const DEF_LOOKUP_TIMEOUT: Duration = Duration::from_secs(DEF_TIMEOUT);

/// What is handed to the registration form once a boundary is complete.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResult {
    pub area: String,
    pub city: String,
    pub district: String,
    pub state: String,
    /// Approximate area in square yards
    pub area_sq_yd: u64,
    /// The four corners, in selection order
    pub coordinates: BoundarySet,
    /// Centroid, the point used for the reverse lookup
    pub center_coordinates: GeoPoint,
}

impl LocationResult {
    pub fn new(set: &BoundarySet, center: GeoPoint, place: &PlaceDetails) -> Self {
        LocationResult {
            area: place.area.clone(),
            city: place.city.clone(),
            district: place.district.clone(),
            state: place.state.clone(),
            area_sq_yd: estimate_area_sq_yd(set.points()),
            coordinates: set.clone(),
            center_coordinates: center,
        }
    }

    /// Flat key/value form model, area as a string.
    ///
    pub fn to_form(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("area".to_string(), self.area.clone()),
            ("city".to_string(), self.city.clone()),
            ("district".to_string(), self.district.clone()),
            ("state".to_string(), self.state.clone()),
            ("areaSqYd".to_string(), self.area_sq_yd.to_string()),
        ])
    }
}

/// A reverse lookup to perform for a given boundary generation.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeocodeRequest {
    pub generation: u64,
    pub center: GeoPoint,
}

/// Answer to a `GeocodeRequest`, carrying the generation it was issued for.
///
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeReply {
    pub generation: u64,
    pub place: Result<Option<PlaceDetails>, GeocodeError>,
}

/// Outcome of `Selection::apply()`.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Everything is there
    Located(LocationResult),
    /// Lookup failed or found nothing, place names are empty
    Degraded {
        result: LocationResult,
        error: GeocodeError,
    },
    /// Boundary changed since the request was made, reply dropped
    Stale,
}

/// Selection session, see module documentation.
///
#[derive(Debug)]
pub struct Selection {
    collector: PointCollector,
    /// Lookup we are waiting for, if any
    pending: Option<GeocodeRequest>,
    tx: watch::Sender<Option<LocationResult>>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Selection {
            collector: PointCollector::new(),
            pending: None,
            tx,
        }
    }

    /// Get notified of every new result or invalidation.
    ///
    pub fn subscribe(&self) -> watch::Receiver<Option<LocationResult>> {
        self.tx.subscribe()
    }

    /// Current result, as a copy.
    ///
    pub fn current(&self) -> Option<LocationResult> {
        self.tx.borrow().clone()
    }

    #[inline]
    pub fn boundary(&self) -> &BoundarySet {
        self.collector.boundary()
    }

    #[inline]
    pub fn pending(&self) -> Option<GeocodeRequest> {
        self.pending
    }

    /// Area of the complete boundary, available without waiting for place names.
    ///
    pub fn area_sq_yd(&self) -> Option<u64> {
        let set = self.collector.boundary();
        set.is_complete().then(|| estimate_area_sq_yd(set.points()))
    }

    /// Add a corner, returns the lookup to run if this completed the boundary.
    ///
    #[tracing::instrument(skip(self))]
    pub fn add_point(&mut self, p: GeoPoint) -> Option<GeocodeRequest> {
        match self.collector.add_point(p) {
            Change::Completed => {
                let center = centroid(self.collector.boundary().points())?;
                let req = GeocodeRequest {
                    generation: self.collector.generation(),
                    center,
                };
                debug!("request={:?}", req);
                self.pending = Some(req);
                Some(req)
            }
            _ => None,
        }
    }

    pub fn undo_last(&mut self) -> Change {
        let change = self.collector.undo_last();
        self.after(change)
    }

    pub fn clear(&mut self) -> Change {
        let change = self.collector.clear();
        self.after(change)
    }

    fn after(&mut self, change: Change) -> Change {
        if change == Change::Invalidated {
            debug!("boundary incomplete, dropping result");
            self.pending = None;
            self.tx.send_replace(None);
        }
        change
    }

    /// Run the reverse lookup for `req`, giving up after `wait`.
    ///
    #[tracing::instrument(skip(geocoder))]
    pub async fn lookup<G: Geocoder>(
        geocoder: &G,
        req: GeocodeRequest,
        wait: Duration,
    ) -> GeocodeReply {
        let place = match tokio::time::timeout(
            wait,
            geocoder.reverse(req.center.lat, req.center.lng),
        )
        .await
        {
            Ok(place) => place,
            Err(_) => Err(GeocodeError::Timeout(wait)),
        };
        GeocodeReply {
            generation: req.generation,
            place,
        }
    }

    /// Take a lookup reply into account.
    ///
    #[tracing::instrument(skip(self))]
    pub fn apply(&mut self, reply: GeocodeReply) -> Resolution {
        let req = match self.pending {
            Some(req)
                if req.generation == reply.generation
                    && self.collector.generation() == reply.generation =>
            {
                req
            }
            _ => {
                debug!(
                    "stale reply for generation {}, now {}",
                    reply.generation,
                    self.collector.generation()
                );
                return Resolution::Stale;
            }
        };
        self.pending = None;

        let (place, error) = match reply.place {
            Ok(Some(place)) => (place, None),
            Ok(None) => (
                PlaceDetails::default(),
                Some(GeocodeError::NotFound(req.center.to_string())),
            ),
            Err(e) => (PlaceDetails::default(), Some(e)),
        };

        let result = LocationResult::new(self.collector.boundary(), req.center, &place);
        self.tx.send_replace(Some(result.clone()));

        match error {
            None => {
                info!("located {} yd² in {}", result.area_sq_yd, result.city);
                Resolution::Located(result)
            }
            Some(error) => {
                warn!("no place names: {error}");
                Resolution::Degraded { result, error }
            }
        }
    }

    /// Lookup and apply the pending request, if any.
    ///
    pub async fn locate<G: Geocoder>(&mut self, geocoder: &G, wait: Duration) -> Option<Resolution> {
        let req = self.pending?;
        let reply = Self::lookup(geocoder, req, wait).await;
        Some(self.apply(reply))
    }
}
