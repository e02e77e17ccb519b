//! [Nominatim] (OpenStreetMap) client.
//!
//! Two endpoints are used:
//!
//! - `/search?format=json&q=...&limit=1` for forward lookups, `lat`/`lon` come back as strings
//! - `/reverse?format=json&lat=..&lon=..&zoom=18&addressdetails=1` for place names, the
//!   answer has no `address` (and an `error` field) when nothing is there
//!
//! The public instance requires an identifying `user-agent`, we send `<crate>/<version>` unless
//! told otherwise.
//!
//! [Nominatim]: https://nominatim.org/release-docs/latest/api/Overview/
//!

use std::time::Duration;

use clap::{crate_name, crate_version};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{GeocodeError, Geocoder, PlaceDetails, SearchHit};

/// Public OSM instance
pub const DEF_BASE_URL: &str = "https://nominatim.openstreetmap.org";
/// Default request timeout, in seconds
pub const DEF_TIMEOUT: u64 = 10;
/// Zoom level for reverse lookups (building level)
const REVERSE_ZOOM: u8 = 18;

/// Geocoder settings as found in the configuration file.
///
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GeocoderConfig {
    /// Service URL, without trailing `/`
    pub base_url: Option<String>,
    /// `user-agent` to send
    pub user_agent: Option<String>,
    /// Timeout in seconds
    pub timeout: Option<u64>,
}

/// This is the Nominatim client struct.
///
#[derive(Clone, Debug)]
pub struct Nominatim {
    /// Base site url taken from config
    pub base_url: String,
    /// What we announce ourselves as
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// reqwest async client
    pub client: Client,
}

/// Parameters for `/search`
///
#[derive(Debug, Serialize)]
struct SearchParam<'a> {
    format: &'a str,
    q: &'a str,
    limit: u8,
}

/// Parameters for `/reverse`
///
#[derive(Debug, Serialize)]
struct ReverseParam<'a> {
    format: &'a str,
    lat: f64,
    lon: f64,
    zoom: u8,
    addressdetails: u8,
}

/// One `/search` answer, we only use these fields
///
#[derive(Debug, Deserialize)]
struct SearchAnswer {
    lat: String,
    lon: String,
    display_name: String,
}

/// `/reverse` answer
///
#[derive(Debug, Deserialize)]
struct ReverseAnswer {
    address: Option<Address>,
}

/// Address details of a `/reverse` answer.  Which fields are present depends on the place.
///
#[derive(Debug, Default, Deserialize)]
struct Address {
    suburb: Option<String>,
    neighbourhood: Option<String>,
    hamlet: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state_district: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
}

/// First non-empty value, or an empty string
///
fn first_of(list: &[&Option<String>]) -> String {
    list.iter()
        .filter_map(|s| s.as_deref())
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

impl From<Address> for PlaceDetails {
    fn from(a: Address) -> Self {
        PlaceDetails {
            area: first_of(&[&a.suburb, &a.neighbourhood, &a.hamlet]),
            city: first_of(&[&a.city, &a.town, &a.village]),
            district: first_of(&[&a.county, &a.state_district]),
            state: first_of(&[&a.state]),
            country: first_of(&[&a.country]),
            postcode: first_of(&[&a.postcode]),
        }
    }
}

impl Nominatim {
    #[tracing::instrument]
    pub fn new() -> Self {
        trace!("nominatim::new");

        Nominatim {
            base_url: DEF_BASE_URL.to_owned(),
            user_agent: format!("{}/{}", crate_name!(), crate_version!()),
            timeout: Duration::from_secs(DEF_TIMEOUT),
            client: Client::new(),
        }
    }

    /// Load some data from in-memory loaded config
    ///
    #[tracing::instrument]
    pub fn load(&mut self, cfg: &GeocoderConfig) -> &mut Self {
        trace!("nominatim::load");

        if let Some(url) = &cfg.base_url {
            self.base_url = url.trim_end_matches('/').to_owned();
        }
        if let Some(ua) = &cfg.user_agent {
            self.user_agent = ua.to_owned();
        }
        if let Some(t) = cfg.timeout {
            self.timeout = Duration::from_secs(t);
        }
        self
    }

    /// Map reqwest errors into ours, separating timeouts.
    ///
    fn http_error(&self, e: reqwest::Error) -> GeocodeError {
        if e.is_timeout() {
            GeocodeError::Timeout(self.timeout)
        } else {
            GeocodeError::Transport(e.to_string())
        }
    }

    /// GET `route` with `param` and return the body.
    ///
    #[tracing::instrument(skip(self))]
    async fn get<P: Serialize + std::fmt::Debug>(
        &self,
        route: &str,
        param: &P,
    ) -> Result<String, GeocodeError> {
        let url = format!("{}{}", self.base_url, route);
        trace!("Fetching data from {}…", url);

        let resp = self
            .client
            .get(&url)
            .query(param)
            .header("user-agent", &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.http_error(e))?;

        trace!("resp={:?}", resp);
        let resp = resp.error_for_status().map_err(|e| self.http_error(e))?;
        resp.text().await.map_err(|e| self.http_error(e))
    }
}

impl Default for Nominatim {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for Nominatim {
    fn name(&self) -> String {
        "nominatim".to_string()
    }

    #[tracing::instrument(skip(self))]
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<PlaceDetails>, GeocodeError> {
        let param = ReverseParam {
            format: "json",
            lat,
            lon: lng,
            zoom: REVERSE_ZOOM,
            addressdetails: 1,
        };
        let body = self.get("/reverse", &param).await?;

        let answer: ReverseAnswer =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Decoding(e.to_string()))?;
        match answer.address {
            Some(addr) => {
                let place = PlaceDetails::from(addr);
                debug!("place={:?}", place);
                Ok(Some(place))
            }
            None => {
                warn!("No address at ({lat}, {lng})");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<SearchHit, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let param = SearchParam {
            format: "json",
            q: query,
            limit: 1,
        };
        let body = self.get("/search", &param).await?;

        let answers: Vec<SearchAnswer> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Decoding(e.to_string()))?;
        let first = answers
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

        let bad = |s: &str| GeocodeError::Decoding(format!("bad coordinate '{s}'"));
        let lat: f64 = first.lat.parse().map_err(|_| bad(&first.lat))?;
        let lng: f64 = first.lon.parse().map_err(|_| bad(&first.lon))?;

        Ok(SearchHit {
            lat,
            lng,
            address: first.display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> Nominatim {
        let mut n = Nominatim::new();
        n.load(&GeocoderConfig {
            base_url: Some(server.base_url()),
            user_agent: None,
            timeout: Some(5),
        });
        n
    }

    #[test]
    fn test_load_config() {
        let mut n = Nominatim::new();
        assert_eq!(DEF_BASE_URL, n.base_url);

        n.load(&GeocoderConfig {
            base_url: Some("http://localhost:8080/".to_string()),
            user_agent: Some("land-office/1.0".to_string()),
            timeout: None,
        });
        assert_eq!("http://localhost:8080", n.base_url);
        assert_eq!("land-office/1.0", n.user_agent);
        assert_eq!(Duration::from_secs(DEF_TIMEOUT), n.timeout);
    }

    #[test]
    fn test_address_fallbacks() {
        let a = Address {
            suburb: Some("".to_string()),
            neighbourhood: None,
            hamlet: Some("Kothur".to_string()),
            town: Some("Shadnagar".to_string()),
            state_district: Some("Rangareddy".to_string()),
            state: Some("Telangana".to_string()),
            ..Default::default()
        };
        let p = PlaceDetails::from(a);
        assert_eq!("Kothur", p.area);
        assert_eq!("Shadnagar", p.city);
        assert_eq!("Rangareddy", p.district);
        assert_eq!("Telangana", p.state);
        assert_eq!("", p.country);
        assert_eq!("", p.postcode);
    }

    #[tokio::test]
    async fn test_reverse() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/reverse")
                    .query_param("format", "json")
                    .query_param("zoom", "18")
                    .query_param("addressdetails", "1")
                    .query_param_exists("lat")
                    .query_param_exists("lon")
                    .header("user-agent", format!("{}/{}", crate_name!(), crate_version!()));
                then.status(200).json_body(json!({
                    "display_name": "Banjara Hills, Hyderabad",
                    "address": {
                        "neighbourhood": "Banjara Hills",
                        "city": "Hyderabad",
                        "county": "Hyderabad",
                        "state": "Telangana",
                        "country": "India",
                        "postcode": "500034"
                    }
                }));
            })
            .await;

        let place = client(&server).reverse(17.41, 78.44).await;
        m.assert_async().await;

        let place = place.unwrap().unwrap();
        assert_eq!("Banjara Hills", place.area);
        assert_eq!("Hyderabad", place.city);
        assert_eq!("Hyderabad", place.district);
        assert_eq!("Telangana", place.state);
        assert_eq!("India", place.country);
        assert_eq!("500034", place.postcode);
    }

    #[tokio::test]
    async fn test_reverse_nothing_there() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/reverse");
                then.status(200).json_body(json!({"error": "Unable to geocode"}));
            })
            .await;

        let place = client(&server).reverse(0., -30.).await;
        assert_eq!(Ok(None), place);
    }

    #[tokio::test]
    async fn test_reverse_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/reverse");
                then.status(503);
            })
            .await;

        let place = client(&server).reverse(1., 1.).await;
        assert!(matches!(place, Err(GeocodeError::Transport(_))));
    }

    #[tokio::test]
    async fn test_reverse_garbage() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/reverse");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let place = client(&server).reverse(1., 1.).await;
        assert!(matches!(place, Err(GeocodeError::Decoding(_))));
    }

    #[tokio::test]
    async fn test_search() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("format", "json")
                    .query_param("q", "Warangal, Telangana")
                    .query_param("limit", "1");
                then.status(200).json_body(json!([{
                    "lat": "17.9689",
                    "lon": "79.5941",
                    "display_name": "Warangal, Telangana, India"
                }]));
            })
            .await;

        let hit = client(&server).search("  Warangal, Telangana ").await;
        m.assert_async().await;

        let hit = hit.unwrap();
        assert_eq!(17.9689, hit.lat);
        assert_eq!(79.5941, hit.lng);
        assert_eq!("Warangal, Telangana, India", hit.address);
    }

    #[tokio::test]
    async fn test_search_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(json!([]));
            })
            .await;

        let hit = client(&server).search("Atlantis").await;
        assert_eq!(Err(GeocodeError::NotFound("Atlantis".to_string())), hit);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(json!([]));
            })
            .await;

        let hit = client(&server).search("   ").await;
        assert_eq!(Err(GeocodeError::EmptyQuery), hit);
        m.assert_hits_async(0).await;
    }
}
