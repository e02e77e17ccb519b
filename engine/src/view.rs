//! Map views and viewport.
//!
//! Tile layers are only described here (URL template and attribution), drawing them is the
//! client's business.  The viewport starts over India and jumps to street level once a search
//! succeeds.
//!

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{info, warn};

use crate::{GeoPoint, GeocodeError, Geocoder, SearchHit};

/// Initial map centre
pub const DEF_CENTER: GeoPoint = GeoPoint {
    lat: 20.5937,
    lng: 78.9629,
};
/// Initial zoom, whole country
pub const DEF_ZOOM: u8 = 5;
/// Zoom after a successful search
pub const FOCUS_ZOOM: u8 = 15;

/// Available base layers.  Topographic is the default as it shows village names best.
///
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    EnumIter,
    EnumString,
    Eq,
    PartialEq,
    Serialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MapView {
    #[default]
    Topographic,
    Street,
    Satellite,
    Terrain,
    Administrative,
}

impl MapView {
    /// Tile URL template (`{s}`, `{z}`, `{x}`, `{y}` placeholders).
    ///
    pub fn tile_url(&self) -> &'static str {
        match self {
            MapView::Topographic => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            MapView::Street => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            MapView::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            MapView::Terrain => {
                "https://stamen-tiles-{s}.a.ssl.fastly.net/terrain/{z}/{x}/{y}{r}.png"
            }
            MapView::Administrative => "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png",
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            MapView::Topographic => {
                "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)"
            }
            MapView::Street => "© OpenStreetMap contributors",
            MapView::Satellite => {
                "Tiles © Esri, Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, \
                 Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community"
            }
            MapView::Terrain => {
                "Map tiles by Stamen Design, CC BY 3.0, Map data © OpenStreetMap contributors"
            }
            MapView::Administrative => {
                "© OpenStreetMap contributors, Tiles style by Humanitarian OpenStreetMap Team \
                 hosted by OpenStreetMap France"
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MapView::Topographic => {
                "Elevation contours, village names and geographical features, best for rural areas."
            }
            MapView::Street => "Standard street map with roads, landmarks and basic place names.",
            MapView::Satellite => "High-resolution imagery showing actual ground features.",
            MapView::Terrain => "Physical features like hills, valleys and natural boundaries.",
            MapView::Administrative => {
                "Administrative boundaries, districts and populated places with clear labels."
            }
        }
    }
}

/// List all views in a table
///
#[tracing::instrument]
pub fn list_views() -> String {
    let header = vec!["View", "Description", "Tiles", "Attribution"];

    let mut builder = Builder::default();
    builder.push_record(header);

    MapView::iter().for_each(|v| {
        builder.push_record(vec![
            v.to_string(),
            v.description().to_string(),
            v.tile_url().to_string(),
            v.attribution().to_string(),
        ]);
    });

    let allf = builder.build().with(Style::modern()).to_string();
    format!("List all map views:\n{allf}")
}

/// What part of the map is shown.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            center: DEF_CENTER,
            zoom: DEF_ZOOM,
        }
    }
}

impl Viewport {
    /// Centre on a search result, at street level.
    ///
    pub fn focus(&mut self, hit: &SearchHit) {
        self.center = GeoPoint::new(hit.lat, hit.lng);
        self.zoom = FOCUS_ZOOM;
    }
}

/// Look for `query` and move `viewport` there.  On any failure the viewport is left alone and
/// the error returned for the user to see.
///
#[tracing::instrument(skip(geocoder))]
pub async fn search_location<G: Geocoder>(
    geocoder: &G,
    viewport: &mut Viewport,
    query: &str,
) -> Result<SearchHit, GeocodeError> {
    match geocoder.search(query).await {
        Ok(hit) => {
            info!("found {}", hit.address);
            viewport.focus(&hit);
            Ok(hit)
        }
        Err(e) => {
            warn!("search failed: {e}");
            Err(e)
        }
    }
}
