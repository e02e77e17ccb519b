//! This is the module handling the `locate` sub-command.
//!

use std::time::Duration;

use eyre::{Result, eyre};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{info, trace};

use parcel_engine::{
    DEF_TIMEOUT, Geocoder, LocationResult, Nominatim, Offline, Resolution, Selection,
};

use crate::{Config, LocateOpts};

/// Select the corners, look up the place names and compute the area.
///
#[tracing::instrument(skip(cfg))]
pub async fn locate_parcel(cfg: &Config, lopts: &LocateOpts) -> Result<LocationResult> {
    trace!("locate_parcel({} points)", lopts.points.len());

    let mut sel = Selection::new();
    lopts.points.iter().for_each(|p| {
        sel.add_point(*p);
    });

    if !sel.boundary().is_complete() {
        return Err(eyre!(
            "Boundary incomplete ({} points selected), all 4 corners are needed",
            sel.boundary().progress()
        ));
    }

    let wait = lopts
        .timeout
        .or(cfg.geocoder.timeout)
        .unwrap_or(DEF_TIMEOUT);
    let wait = Duration::from_secs(wait);

    let res = if lopts.offline {
        resolve(&mut sel, &Offline, wait).await
    } else {
        let mut geo = Nominatim::new();
        geo.load(&cfg.geocoder);
        resolve(&mut sel, &geo, wait).await
    };

    match res {
        Some(Resolution::Located(result)) => Ok(result),
        Some(Resolution::Degraded { result, error }) => {
            if !lopts.offline {
                eprintln!("Place names unavailable: {error}");
            }
            Ok(result)
        }
        Some(Resolution::Stale) | None => Err(eyre!("No location lookup for this boundary")),
    }
}

async fn resolve<G: Geocoder>(
    sel: &mut Selection,
    geocoder: &G,
    wait: Duration,
) -> Option<Resolution> {
    info!("Looking up place names with {}", geocoder.name());
    sel.locate(geocoder, wait).await
}

/// Display a result as a table
///
pub fn render_location(r: &LocationResult) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);

    builder.push_record(["Area".to_string(), r.area.clone()]);
    builder.push_record(["City".to_string(), r.city.clone()]);
    builder.push_record(["District".to_string(), r.district.clone()]);
    builder.push_record(["State".to_string(), r.state.clone()]);
    builder.push_record(["Area (sq yd)".to_string(), r.area_sq_yd.to_string()]);
    builder.push_record(["Centre".to_string(), r.center_coordinates.to_string()]);
    r.coordinates
        .points()
        .iter()
        .enumerate()
        .for_each(|(i, p)| builder.push_record([format!("Point {}", i + 1), p.to_string()]));

    builder.build().with(Style::modern()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_engine::GeoPoint;

    fn opts(points: Vec<GeoPoint>) -> LocateOpts {
        LocateOpts {
            offline: true,
            json: false,
            form: false,
            timeout: None,
            points,
        }
    }

    fn square() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0., 0.),
            GeoPoint::new(0., 0.001),
            GeoPoint::new(0.001, 0.001),
            GeoPoint::new(0.001, 0.),
        ]
    }

    #[tokio::test]
    async fn test_locate_offline() {
        let r = locate_parcel(&Config::default(), &opts(square())).await.unwrap();
        assert_eq!(14821, r.area_sq_yd);
        assert_eq!("", r.city);

        let s = render_location(&r);
        assert!(s.contains("14821"));
        assert!(s.contains("Point 4"));
    }

    #[tokio::test]
    async fn test_locate_incomplete() {
        let r = locate_parcel(&Config::default(), &opts(square()[..3].to_vec())).await;
        assert!(r.is_err());
    }
}
