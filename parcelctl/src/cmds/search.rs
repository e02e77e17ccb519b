//! This is the module handling the `search` sub-command.
//!

use eyre::Result;
use tracing::trace;

use parcel_engine::{Nominatim, SearchHit, Viewport, search_location};

use crate::{Config, SearchOpts};

/// Look for a place and return it with the viewport centred on it.
///
#[tracing::instrument(skip(cfg))]
pub async fn search_place(cfg: &Config, sopts: &SearchOpts) -> Result<(SearchHit, Viewport)> {
    let query = sopts.query.join(" ");
    trace!("search_place({query})");

    let mut geo = Nominatim::new();
    geo.load(&cfg.geocoder);

    let mut viewport = Viewport::default();
    let hit = search_location(&geo, &mut viewport, &query).await?;
    Ok((hit, viewport))
}
