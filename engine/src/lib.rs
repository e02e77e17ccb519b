//! Engine behind the land selection tool.
//!
//! A parcel is outlined by clicking its four corners on a map.  Once the boundary is complete
//! its centre is reverse-geocoded to get place names and its area is estimated; both are
//! packed into a `LocationResult` for the registration form.
//!
//! - `collector`: the boundary being selected, capped at four points
//! - `area`: planar shoelace estimation in square yards
//! - `geocode`: the `Geocoder` trait and the Nominatim client
//! - `selection`: the session tying them together, dropping stale lookups
//! - `view`: map layers and viewport, including search
//!

mod area;
mod collector;
mod error;
mod geocode;
mod point;
mod selection;
mod view;

use clap::{crate_name, crate_version};

pub use area::*;
pub use collector::*;
pub use error::*;
pub use geocode::*;
pub use point::*;
pub use selection::*;
pub use view::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
