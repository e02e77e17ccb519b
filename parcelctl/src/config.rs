use std::path::Path;

use eyre::Result;
use serde::Deserialize;
use tracing::debug;

use parcel_common::{ConfigFile, Versioned};
use parcel_engine::{GeocoderConfig, MapView};

/// Config filename
pub const CONFIG: &str = "parcelctl.hcl";
/// Current version
pub const CVERSION: usize = 1;

/// Defaults used when there is no configuration file
const BUILTIN: &str = include_str!("parcelctl.hcl");

/// Configuration for the CLI tool: geocoder access and display defaults.
///
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Config file versioning
    pub version: usize,
    /// Default map view
    #[serde(default)]
    pub view: MapView,
    /// Geocoding service
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

impl Versioned for Config {
    const VERSION: usize = CVERSION;

    fn version(&self) -> usize {
        self.version
    }
}

impl Config {
    /// Load the given file, the default one or the built-in defaults.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<Config> {
        let cfg = ConfigFile::<Config>::load(fname, CONFIG, BUILTIN)?;
        debug!("config from {:?}", cfg.origin());
        Ok(cfg.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config() {
        let cfg = ConfigFile::<Config>::parse(BUILTIN).unwrap();
        assert_eq!(CVERSION, cfg.version);
        assert_eq!(MapView::Topographic, cfg.view);
        assert_eq!(
            Some("https://nominatim.openstreetmap.org"),
            cfg.geocoder.base_url.as_deref()
        );
        assert_eq!(Some(10), cfg.geocoder.timeout);
    }

    #[test]
    fn test_minimal_config() {
        let cfg = ConfigFile::<Config>::parse("version = 1").unwrap();
        assert_eq!(MapView::Topographic, cfg.view);
        assert!(cfg.geocoder.base_url.is_none());
    }

    #[test]
    fn test_view_config() {
        let cfg = ConfigFile::<Config>::parse("version = 1\nview = \"satellite\"").unwrap();
        assert_eq!(MapView::Satellite, cfg.view);
    }

    #[test]
    fn test_bad_version() {
        assert!(ConfigFile::<Config>::parse("version = 3").is_err());
    }
}
