//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the configuration files of the
//! `parcel-rs` tools.  This is a configuration file/struct neutral loading engine, storing only
//! the base directory and with `load()` read the proper file, the default one or the built-in
//! defaults shipped with the binary.
//!
//! This encapsulates the configuration file, available with `.inner()` or `.into_inner()`.
//!

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use eyre::Result;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::makepath;

/// Main name for the directory base
const TAG: &str = "parcel-rs";

/// Every configuration file carries a version number we check against the one the code knows.
///
pub trait Versioned {
    /// Version expected by this code
    const VERSION: usize;

    /// Version found in the file
    fn version(&self) -> usize;
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Bad config file version v{0}, need v{1}")]
    BadVersion(usize, usize),
    #[error("Unknown config file {0}")]
    MissingFile(String),
}

/// Where did we get our configuration from?
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Origin {
    /// File given on the command-line or found in the default location
    File(PathBuf),
    /// Defaults compiled into the binary
    Builtin,
}

/// A loaded configuration of type `T`.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Versioned> {
    /// Where the data came from
    origin: Origin,
    inner: T,
}

/// Returns the base directory (`$HOME/.config/parcel-rs` on UNIX).
///
#[tracing::instrument]
pub fn config_dir() -> PathBuf {
    match BaseDirs::new() {
        Some(base) => {
            #[cfg(unix)]
            let base = base.home_dir().join(".config");

            #[cfg(windows)]
            let base = base.data_local_dir().to_path_buf();

            debug!("base = {base:?}");
            base.join(TAG)
        }
        None => {
            warn!("No home directory, using current one");
            makepath!(".", TAG)
        }
    }
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Versioned,
{
    /// Parse configuration data and check its version.
    ///
    #[tracing::instrument(skip(data))]
    pub fn parse(data: &str) -> Result<T> {
        let data: T = hcl::from_str(data)?;
        debug!("struct data = {data:?}");

        if data.version() != T::VERSION {
            return Err(ConfigError::BadVersion(data.version(), T::VERSION).into());
        }
        Ok(data)
    }

    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI (which must exist)
    /// - `name` in the default basedir (base on $HOME or $LOCALAPPDATA)
    /// - `builtin` string if no file is found
    ///
    #[tracing::instrument(skip(builtin))]
    pub fn load(fname: Option<&Path>, name: &str, builtin: &str) -> Result<ConfigFile<T>> {
        let basedir = config_dir();

        let (origin, data) = match fname {
            Some(fname) => {
                if !fname.exists() {
                    return Err(ConfigError::MissingFile(fname.display().to_string()).into());
                }
                let fname = fname.canonicalize()?;
                trace!("Loading config file {fname:?}");
                (Origin::File(fname.clone()), fs::read_to_string(fname)?)
            }
            None => {
                let def = basedir.join(name);
                if def.exists() {
                    trace!("Loading default config file {def:?}");
                    (Origin::File(def.clone()), fs::read_to_string(def)?)
                } else {
                    trace!("No {def:?}, using built-in defaults");
                    (Origin::Builtin, builtin.to_owned())
                }
            }
        };

        let inner = Self::parse(&data)?;
        Ok(ConfigFile {
            origin,
            inner,
        })
    }

    /// Where the configuration was read from
    ///
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Return the inner configuration
    ///
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the file and return the configuration
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Default, Deserialize)]
    struct Foo {
        version: usize,
        name: String,
    }

    impl Versioned for Foo {
        const VERSION: usize = 2;

        fn version(&self) -> usize {
            self.version
        }
    }

    const BUILTIN: &str = r##"
version = 2
name = "builtin"
"##;

    #[test_pretty_log::test]
    fn test_config_load_file() -> Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(f, "version = 2\nname = \"local\"")?;

        let cfg = ConfigFile::<Foo>::load(Some(f.path()), "foo.hcl", BUILTIN)?;
        assert_eq!("local", cfg.inner().name);
        assert!(matches!(cfg.origin(), Origin::File(_)));
        Ok(())
    }

    #[test]
    fn test_config_load_builtin() -> Result<()> {
        let cfg = ConfigFile::<Foo>::load(None, "no-such-file-for-tests.hcl", BUILTIN)?;
        assert_eq!(&Origin::Builtin, cfg.origin());
        assert_eq!("builtin", cfg.into_inner().name);
        Ok(())
    }

    #[test]
    fn test_config_missing_file() {
        let cfg = ConfigFile::<Foo>::load(
            Some(Path::new("/nonexistent/parcel.hcl")),
            "foo.hcl",
            BUILTIN,
        );
        assert!(cfg.is_err());
    }

    #[test]
    fn test_config_bad_version() {
        let cfg = ConfigFile::<Foo>::parse("version = 1\nname = \"old\"");
        let err = cfg.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::BadVersion(1, 2))
        ));
    }

    #[test]
    fn test_config_dir() {
        assert!(config_dir().ends_with(TAG));
    }
}
