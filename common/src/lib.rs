//! This library is there to share some common code amongst all parcel-rs modules.
//!

mod config;
mod logging;

use clap::{crate_name, crate_version};
pub use config::*;
pub use logging::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Simple macro to generate PathBuf from a series of entries
///
#[macro_export]
macro_rules! makepath {
    ($($item:expr),+) => {
        [
        $(std::path::PathBuf::from($item),)+
        ]
        .iter()
        .collect::<std::path::PathBuf>()
    };
}
