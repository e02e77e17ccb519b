//! Module describing all possible commands and sub-commands to the `parcelctl` main driver
//!
//! We have three main commands:
//!
//! - `area`
//! - `locate`
//! - `search`
//!
//! `area` only runs the estimation over the given corners, no network involved.
//!
//! `locate` does what the map does once four corners are clicked: it looks up the place names
//! of the centre of the parcel and computes its area, giving the data for the registration
//! form.  With `--offline` place names are left empty.
//!
//! `search` finds a place by name and shows where the map would be centred.
//!
//! `completion` is here just to configure the various shells completion system.
//!
//! Corners are given as `lat,lng` in selection order.
//!

use std::path::PathBuf;

use clap::{
    Parser, ValueEnum, crate_authors, crate_description, crate_name, crate_version,
};
use clap_complete::shells::Shell;

use parcel_engine::GeoPoint;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Verbose mode.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Hierarchical log output.
    #[clap(long)]
    pub tree: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub log_dir: Option<PathBuf>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `area POINT...`
/// `completion SHELL`
/// `list views`
/// `locate [--offline] [--json|--form] POINT...`
/// `search QUERY`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Estimate the area of a boundary
    Area(AreaOpts),
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// List map views
    List(ListOpts),
    /// Area and place names of a four-corner parcel
    Locate(LocateOpts),
    /// Find a place by name
    Search(SearchOpts),
    /// List modules versions
    Version,
}

// ------

/// Options for `area`.
///
#[derive(Debug, Parser)]
pub struct AreaOpts {
    /// Corners as lat,lng
    #[clap(required = true, num_args = 1..=4, allow_hyphen_values = true)]
    pub points: Vec<GeoPoint>,
}

// ------

/// Options for `locate`.
///
#[derive(Debug, Parser)]
pub struct LocateOpts {
    /// Do not query the geocoder.
    #[clap(long)]
    pub offline: bool,
    /// Output the full result as JSON.
    #[clap(long, conflicts_with = "form")]
    pub json: bool,
    /// Output the registration form fields as JSON.
    #[clap(long)]
    pub form: bool,
    /// Geocoder timeout in seconds.
    #[clap(short = 't', long)]
    pub timeout: Option<u64>,
    /// The four corners as lat,lng
    #[clap(required = true, num_args = 1..=4, allow_hyphen_values = true)]
    pub points: Vec<GeoPoint>,
}

// ------

/// Options for `search`.
///
#[derive(Debug, Parser)]
pub struct SearchOpts {
    /// Output as JSON.
    #[clap(long)]
    pub json: bool,
    /// Place to look for, e.g. "City, State, Country"
    #[clap(required = true)]
    pub query: Vec<String>,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}

// ------

/// All `list` sub-commands:
///
/// `list views`
///
#[derive(Debug, Parser)]
pub struct ListOpts {
    #[clap(value_parser)]
    pub cmd: ListSubCommand,
}

/// These are the sub-commands for `list`
///
#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, ValueEnum)]
pub enum ListSubCommand {
    /// List all map views and their tiles
    Views,
}
