//! Library part of the `parcelctl` utility.
//!
//! This is the command-line counterpart of the land selection map: corners are given as
//! arguments instead of clicks and the result that would go into the registration form is
//! printed.  All the work is done by `parcel-engine`.
//!

pub use cli::*;
pub use cmds::*;
pub use config::*;

mod cli;
mod cmds;
mod config;
