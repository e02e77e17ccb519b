//! This is the module handling the `area` sub-command.
//!

use tracing::{info, trace};

use parcel_engine::{BoundarySet, estimate_area_sq_yd};

use crate::AreaOpts;

/// Area of the given corners, in square yards.
///
#[tracing::instrument]
pub fn area_of(aopts: &AreaOpts) -> u64 {
    trace!("area_of({} points)", aopts.points.len());

    let set = aopts
        .points
        .iter()
        .fold(BoundarySet::new(), |set, p| set.add_point(*p));
    if !set.is_complete() {
        info!("only {} corners", set.progress());
    }
    estimate_area_sq_yd(set.points())
}
