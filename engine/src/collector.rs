//! Point collection for a parcel boundary.
//!
//! `BoundarySet` is a plain value: every operation returns a new set and the cap of
//! `MAX_POINTS` is enforced there.  `PointCollector` owns the current set and a generation
//! number that changes on every effective mutation, which is what asynchronous lookups are
//! tagged with.
//!
//! States are:
//!
//! ```text
//! EMPTY --add--> PARTIAL(1..3) --add--> COMPLETE --add--> COMPLETE (no-op)
//!   ^               |  ^                    |
//!   +----undo-------+  +-------undo---------+
//! any --clear--> EMPTY
//! ```
//!

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{GeoPoint, PointError};

/// A parcel is outlined by four corners.
pub const MAX_POINTS: usize = 4;

/// Where we are in the selection.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundaryState {
    Empty,
    Partial(usize),
    Complete,
}

/// Ordered boundary vertices, insertion order being the polygon winding order.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "Vec<GeoPoint>", into = "Vec<GeoPoint>")]
pub struct BoundarySet {
    points: Vec<GeoPoint>,
}

impl TryFrom<Vec<GeoPoint>> for BoundarySet {
    type Error = PointError;

    fn try_from(points: Vec<GeoPoint>) -> Result<Self, Self::Error> {
        if points.len() > MAX_POINTS {
            return Err(PointError::TooManyPoints(points.len(), MAX_POINTS));
        }
        Ok(BoundarySet { points })
    }
}

impl From<BoundarySet> for Vec<GeoPoint> {
    fn from(set: BoundarySet) -> Self {
        set.points
    }
}

impl BoundarySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `p`, unless the set is already complete in which case nothing changes.
    ///
    pub fn add_point(&self, p: GeoPoint) -> BoundarySet {
        let mut next = self.clone();
        if next.points.len() < MAX_POINTS {
            next.points.push(p);
        }
        next
    }

    /// Remove the last point, no-op on an empty set.
    ///
    pub fn undo_last(&self) -> BoundarySet {
        let mut next = self.clone();
        next.points.pop();
        next
    }

    pub fn clear(&self) -> BoundarySet {
        BoundarySet::default()
    }

    pub fn state(&self) -> BoundaryState {
        match self.points.len() {
            0 => BoundaryState::Empty,
            MAX_POINTS => BoundaryState::Complete,
            n => BoundaryState::Partial(n),
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state() == BoundaryState::Complete
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Polygon to draw on the map, only once there are at least three corners.
    ///
    pub fn outline(&self) -> Option<&[GeoPoint]> {
        if self.points.len() >= 3 {
            Some(&self.points)
        } else {
            None
        }
    }

    /// "n/4" progress string.
    ///
    pub fn progress(&self) -> String {
        format!("{}/{}", self.points.len(), MAX_POINTS)
    }
}

impl Display for BoundarySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, p) in self.points.iter().enumerate() {
            writeln!(f, "Point {}: {}", i + 1, p)?;
        }
        Ok(())
    }
}

/// What a mutation did, from the point of view of whoever derives data from the set.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Change {
    /// Nothing happened
    Unchanged,
    /// Set changed but is (still) incomplete
    Updated,
    /// Set just became complete, derived data must be computed
    Completed,
    /// Set was complete and is not anymore, derived data is void
    Invalidated,
}

/// Owner of the boundary being selected.
///
#[derive(Debug, Default)]
pub struct PointCollector {
    set: BoundarySet,
    generation: u64,
}

impl PointCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation, bumped by every mutation which is not a no-op.
    ///
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn boundary(&self) -> &BoundarySet {
        &self.set
    }

    #[tracing::instrument(skip(self))]
    pub fn add_point(&mut self, p: GeoPoint) -> Change {
        if self.set.is_complete() {
            trace!("boundary complete, ignoring {p}");
            return Change::Unchanged;
        }
        self.replace(self.set.add_point(p));
        if self.set.is_complete() {
            debug!("boundary complete, generation {}", self.generation);
            Change::Completed
        } else {
            Change::Updated
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn undo_last(&mut self) -> Change {
        if self.set.is_empty() {
            return Change::Unchanged;
        }
        let was_complete = self.set.is_complete();
        self.replace(self.set.undo_last());
        if was_complete {
            Change::Invalidated
        } else {
            Change::Updated
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn clear(&mut self) -> Change {
        if self.set.is_empty() {
            return Change::Unchanged;
        }
        let was_complete = self.set.is_complete();
        self.replace(self.set.clear());
        if was_complete {
            Change::Invalidated
        } else {
            Change::Updated
        }
    }

    fn replace(&mut self, set: BoundarySet) {
        self.set = set;
        self.generation += 1;
        trace!("{} points, generation {}", self.set.len(), self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn pt(i: usize) -> GeoPoint {
        GeoPoint::new(i as f64, -(i as f64))
    }

    fn filled(n: usize) -> BoundarySet {
        (0..n).fold(BoundarySet::new(), |s, i| s.add_point(pt(i)))
    }

    #[rstest]
    #[case(0, BoundaryState::Empty)]
    #[case(1, BoundaryState::Partial(1))]
    #[case(3, BoundaryState::Partial(3))]
    #[case(4, BoundaryState::Complete)]
    #[case(7, BoundaryState::Complete)]
    fn test_state(#[case] n: usize, #[case] want: BoundaryState) {
        assert_eq!(want, filled(n).state());
    }

    #[test]
    fn test_deserialize_capped() {
        let two = r#"[{"lat":1,"lng":2},{"lat":3,"lng":4}]"#;
        let s: BoundarySet = serde_json::from_str(two).unwrap();
        assert_eq!(BoundaryState::Partial(2), s.state());

        let five = serde_json::to_string(&vec![pt(0); 5]).unwrap();
        let err = serde_json::from_str::<BoundarySet>(&five).unwrap_err();
        assert!(err.to_string().contains("5 points given"));
    }

    #[test]
    fn test_serialize_as_list() {
        let json = serde_json::to_value(filled(2)).unwrap();
        assert_eq!(2, json.as_array().unwrap().len());
        assert_eq!(1., json[1]["lat"]);
    }

    #[test]
    fn test_add_keeps_order() {
        let s = filled(3);
        assert_eq!(&[pt(0), pt(1), pt(2)], s.points());
    }

    #[test]
    fn test_fifth_point_ignored() {
        let s = filled(4);
        assert_eq!(s, s.add_point(pt(99)));
    }

    #[test]
    fn test_undo_empty() {
        let s = BoundarySet::new();
        assert_eq!(s, s.undo_last());
    }

    #[test]
    fn test_outline_and_progress() {
        assert!(filled(2).outline().is_none());
        assert_eq!(Some(3), filled(3).outline().map(|o| o.len()));
        assert_eq!("2/4", filled(2).progress());
    }

    #[test]
    fn test_display() {
        let s = BoundarySet::new().add_point(GeoPoint::new(1., 2.));
        assert_eq!("Point 1: 1.000000, 2.000000\n", s.to_string());
    }

    #[test]
    fn test_collector_transitions() {
        let mut c = PointCollector::new();
        assert_eq!(Change::Unchanged, c.undo_last());
        assert_eq!(Change::Unchanged, c.clear());
        assert_eq!(0, c.generation());

        for i in 0..3 {
            assert_eq!(Change::Updated, c.add_point(pt(i)));
        }
        assert_eq!(Change::Completed, c.add_point(pt(3)));
        let g = c.generation();

        assert_eq!(Change::Unchanged, c.add_point(pt(4)));
        assert_eq!(g, c.generation());

        assert_eq!(Change::Invalidated, c.undo_last());
        assert_eq!(BoundaryState::Partial(3), c.boundary().state());
        assert_eq!(Change::Updated, c.undo_last());
        assert_eq!(Change::Updated, c.clear());
        assert!(c.boundary().is_empty());
    }

    #[test]
    fn test_collector_clear_complete() {
        let mut c = PointCollector::new();
        (0..4).for_each(|i| {
            c.add_point(pt(i));
        });
        assert_eq!(Change::Invalidated, c.clear());
        assert_eq!(BoundaryState::Empty, c.boundary().state());
    }

    #[test]
    fn test_generation_changes_on_reselect() {
        let mut c = PointCollector::new();
        (0..4).for_each(|i| {
            c.add_point(pt(i));
        });
        let g = c.generation();
        c.undo_last();
        assert_eq!(Change::Completed, c.add_point(pt(3)));
        assert_ne!(g, c.generation());
    }

    fn any_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..90.0, -180.0f64..180.0).prop_map(|(lat, lng)| GeoPoint::new(lat, lng))
    }

    proptest! {
        #[test]
        fn test_cap_invariant(pts in prop::collection::vec(any_point(), 0..12)) {
            let mut s = BoundarySet::new();
            for p in pts {
                s = s.add_point(p);
                prop_assert!(s.len() <= MAX_POINTS);
            }
        }

        #[test]
        fn test_undo_symmetry(n in 0usize..4, p in any_point()) {
            let s = filled(n);
            prop_assert_eq!(s.clone(), s.add_point(p).undo_last());
        }

        #[test]
        fn test_clear_idempotent(n in 0usize..6) {
            let s = filled(n);
            prop_assert_eq!(s.clear().clear(), s.clear());
            prop_assert!(s.clear().is_empty());
        }
    }
}
