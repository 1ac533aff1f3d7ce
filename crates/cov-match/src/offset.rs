//! Perpendicular offset between two segments.

use cov_core::geodesy::{orthodromic_bearing, orthodromic_distance};
use cov_core::{Angle, Coordinates, Distance};

/// A directed great-circle segment with cached bearing and length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub start:     Coordinates,
    pub end:       Coordinates,
    pub direction: Angle,
    pub length:    Distance,
}

impl Segment {
    pub fn new(start: Coordinates, end: Coordinates) -> Self {
        Self {
            start,
            end,
            direction: orthodromic_bearing(&start, &end),
            length:    orthodromic_distance(&start, &end),
        }
    }

    /// Project `point` onto the segment.  Returns the perpendicular offset
    /// when the foot lands between the endpoints, `None` otherwise.
    pub fn project(&self, point: &Coordinates) -> Option<Distance> {
        let hypotenuse = orthodromic_distance(&self.start, point);
        let delta = orthodromic_bearing(&self.start, point) - self.direction;
        let along = hypotenuse * delta.cos();
        if along < Distance::ZERO || along > self.length {
            return None;
        }
        Some((hypotenuse * delta.sin()).abs())
    }
}

/// Smallest perpendicular offset among the four endpoint projections
/// (each endpoint of `a` onto `b` and each endpoint of `b` onto `a`).
///
/// `None` when no projection lands on its segment, which is different from
/// a genuine zero offset.
pub fn min_leg_offset(a: &Segment, b: &Segment) -> Option<Distance> {
    [b.project(&a.start), b.project(&a.end), a.project(&b.start), a.project(&b.end)]
        .into_iter()
        .flatten()
        .reduce(Distance::min)
}
