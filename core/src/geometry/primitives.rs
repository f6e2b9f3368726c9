//! Distance-based predicates over discs.
//!
//! These are the only geometric tests the region engine needs: two discs
//! overlap when their centres are strictly closer than the sum of their
//! radii, so touching outlines never form a region.

use super::{dist_sq, Point2};
use nalgebra as na;
use serde::{Deserialize, Serialize};

/// A positioned disc. Circles in a diagram expose their geometry as one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub center: Point2,
    pub radius: f64,
}

impl Disc {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Returns a description of what makes this disc unusable, if anything.
    pub fn defect(&self) -> Option<&'static str> {
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Some("center is not finite");
        }
        if self.radius.is_nan() {
            return Some("radius is NaN");
        }
        if !self.radius.is_finite() {
            return Some("radius is not finite");
        }
        if self.radius < 0.0 {
            return Some("radius is negative");
        }
        None
    }
}

/// True iff the centre distance is strictly less than the summed radii.
#[inline]
pub fn overlaps(a: &Disc, b: &Disc) -> bool {
    na::distance(&a.center, &b.center) < a.radius + b.radius
}

/// Inclusive point-in-disc test.
#[inline]
pub fn contains_point(disc: &Disc, point: &Point2) -> bool {
    dist_sq(point, &disc.center) <= disc.radius * disc.radius
}

/// True iff `point` lies within `tolerance` of the disc's outline, on either side.
#[inline]
pub fn near_edge(disc: &Disc, point: &Point2, tolerance: f64) -> bool {
    (na::distance(point, &disc.center) - disc.radius).abs() < tolerance
}
