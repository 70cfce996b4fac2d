//! The regularized fitting objective.
//!
//! Loss over the six free parameters p = (center, direction vector):
//!
//! ```text
//! loss(p) = Σ dᵢ(p)²  +  λ · ‖centroid − center‖
//! ```
//!
//! where dᵢ is the lateral-surface distance of point i and the second term
//! anchors the center to the (precomputed) cloud centroid. The anchor
//! prevents the center drifting along the axis, where the lateral distance
//! alone is insensitive. λ defaults to 1000 and is configurable through
//! [`FitParams::with_centroid_weight`](crate::FitParams::with_centroid_weight).
//!
//! Radius and height are fixed for the whole minimization; only the pose
//! varies.

use nalgebra::{Point3, Vector3, Vector6};

use crate::axis::rodrigues_axis;
use crate::cloud;
use crate::distance::lateral_distance;
use crate::solver::Objective;

/// Default weight of the centroid anchor term.
pub const DEFAULT_CENTROID_WEIGHT: f64 = 1000.0;

/// Sum-of-squared-distance objective with a centroid anchor.
///
/// Borrows the point cloud for the duration of the minimization; the cloud
/// is never copied or mutated.
pub struct CylinderObjective<'a> {
    points: &'a [Point3<f64>],
    centroid: Point3<f64>,
    radius: f64,
    height: f64,
    centroid_weight: f64,
}

impl<'a> CylinderObjective<'a> {
    /// Build the objective over `points` with fixed sizes.
    ///
    /// The cloud centroid is computed once here, not per evaluation. The
    /// cloud must be non-empty (the driver validates this before
    /// construction).
    pub fn new(
        points: &'a [Point3<f64>],
        radius: f64,
        height: f64,
        centroid_weight: f64,
    ) -> Self {
        let centroid = cloud::centroid(points).unwrap_or_else(Point3::origin);
        Self {
            points,
            centroid,
            radius,
            height,
            centroid_weight,
        }
    }

    /// The precomputed cloud centroid the anchor term pulls toward.
    pub fn centroid(&self) -> Point3<f64> {
        self.centroid
    }
}

impl Objective for CylinderObjective<'_> {
    fn evaluate(&self, params: &Vector6<f64>) -> f64 {
        let center = Point3::new(params[0], params[1], params[2]);
        let direction = Vector3::new(params[3], params[4], params[5]);
        let axis = rodrigues_axis(&direction);

        let mut sum = 0.0;
        for point in self.points {
            let d = lateral_distance(point, &center, &axis, self.radius, self.height);
            sum += d * d;
        }
        sum + self.centroid_weight * (self.centroid - center).norm()
    }
}
