//! Point-to-cylinder distance metric.
//!
//! Distance to the *lateral surface* of a finite cylinder, with the axial
//! coordinate clamped to the cap planes. For points beyond the caps this is
//! an approximation: the clamp measures against the cap-plane circle rather
//! than the true Euclidean nearest surface point. The approximation is
//! deliberate — it keeps the metric smooth almost everywhere, which the
//! second-order optimizer relies on, and matches how the objective treats
//! cap overshoot.

use nalgebra::{Point3, Unit, Vector3};

/// Distance from `point` to the lateral surface of the cylinder described
/// by `center`, `axis`, `radius`, and `height`.
///
/// Computed as: project the offset onto the axis, clamp the axial
/// coordinate to ±height/2, subtract the clamped axial component to get the
/// radial vector, then take `|‖radial‖ − radius|`.
pub fn lateral_distance(
    point: &Point3<f64>,
    center: &Point3<f64>,
    axis: &Unit<Vector3<f64>>,
    radius: f64,
    height: f64,
) -> f64 {
    let offset = point - center;
    let half = 0.5 * height;
    let t = offset.dot(axis.as_ref()).clamp(-half, half);
    let radial = offset - axis.into_inner() * t;
    (radial.norm() - radius).abs()
}

/// Batch form of [`lateral_distance`].
///
/// Clears and fills `out` with one distance per input point, reusing the
/// caller's buffer so repeated evaluation allocates nothing.
pub fn lateral_distances(
    points: &[Point3<f64>],
    center: &Point3<f64>,
    axis: &Unit<Vector3<f64>>,
    radius: f64,
    height: f64,
    out: &mut Vec<f64>,
) {
    out.clear();
    out.reserve(points.len());
    for p in points {
        out.push(lateral_distance(p, center, axis, radius, height));
    }
}
