//! Core value types shared across the crate.

use nalgebra::{Point3, Unit, Vector3};

/// An oriented, finite right-circular cylinder.
///
/// The pose is the `center` of mass of the cylinder and the unit `axis`
/// direction; `radius` and `height` are fixed sizes (the optimizer never
/// varies them). The canonical counterpart is the unit cylinder with axis
/// +Y, radius 1, height 1, centered at the origin — see
/// [`cylinder_transform`](crate::cylinder_transform) for the mapping.
///
/// Plain value type: construct freshly per fit, copy freely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Center of the cylinder (midpoint of the axis segment).
    pub center: Point3<f64>,
    /// Unit axis direction. Sign-canonicalized by the fit driver to have a
    /// non-negative dot product with +Y.
    pub axis: Unit<Vector3<f64>>,
    /// Lateral radius. Always positive.
    pub radius: f64,
    /// Distance between the cap planes. Always positive.
    pub height: f64,
}

impl Cylinder {
    /// Create a cylinder from its pose and sizes.
    pub fn new(center: Point3<f64>, axis: Unit<Vector3<f64>>, radius: f64, height: f64) -> Self {
        Self {
            center,
            axis,
            radius,
            height,
        }
    }

    /// Half the height, the clamp bound used by the distance metric.
    pub fn half_height(&self) -> f64 {
        0.5 * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_height() {
        let cyl = Cylinder::new(
            Point3::origin(),
            Unit::new_normalize(Vector3::y()),
            1.0,
            4.0,
        );
        assert_eq!(cyl.half_height(), 2.0);
    }
}
