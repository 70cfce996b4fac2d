//! Axis parameterization.
//!
//! The optimizer works on an unconstrained 3-vector (a Rodrigues-style
//! direction vector) whose *direction only* encodes the cylinder axis; its
//! magnitude carries no information. This keeps the parameter space free of
//! unit-norm constraints at the cost of a many-to-one mapping (any positive
//! scaling of the vector, and the sign flip, describe the same unoriented
//! axis). The fit driver canonicalizes the sign after convergence.

use nalgebra::{Unit, Vector3};

/// Norm below which a direction vector is considered degenerate and the
/// fallback axis is returned instead.
pub const AXIS_EPSILON: f64 = 1e-14;

/// Canonical fallback axis (+Y), also the canonical cylinder axis.
///
/// Every degenerate-direction path in the crate falls back to this single
/// constant so that callers see one deterministic convention.
pub fn default_axis() -> Unit<Vector3<f64>> {
    Unit::new_unchecked(Vector3::y())
}

/// Convert a direction vector to a unit axis.
///
/// Returns [`default_axis`] when the vector's norm is below
/// [`AXIS_EPSILON`] (the origin is a singularity of the parameterization),
/// otherwise the normalized vector.
pub fn rodrigues_axis(direction: &Vector3<f64>) -> Unit<Vector3<f64>> {
    let norm = direction.norm();
    if norm < AXIS_EPSILON {
        default_axis()
    } else {
        Unit::new_unchecked(direction / norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_vector_falls_back_to_y() {
        let axis = rodrigues_axis(&Vector3::zeros());
        assert_relative_eq!(axis.into_inner(), Vector3::y());

        let axis = rodrigues_axis(&Vector3::new(1e-15, -1e-16, 1e-15));
        assert_relative_eq!(axis.into_inner(), Vector3::y());
    }

    #[test]
    fn test_normalization() {
        let axis = rodrigues_axis(&Vector3::new(3.0, 0.0, 4.0));
        assert_relative_eq!(axis.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(axis.x, 0.6, epsilon = 1e-12);
        assert_relative_eq!(axis.z, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_magnitude_is_ignored() {
        let a = rodrigues_axis(&Vector3::new(0.2, 1.0, -0.3));
        let b = rodrigues_axis(&(Vector3::new(0.2, 1.0, -0.3) * 250.0));
        assert_relative_eq!(a.into_inner(), b.into_inner(), epsilon = 1e-12);
    }
}
