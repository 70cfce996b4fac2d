//! Canonical-to-fitted similarity transform.
//!
//! Maps the canonical unit cylinder (axis +Y, radius 1, height 1, centered
//! at the origin) onto a fitted cylinder as Translation · Rotation · Scale.
//! The rotation takes +Y to the fitted axis via Rodrigues' formula, with
//! exact fast paths for the aligned and anti-aligned cases.

use nalgebra::{Matrix3, Matrix4, Unit, Vector3};

use crate::error::{FitError, FitResult};
use crate::types::Cylinder;

/// Tolerance on |cos − 1| inside which an axis is treated as exactly
/// aligned (or anti-aligned) with +Y.
///
/// Wide enough that the general branch never sees sin² anywhere near
/// rounding noise: at the band edge sin² is still ~2e-9.
pub const ALIGNMENT_TOLERANCE: f64 = 1e-9;

/// Floor on sin² in the general rotation branch. Falling below it despite
/// the aligned-case checks is reported, never divided through.
const MIN_SINE_SQ: f64 = 1e-12;

/// Rotation matrix taking +Y to `axis`.
///
/// Exact branches: identity when `axis` ≈ +Y, diag(1, −1, −1) when
/// `axis` ≈ −Y (a 180° rotation about +X; any rotation flipping Y works,
/// this one is the fixed convention). Otherwise Rodrigues' formula
/// `R = I + V + V²·(1−cos)/sin²` where V is the cross-product matrix of
/// +Y × axis.
pub fn rotation_from_y_axis(axis: &Unit<Vector3<f64>>) -> FitResult<Matrix3<f64>> {
    let y = Vector3::y();
    let target = axis.into_inner();
    let cos = y.dot(&target);

    if (cos - 1.0).abs() < ALIGNMENT_TOLERANCE {
        return Ok(Matrix3::identity());
    }
    if (cos + 1.0).abs() < ALIGNMENT_TOLERANCE {
        return Ok(Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, -1.0)));
    }

    let v = y.cross(&target);
    let sine_sq = v.norm_squared();
    if sine_sq < MIN_SINE_SQ {
        return Err(FitError::numeric_degeneracy(sine_sq));
    }

    let vx = Matrix3::new(
        0.0, -v.z, v.y, //
        v.z, 0.0, -v.x, //
        -v.y, v.x, 0.0,
    );
    Ok(Matrix3::identity() + vx + vx * vx * ((1.0 - cos) / sine_sq))
}

/// Homogeneous transform mapping the canonical unit cylinder onto
/// `cylinder`: T(center) · R(+Y → axis) · S(radius, height, radius).
///
/// The y scale is the full height because the canonical cylinder has unit
/// height (spanning y ∈ [−1/2, 1/2]).
pub fn cylinder_transform(cylinder: &Cylinder) -> FitResult<Matrix4<f64>> {
    let rotation = rotation_from_y_axis(&cylinder.axis)?;
    let scale = Vector3::new(cylinder.radius, cylinder.height, cylinder.radius);

    let mut m = Matrix4::identity();
    for i in 0..3 {
        for j in 0..3 {
            m[(i, j)] = rotation[(i, j)] * scale[j];
        }
        m[(i, 3)] = cylinder.center[i];
    }
    Ok(m)
}
