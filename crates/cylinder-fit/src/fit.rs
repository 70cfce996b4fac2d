//! Cylinder fitting driver.
//!
//! Orchestrates a full fit: validate the cloud, derive fixed sizes and an
//! initial pose, minimize the regularized objective, then recover and
//! canonicalize the axis. Sizes come from a pluggable [`SizeHeuristic`]
//! (bounding-box based by default) and the minimizer is the pluggable
//! [`Minimizer`] seam, so both strategies can be swapped without touching
//! the driver.

use std::time::Duration;

use nalgebra::{Point3, Unit, Vector3, Vector6};
use tracing::debug;

use crate::axis::{default_axis, rodrigues_axis};
use crate::cloud;
use crate::error::{FitError, FitResult};
use crate::objective::{CylinderObjective, DEFAULT_CENTROID_WEIGHT};
use crate::solver::{Minimizer, NewtonSolver};
use crate::tracing_ext::{log_cloud_stats, log_fit_result, OperationTimer};
use crate::types::Cylinder;

/// Extent below which a bounding-box dimension is treated as collapsed.
const MIN_EXTENT: f64 = 1e-9;

/// Parameters controlling a cylinder fit.
///
/// # Example
///
/// ```rust
/// use cylinder_fit::FitParams;
///
/// let params = FitParams::new()
///     .with_max_iterations(50)
///     .with_tolerance(1e-6);
/// assert_eq!(params.max_iterations, 50);
/// ```
#[derive(Debug, Clone)]
pub struct FitParams {
    /// Convergence threshold on the optimizer step norm.
    pub tolerance: f64,
    /// Hard cap on optimizer iterations.
    pub max_iterations: usize,
    /// Optional wall-clock budget for the minimization.
    pub max_duration: Option<Duration>,
    /// Weight of the centroid anchor term in the objective.
    pub centroid_weight: f64,
    /// Explicit (radius, height) override, bypassing the size heuristic.
    pub size_override: Option<(f64, f64)>,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 200,
            max_duration: None,
            centroid_weight: DEFAULT_CENTROID_WEIGHT,
            size_override: None,
        }
    }
}

impl FitParams {
    /// Create parameters with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set an optional wall-clock budget.
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    /// Set the centroid anchor weight.
    pub fn with_centroid_weight(mut self, centroid_weight: f64) -> Self {
        self.centroid_weight = centroid_weight;
        self
    }

    /// Fix radius and height explicitly instead of deriving them from the
    /// size heuristic.
    pub fn with_size(mut self, radius: f64, height: f64) -> Self {
        self.size_override = Some((radius, height));
        self
    }
}

/// Fixed cylinder sizes plus the initial center derived from the cloud.
#[derive(Debug, Clone, Copy)]
pub struct SizeEstimate {
    /// Initial center guess.
    pub center: Point3<f64>,
    /// Fixed lateral radius.
    pub radius: f64,
    /// Fixed height.
    pub height: f64,
}

/// Strategy for deriving fixed sizes and an initial center from a cloud.
///
/// The default is [`BoundingBoxHeuristic`]; domains with better priors
/// (known part dimensions, upstream segmentation metadata) can substitute
/// their own.
pub trait SizeHeuristic {
    /// Estimate sizes, or fail if the cloud cannot support a fit.
    fn estimate(&self, points: &[Point3<f64>]) -> FitResult<SizeEstimate>;
}

/// Bounding-box size heuristic.
///
/// Center = box midpoint, radius = half the larger of the x/y extents,
/// height = y extent. The axis choices are a fixed convention tied to the
/// +Y initial-axis guess, not derived from principal axes; the estimate is
/// exact for squat, axis-aligned clouds and a starting point everywhere
/// else.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBoxHeuristic;

impl SizeHeuristic for BoundingBoxHeuristic {
    fn estimate(&self, points: &[Point3<f64>]) -> FitResult<SizeEstimate> {
        let bounds = cloud::bounds(points)
            .ok_or_else(|| FitError::empty_cloud("cannot derive a bounding box"))?;
        let extents = cloud::extents(&bounds);

        let radius = 0.5 * extents.x.max(extents.y);
        let height = extents.y;
        if radius <= MIN_EXTENT {
            return Err(FitError::degenerate_input(format!(
                "x/y extents ({:.3e}, {:.3e}) give a near-zero radius",
                extents.x, extents.y
            )));
        }
        if height <= MIN_EXTENT {
            return Err(FitError::degenerate_input(format!(
                "y extent {:.3e} gives a near-zero height",
                extents.y
            )));
        }

        Ok(SizeEstimate {
            center: Point3::from(0.5 * (bounds.0.coords + bounds.1.coords)),
            radius,
            height,
        })
    }
}

/// Result of a successful cylinder fit.
#[derive(Debug, Clone, Copy)]
pub struct CylinderFit {
    /// The fitted cylinder.
    pub cylinder: Cylinder,
    /// Objective value at convergence.
    pub final_loss: f64,
    /// Optimizer iterations consumed.
    pub iterations: usize,
    /// Whether the convergence criterion was met.
    pub converged: bool,
}

/// Fit a cylinder to a point cloud with the default solver and size
/// heuristic.
///
/// # Example
///
/// ```rust
/// use cylinder_fit::{fit_cylinder, FitParams};
/// use nalgebra::Point3;
/// use std::f64::consts::TAU;
///
/// // Points sampled on the lateral surface of a squat cylinder.
/// let mut points = Vec::new();
/// for i in 0..48 {
///     let theta = i as f64 / 48.0 * TAU;
///     for k in 0..6 {
///         let y = -0.75 + 1.5 * k as f64 / 5.0;
///         points.push(Point3::new(theta.cos(), y, theta.sin()));
///     }
/// }
///
/// let fit = fit_cylinder(&points, &FitParams::default()).unwrap();
/// assert!(fit.converged);
/// assert!(fit.final_loss < 1e-6);
/// ```
pub fn fit_cylinder(points: &[Point3<f64>], params: &FitParams) -> FitResult<CylinderFit> {
    let solver = NewtonSolver::new()
        .with_tolerance(params.tolerance)
        .with_max_iterations(params.max_iterations)
        .with_max_duration(params.max_duration);
    fit_cylinder_with(points, params, &solver, &BoundingBoxHeuristic)
}

/// Fit a cylinder with an explicit solver and size heuristic.
pub fn fit_cylinder_with(
    points: &[Point3<f64>],
    params: &FitParams,
    solver: &dyn Minimizer,
    heuristic: &dyn SizeHeuristic,
) -> FitResult<CylinderFit> {
    let _timer = OperationTimer::with_context("fit_cylinder", points.len());
    log_cloud_stats(points, "fit input");

    let estimate = heuristic.estimate(points)?;
    let (radius, height) = match params.size_override {
        Some((radius, height)) => {
            if radius <= 0.0 || height <= 0.0 {
                return Err(FitError::degenerate_input(format!(
                    "size override (radius {radius}, height {height}) must be positive"
                )));
            }
            (radius, height)
        }
        None => (estimate.radius, estimate.height),
    };

    debug!(
        target: "cylinder_fit::fit",
        points = points.len(),
        radius = format!("{:.4}", radius),
        height = format!("{:.4}", height),
        center = format!(
            "({:.4}, {:.4}, {:.4})",
            estimate.center.x, estimate.center.y, estimate.center.z
        ),
        "Initial guess"
    );

    let objective = CylinderObjective::new(points, radius, height, params.centroid_weight);
    let initial = Vector6::new(
        estimate.center.x,
        estimate.center.y,
        estimate.center.z,
        0.0,
        1.0,
        0.0,
    );

    let outcome = solver.minimize(&objective, initial)?;
    if !outcome.params.iter().all(|v| v.is_finite()) || !outcome.loss.is_finite() {
        return Err(FitError::optimization_failure(
            "solver returned non-finite parameters",
            outcome.loss,
            outcome.iterations,
        ));
    }

    let center = Point3::new(outcome.params[0], outcome.params[1], outcome.params[2]);
    let direction = Vector3::new(outcome.params[3], outcome.params[4], outcome.params[5]);
    let mut axis = rodrigues_axis(&direction);

    // The metric cannot distinguish an axis from its negation; pick the
    // representative with non-negative dot against the +Y initial guess so
    // repeated fits of the same cloud agree.
    if axis.into_inner().dot(&default_axis().into_inner()) < 0.0 {
        axis = Unit::new_unchecked(-axis.into_inner());
    }

    let fit = CylinderFit {
        cylinder: Cylinder::new(center, axis, radius, height),
        final_loss: outcome.loss,
        iterations: outcome.iterations,
        converged: outcome.converged,
    };
    log_fit_result(&fit);
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{MinimizeOutcome, Objective};
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    fn squat_cloud() -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for i in 0..32 {
            let theta = i as f64 / 32.0 * TAU;
            for k in 0..5 {
                let y = -0.75 + 1.5 * k as f64 / 4.0;
                points.push(Point3::new(theta.cos(), y, theta.sin()));
            }
        }
        points
    }

    #[test]
    fn test_bounding_box_heuristic() {
        let estimate = BoundingBoxHeuristic.estimate(&squat_cloud()).unwrap();
        assert_relative_eq!(estimate.radius, 1.0, epsilon = 1e-9);
        assert_relative_eq!(estimate.height, 1.5, epsilon = 1e-9);
        assert_relative_eq!(estimate.center.coords, Vector3::zeros(), epsilon = 1e-9);
    }

    #[test]
    fn test_heuristic_radius_uses_x_y_extents() {
        // Radius comes from the larger of the x and y extents, never z,
        // matching the fixed +Y-guess convention.
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 4.0, 3.0),
            Point3::new(0.5, 2.0, 1.5),
        ];
        let estimate = BoundingBoxHeuristic.estimate(&points).unwrap();
        assert_relative_eq!(estimate.radius, 2.0, epsilon = 1e-12);
        assert_relative_eq!(estimate.height, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_heuristic_rejects_empty_cloud() {
        let err = BoundingBoxHeuristic.estimate(&[]).unwrap_err();
        assert!(matches!(err, FitError::EmptyCloud { .. }));
    }

    #[test]
    fn test_heuristic_rejects_collapsed_cloud() {
        let points = vec![Point3::new(1.0, 2.0, 3.0); 50];
        let err = BoundingBoxHeuristic.estimate(&points).unwrap_err();
        assert!(matches!(err, FitError::DegenerateInput { .. }));
    }

    #[test]
    fn test_negative_size_override_is_rejected() {
        let params = FitParams::new().with_size(-1.0, 2.0);
        let err = fit_cylinder(&squat_cloud(), &params).unwrap_err();
        assert!(matches!(err, FitError::DegenerateInput { .. }));
    }

    #[test]
    fn test_params_builder_defaults() {
        let params = FitParams::default();
        assert_relative_eq!(params.tolerance, 1e-5);
        assert_eq!(params.max_iterations, 200);
        assert!(params.max_duration.is_none());
        assert_relative_eq!(params.centroid_weight, 1000.0);
        assert!(params.size_override.is_none());
    }

    /// A minimizer stub that returns its input untouched, for exercising
    /// the driver seam without real optimization.
    struct IdentityMinimizer;

    impl Minimizer for IdentityMinimizer {
        fn minimize(
            &self,
            objective: &dyn Objective,
            initial: Vector6<f64>,
        ) -> FitResult<MinimizeOutcome> {
            Ok(MinimizeOutcome {
                params: initial,
                loss: objective.evaluate(&initial),
                iterations: 0,
                converged: true,
            })
        }
    }

    #[test]
    fn test_driver_accepts_substitute_minimizer() {
        let points = squat_cloud();
        let fit = fit_cylinder_with(
            &points,
            &FitParams::default(),
            &IdentityMinimizer,
            &BoundingBoxHeuristic,
        )
        .unwrap();
        // The cloud is already posed, so the untouched initial guess is the
        // exact answer.
        assert_relative_eq!(fit.cylinder.center.coords, Vector3::zeros(), epsilon = 1e-9);
        assert_relative_eq!(
            fit.cylinder.axis.into_inner(),
            Vector3::y(),
            epsilon = 1e-12
        );
        assert!(fit.final_loss < 1e-10);
    }

    #[test]
    fn test_axis_sign_is_canonicalized() {
        struct FlippedMinimizer;
        impl Minimizer for FlippedMinimizer {
            fn minimize(
                &self,
                objective: &dyn Objective,
                initial: Vector6<f64>,
            ) -> FitResult<MinimizeOutcome> {
                let mut params = initial;
                params[3] = 0.0;
                params[4] = -1.0;
                params[5] = 0.0;
                Ok(MinimizeOutcome {
                    params,
                    loss: objective.evaluate(&params),
                    iterations: 1,
                    converged: true,
                })
            }
        }

        let points = squat_cloud();
        let fit = fit_cylinder_with(
            &points,
            &FitParams::default(),
            &FlippedMinimizer,
            &BoundingBoxHeuristic,
        )
        .unwrap();
        assert!(fit.cylinder.axis.y > 0.0);
    }
}
