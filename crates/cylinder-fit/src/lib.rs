//! Oriented finite-cylinder fitting for unstructured point clouds.
//!
//! This crate fits a finite right-circular cylinder to a 3D point cloud by
//! nonlinear least squares, producing the cylinder pose (center and unit
//! axis) and a 4×4 similarity transform from the canonical unit cylinder.
//! It is designed as the cylinder-primitive step of scan-processing and
//! part-alignment pipelines.
//!
//! # How the fit works
//!
//! - The axis is parameterized by an unconstrained direction vector whose
//!   direction alone matters, so the optimizer never deals with unit-norm
//!   constraints ([`rodrigues_axis`]).
//! - The per-point residual is the distance to the *lateral surface*, with
//!   the axial coordinate clamped to the cap planes ([`lateral_distance`]).
//! - The objective is the sum of squared distances plus a weighted anchor
//!   pulling the center toward the cloud centroid ([`CylinderObjective`]).
//! - A damped Newton solver with finite-difference derivatives minimizes
//!   the six pose parameters ([`NewtonSolver`]); radius and height stay
//!   fixed at values from a bounding-box heuristic (or an explicit
//!   override).
//! - [`cylinder_transform`] turns the result into Translation · Rotation ·
//!   Scale mapping the canonical unit cylinder (axis +Y, radius 1,
//!   height 1, origin-centered) onto the fit.
//!
//! # Units and Conventions
//!
//! The library is unit-agnostic; distances come out in the units of the
//! input coordinates. The canonical cylinder axis and every degenerate
//! fallback is **+Y**, and fitted axes are sign-canonicalized to a
//! non-negative Y component.
//!
//! # Quick Start
//!
//! ```no_run
//! use cylinder_fit::{fit_cylinder, cylinder_transform, FitParams};
//! use nalgebra::Point3;
//!
//! let points: Vec<Point3<f64>> = load_segmented_cloud();
//!
//! let fit = fit_cylinder(&points, &FitParams::default()).unwrap();
//! println!(
//!     "center {:?}, axis {:?}, {} iterations",
//!     fit.cylinder.center, fit.cylinder.axis, fit.iterations
//! );
//!
//! // Place a unit-cylinder mesh over the fitted region.
//! let transform = cylinder_transform(&fit.cylinder).unwrap();
//! # fn load_segmented_cloud() -> Vec<Point3<f64>> { Vec::new() }
//! ```
//!
//! # Errors
//!
//! Every failure is a [`FitError`] with a machine-readable [`ErrorCode`]
//! (`FIT-XXXX`): degenerate input is rejected before optimization,
//! non-convergence carries the last loss and iteration count, and the
//! rotation builder reports numerical degeneracy instead of dividing by a
//! vanishing sine. No NaN ever leaks into a returned result.

pub mod axis;
pub mod cloud;
pub mod distance;
pub mod error;
pub mod fit;
pub mod objective;
pub mod solver;
pub mod tracing_ext;
pub mod transform;
pub mod types;

pub use axis::{default_axis, rodrigues_axis, AXIS_EPSILON};
pub use distance::{lateral_distance, lateral_distances};
pub use error::{ErrorCode, FitError, FitResult};
pub use fit::{
    fit_cylinder, fit_cylinder_with, BoundingBoxHeuristic, CylinderFit, FitParams, SizeEstimate,
    SizeHeuristic,
};
pub use objective::{CylinderObjective, DEFAULT_CENTROID_WEIGHT};
pub use solver::{Minimizer, MinimizeOutcome, NewtonSolver, Objective};
pub use transform::{cylinder_transform, rotation_from_y_axis, ALIGNMENT_TOLERANCE};
pub use types::Cylinder;
