//! Error types for cylinder fitting with rich diagnostics.
//!
//! This module provides comprehensive error handling with:
//! - Machine-readable error codes for programmatic handling
//! - Rich context (how far the optimizer got, what broke numerically)
//! - Recovery hints via miette help text
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `FIT-XXXX`:
//! - `FIT-1xxx`: Input errors (empty or degenerate point clouds)
//! - `FIT-2xxx`: Optimization errors (non-convergence, non-finite state)
//! - `FIT-3xxx`: Numerical errors (degenerate rotation construction)
//!
//! # Example
//!
//! ```rust
//! use cylinder_fit::{FitError, ErrorCode};
//!
//! let err = FitError::degenerate_input("x extent is 0");
//! assert_eq!(err.code(), ErrorCode::DegenerateInput);
//! assert_eq!(err.code().as_str(), "FIT-1002");
//! ```

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for cylinder-fitting operations.
pub type FitResult<T> = Result<T, FitError>;

/// Machine-readable error codes for cylinder-fitting operations.
///
/// Codes follow the pattern `FIT-XXXX` where:
/// - 1xxx = Input errors
/// - 2xxx = Optimization errors
/// - 3xxx = Numerical errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input errors (1xxx)
    /// FIT-1001: Point cloud has no points
    EmptyCloud = 1001,
    /// FIT-1002: Point cloud geometry cannot support a cylinder fit
    DegenerateInput = 1002,

    // Optimization errors (2xxx)
    /// FIT-2001: Optimizer failed to converge or produced non-finite state
    OptimizationFailure = 2001,

    // Numerical errors (3xxx)
    /// FIT-3001: Rotation construction hit a numerically degenerate configuration
    NumericDegeneracy = 3001,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `FIT-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyCloud => "FIT-1001",
            ErrorCode::DegenerateInput => "FIT-1002",
            ErrorCode::OptimizationFailure => "FIT-2001",
            ErrorCode::NumericDegeneracy => "FIT-3001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during cylinder fitting.
///
/// Each error variant includes:
/// - A human-readable message
/// - A machine-readable error code
/// - Recovery hints when available
///
/// Every failure mode is surfaced as a recoverable value; no NaN or
/// Infinity ever propagates silently into a returned cylinder or
/// transform.
#[derive(Debug, Error, Diagnostic)]
pub enum FitError {
    /// The input point cloud contains no points.
    #[error("point cloud is empty: {details}")]
    #[diagnostic(
        code(fit::input::empty),
        help("The fit needs at least one point to derive a bounding box. Check the upstream sampling step.")
    )]
    EmptyCloud { details: String },

    /// The input point cloud cannot support a meaningful fit
    /// (near-zero bounding-box extent, all points coincident, ...).
    #[error("degenerate point cloud: {details}")]
    #[diagnostic(
        code(fit::input::degenerate),
        help(
            "Initial radius and height are derived from the bounding box, so the cloud must have non-zero extent. Check for duplicated or collapsed points."
        )
    )]
    DegenerateInput { details: String },

    /// The optimizer failed: it exhausted its iteration or time budget,
    /// produced non-finite parameters or loss, or could not take a
    /// descent step.
    #[error("cylinder fit failed after {iterations} iteration(s): {details} (last loss {last_loss:.6e})")]
    #[diagnostic(
        code(fit::optimize::failed),
        help(
            "Try raising the iteration budget or loosening the convergence tolerance, or provide an explicit radius/height override if the bounding-box heuristic is a poor initial guess."
        )
    )]
    OptimizationFailure {
        details: String,
        last_loss: f64,
        iterations: usize,
    },

    /// Rotation construction hit the anti-parallel singularity without
    /// being caught by the aligned/anti-aligned fast paths.
    #[error("rotation construction is numerically degenerate (sin² = {sine_sq:.3e})")]
    #[diagnostic(
        code(fit::rotation::degenerate),
        help("The fitted axis is nearly anti-parallel to +Y but outside the exact-branch tolerance. This indicates a pathological axis; inspect the fit result.")
    )]
    NumericDegeneracy { sine_sq: f64 },
}

impl FitError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            FitError::EmptyCloud { .. } => ErrorCode::EmptyCloud,
            FitError::DegenerateInput { .. } => ErrorCode::DegenerateInput,
            FitError::OptimizationFailure { .. } => ErrorCode::OptimizationFailure,
            FitError::NumericDegeneracy { .. } => ErrorCode::NumericDegeneracy,
        }
    }

    // Constructor helpers for common error patterns

    /// Create an EmptyCloud error.
    pub fn empty_cloud(details: impl Into<String>) -> Self {
        FitError::EmptyCloud {
            details: details.into(),
        }
    }

    /// Create a DegenerateInput error.
    pub fn degenerate_input(details: impl Into<String>) -> Self {
        FitError::DegenerateInput {
            details: details.into(),
        }
    }

    /// Create an OptimizationFailure error.
    pub fn optimization_failure(
        details: impl Into<String>,
        last_loss: f64,
        iterations: usize,
    ) -> Self {
        FitError::OptimizationFailure {
            details: details.into(),
            last_loss,
            iterations,
        }
    }

    /// Create a NumericDegeneracy error.
    pub fn numeric_degeneracy(sine_sq: f64) -> Self {
        FitError::NumericDegeneracy { sine_sq }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = FitError::empty_cloud("no points");
        assert_eq!(err.code(), ErrorCode::EmptyCloud);
        assert_eq!(err.code().as_str(), "FIT-1001");

        let err = FitError::degenerate_input("zero extent");
        assert_eq!(err.code(), ErrorCode::DegenerateInput);
        assert_eq!(err.code().as_str(), "FIT-1002");

        let err = FitError::optimization_failure("budget exhausted", 1.5, 200);
        assert_eq!(err.code(), ErrorCode::OptimizationFailure);
        assert_eq!(err.code().as_str(), "FIT-2001");

        let err = FitError::numeric_degeneracy(1e-15);
        assert_eq!(err.code(), ErrorCode::NumericDegeneracy);
        assert_eq!(err.code().as_str(), "FIT-3001");
    }

    #[test]
    fn test_optimization_failure_context() {
        let err = FitError::optimization_failure("iteration budget exhausted", 0.125, 200);
        let display = format!("{}", err);
        assert!(display.contains("200 iteration"));
        assert!(display.contains("iteration budget exhausted"));
        assert!(display.contains("1.25"));
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::NumericDegeneracy), "FIT-3001");
    }
}
