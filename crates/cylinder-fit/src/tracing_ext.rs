//! Tracing extensions for fitting operations.
//!
//! Structured logging for the fit pipeline via the `tracing` ecosystem.
//! Enable it by initializing a subscriber in the application:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // Set RUST_LOG=cylinder_fit=debug for per-iteration solver output.
//! ```
//!
//! # Log Levels
//!
//! - **INFO**: fit summaries and operation timing
//! - **DEBUG**: initial guesses, per-iteration solver state
//! - **TRACE**: cloud statistics

use std::time::Instant;

use nalgebra::Point3;
use tracing::{debug, info, trace, Span};

use crate::cloud;
use crate::fit::CylinderFit;

/// A performance timer that logs duration on drop.
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("fit_operation", operation = name);
        debug!(target: "cylinder_fit::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer carrying the cloud size as a context field.
    pub fn with_context(name: &'static str, point_count: usize) -> Self {
        let span = tracing::info_span!("fit_operation", operation = name, points = point_count);
        debug!(
            target: "cylinder_fit::timing",
            operation = name,
            points = point_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Get the elapsed time.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Get the span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "cylinder_fit::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log a completed fit at info level.
pub fn log_fit_result(fit: &CylinderFit) {
    let cyl = &fit.cylinder;
    info!(
        target: "cylinder_fit::fit",
        center = format!("({:.4}, {:.4}, {:.4})", cyl.center.x, cyl.center.y, cyl.center.z),
        axis = format!("({:.4}, {:.4}, {:.4})", cyl.axis.x, cyl.axis.y, cyl.axis.z),
        radius = format!("{:.4}", cyl.radius),
        height = format!("{:.4}", cyl.height),
        final_loss = format!("{:.6e}", fit.final_loss),
        iterations = fit.iterations,
        converged = fit.converged,
        "Cylinder fit completed"
    );
}

/// Log cloud statistics at trace level.
pub fn log_cloud_stats(points: &[Point3<f64>], context: &str) {
    let Some(bounds) = cloud::bounds(points) else {
        trace!(
            target: "cylinder_fit::cloud",
            context = context,
            points = 0_usize,
            "Empty point cloud"
        );
        return;
    };
    let dims = cloud::extents(&bounds);
    trace!(
        target: "cylinder_fit::cloud",
        context = context,
        points = points.len(),
        dimensions = format!("{:.2} x {:.2} x {:.2}", dims.x, dims.y, dims.z),
        "Cloud state"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test_operation");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10.0);
    }

    #[test]
    fn test_log_cloud_stats() {
        // Just verify neither branch panics.
        log_cloud_stats(&[], "empty");
        log_cloud_stats(&[Point3::origin(), Point3::new(1.0, 2.0, 3.0)], "small");
    }
}
