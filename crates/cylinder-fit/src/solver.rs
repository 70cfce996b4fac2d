//! Second-order minimization over six parameters.
//!
//! The solver is decoupled from cylinder geometry through two small traits:
//! [`Objective`] is any scalar loss over a 6-vector, and [`Minimizer`] is
//! any driver that can minimize one. The fit driver depends only on these
//! seams, so an alternative solver (or a mock in tests) can be substituted
//! without touching the geometry code.
//!
//! [`NewtonSolver`] is the default implementation: damped Newton with
//! finite-difference derivatives and Levenberg-style diagonal damping.
//! Candidate steps are accepted only if they do not increase the loss; a
//! rejected step raises the damping and retries, which keeps the iteration
//! stable even where the Hessian is indefinite or singular (the Rodrigues
//! magnitude direction contributes a null direction by construction).

use std::time::{Duration, Instant};

use nalgebra::{Matrix6, Vector6};
use tracing::debug;

use crate::error::{FitError, FitResult};

/// A scalar loss over a six-dimensional parameter vector.
pub trait Objective {
    /// Evaluate the loss at `params`.
    fn evaluate(&self, params: &Vector6<f64>) -> f64;
}

/// A minimization driver for an [`Objective`].
pub trait Minimizer {
    /// Minimize `objective` starting from `initial`.
    ///
    /// Implementations must return an error (never a silently unconverged
    /// result) when they exhaust their budget without meeting tolerance.
    fn minimize(
        &self,
        objective: &dyn Objective,
        initial: Vector6<f64>,
    ) -> FitResult<MinimizeOutcome>;
}

/// Result of a successful minimization.
#[derive(Debug, Clone, Copy)]
pub struct MinimizeOutcome {
    /// Parameter vector at the minimum.
    pub params: Vector6<f64>,
    /// Loss at the minimum.
    pub loss: f64,
    /// Iterations consumed.
    pub iterations: usize,
    /// Whether the convergence criterion was met (always true on the `Ok`
    /// path; kept for result-shape symmetry with other drivers).
    pub converged: bool,
}

/// Damped Newton minimizer with finite-difference derivatives.
///
/// # Example
///
/// ```rust
/// use cylinder_fit::{NewtonSolver, Minimizer, Objective};
/// use nalgebra::Vector6;
///
/// struct Quadratic;
/// impl Objective for Quadratic {
///     fn evaluate(&self, p: &Vector6<f64>) -> f64 {
///         (p - Vector6::repeat(2.0)).norm_squared()
///     }
/// }
///
/// let solver = NewtonSolver::new();
/// let outcome = solver.minimize(&Quadratic, Vector6::zeros()).unwrap();
/// assert!(outcome.loss < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonSolver {
    /// Convergence threshold on the step norm.
    pub tolerance: f64,
    /// Threshold on the gradient norm for declaring a stationary point when
    /// no descent step exists at any damping level. A separate knob from
    /// `tolerance`, which bounds a step length, not a slope.
    pub gradient_tolerance: f64,
    /// Hard cap on outer iterations.
    pub max_iterations: usize,
    /// Optional wall-clock budget for the whole minimization.
    pub max_duration: Option<Duration>,
    /// Initial diagonal damping.
    pub initial_damping: f64,
    /// Multiplicative damping adjustment on accept/reject.
    pub damping_factor: f64,
    /// Lower damping bound.
    pub min_damping: f64,
    /// Upper damping bound; exceeding it without a descent step is a failure.
    pub max_damping: f64,
    /// Relative step for central-difference gradients.
    pub gradient_step: f64,
    /// Relative step for finite-difference Hessians.
    pub hessian_step: f64,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            gradient_tolerance: 1e-8,
            max_iterations: 200,
            max_duration: None,
            initial_damping: 1e-3,
            damping_factor: 10.0,
            min_damping: 1e-9,
            max_damping: 1e10,
            gradient_step: 1e-6,
            hessian_step: 1e-4,
        }
    }
}

impl NewtonSolver {
    /// Create a solver with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the convergence threshold on the step norm.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the stationary-point threshold on the gradient norm.
    pub fn with_gradient_tolerance(mut self, gradient_tolerance: f64) -> Self {
        self.gradient_tolerance = gradient_tolerance;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set an optional wall-clock budget.
    pub fn with_max_duration(mut self, max_duration: Option<Duration>) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Central-difference gradient.
    fn gradient(&self, objective: &dyn Objective, x: &Vector6<f64>) -> Vector6<f64> {
        let mut g = Vector6::zeros();
        for i in 0..6 {
            let h = self.gradient_step * x[i].abs().max(1.0);
            let mut xp = *x;
            let mut xm = *x;
            xp[i] += h;
            xm[i] -= h;
            g[i] = (objective.evaluate(&xp) - objective.evaluate(&xm)) / (2.0 * h);
        }
        g
    }

    /// Finite-difference Hessian (central second differences on the
    /// diagonal, mixed four-point stencils off it). `f0` is the loss at `x`.
    fn hessian(&self, objective: &dyn Objective, x: &Vector6<f64>, f0: f64) -> Matrix6<f64> {
        let mut steps = [0.0_f64; 6];
        for i in 0..6 {
            steps[i] = self.hessian_step * x[i].abs().max(1.0);
        }

        let mut h = Matrix6::zeros();
        for i in 0..6 {
            let hi = steps[i];
            let mut xp = *x;
            let mut xm = *x;
            xp[i] += hi;
            xm[i] -= hi;
            h[(i, i)] = (objective.evaluate(&xp) - 2.0 * f0 + objective.evaluate(&xm)) / (hi * hi);

            for j in (i + 1)..6 {
                let hj = steps[j];
                let mut xpp = *x;
                let mut xpm = *x;
                let mut xmp = *x;
                let mut xmm = *x;
                xpp[i] += hi;
                xpp[j] += hj;
                xpm[i] += hi;
                xpm[j] -= hj;
                xmp[i] -= hi;
                xmp[j] += hj;
                xmm[i] -= hi;
                xmm[j] -= hj;
                let value = (objective.evaluate(&xpp) - objective.evaluate(&xpm)
                    - objective.evaluate(&xmp)
                    + objective.evaluate(&xmm))
                    / (4.0 * hi * hj);
                h[(i, j)] = value;
                h[(j, i)] = value;
            }
        }
        h
    }
}

impl Minimizer for NewtonSolver {
    fn minimize(
        &self,
        objective: &dyn Objective,
        initial: Vector6<f64>,
    ) -> FitResult<MinimizeOutcome> {
        let start = Instant::now();
        let mut x = initial;
        let mut loss = objective.evaluate(&x);
        if !loss.is_finite() {
            return Err(FitError::optimization_failure(
                "loss is not finite at the initial guess",
                loss,
                0,
            ));
        }

        let mut damping = self.initial_damping;
        let mut iterations = 0;

        for iteration in 0..self.max_iterations {
            iterations = iteration + 1;

            if let Some(budget) = self.max_duration {
                if start.elapsed() > budget {
                    return Err(FitError::optimization_failure(
                        format!("wall-clock budget of {:?} exhausted", budget),
                        loss,
                        iterations,
                    ));
                }
            }

            let gradient = self.gradient(objective, &x);
            if !gradient.iter().all(|v| v.is_finite()) {
                return Err(FitError::optimization_failure(
                    "gradient is not finite",
                    loss,
                    iterations,
                ));
            }
            let hessian = self.hessian(objective, &x, loss);
            if !hessian.iter().all(|v| v.is_finite()) {
                return Err(FitError::optimization_failure(
                    "Hessian is not finite",
                    loss,
                    iterations,
                ));
            }

            // Inner damping loop: raise damping until a non-increasing step
            // is found or the damping bound is hit.
            let mut stepped = false;
            while damping <= self.max_damping {
                let mut damped = hessian;
                for i in 0..6 {
                    damped[(i, i)] += damping;
                }
                let step = match damped.lu().solve(&(-gradient)) {
                    Some(step) => step,
                    None => {
                        damping *= self.damping_factor;
                        continue;
                    }
                };

                let candidate = x + step;
                let candidate_loss = objective.evaluate(&candidate);
                if candidate_loss.is_finite() && candidate_loss <= loss {
                    let step_norm = step.norm();
                    x = candidate;
                    loss = candidate_loss;
                    damping = (damping / self.damping_factor).max(self.min_damping);
                    debug!(
                        target: "cylinder_fit::solver",
                        iteration = iterations,
                        loss = format!("{:.6e}", loss),
                        step_norm = format!("{:.3e}", step_norm),
                        damping = format!("{:.1e}", damping),
                        "Accepted Newton step"
                    );
                    if step_norm < self.tolerance {
                        return Ok(MinimizeOutcome {
                            params: x,
                            loss,
                            iterations,
                            converged: true,
                        });
                    }
                    stepped = true;
                    break;
                }

                damping *= self.damping_factor;
            }

            if !stepped {
                // No descent step exists at any damping level. At a
                // stationary point that is convergence; anywhere else it is
                // a genuine failure.
                if gradient.norm() < self.gradient_tolerance {
                    return Ok(MinimizeOutcome {
                        params: x,
                        loss,
                        iterations,
                        converged: true,
                    });
                }
                return Err(FitError::optimization_failure(
                    "damping bound reached without a descent step",
                    loss,
                    iterations,
                ));
            }
        }

        Err(FitError::optimization_failure(
            "iteration budget exhausted before convergence",
            loss,
            iterations,
        ))
    }
}
