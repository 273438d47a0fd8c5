//! Conversions between the mean, eccentric and true anomaly of an
//! elliptic orbit, including an iterative solver for Kepler's equation.
//!
//! Every function here takes the eccentricity explicitly and rejects
//! anything outside of `[0, 1)` with [`OrbitError::InvalidEccentricity`].
//!
//! Angles are returned unwrapped: a mean anomaly of `3τ + 0.1` yields an
//! eccentric anomaly a little past `3τ`, not one in `[0, τ)`.
//! Use [`normalize_angle`] if you need the canonical range.

use core::f64::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{OrbitError, Result};

/// The residual `|E - e sin E - M|` below which Kepler's equation counts as solved.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// The maximum number of Newton iterations for the default solver.
///
/// Real orbits converge in well under 10 iterations; the cap only
/// exists to keep pathological inputs from looping forever.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Checks that an eccentricity describes a closed (circular or elliptic) orbit.
///
/// # Example
/// ```
/// use celestial_sandbox::{anomaly::validate_eccentricity, OrbitError};
///
/// assert!(validate_eccentricity(0.0).is_ok());
/// assert!(validate_eccentricity(0.9999).is_ok());
/// assert_eq!(
///     validate_eccentricity(1.0),
///     Err(OrbitError::InvalidEccentricity { value: 1.0 })
/// );
/// ```
pub fn validate_eccentricity(eccentricity: f64) -> Result<()> {
    if (0.0..1.0).contains(&eccentricity) {
        Ok(())
    } else {
        Err(OrbitError::InvalidEccentricity {
            value: eccentricity,
        })
    }
}

/// Wraps an angle into `[0, τ)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly tau
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Gets the mean anomaly at a given time since periapsis.
///
/// `M = (2π / period) * t`
///
/// The time and period are both in seconds. The time is not validated;
/// negative times and times past one period are fine and produce mean
/// anomalies outside of `[0, τ)`.
///
/// # Errors
/// [`OrbitError::InvalidPeriod`] if the period is not positive and finite.
pub fn mean_anomaly_at(period: f64, t: f64) -> Result<f64> {
    if !(period.is_finite() && period > 0.0) {
        return Err(OrbitError::InvalidPeriod { value: period });
    }

    Ok(TAU / period * t)
}

/// Solves Kepler's equation for the eccentric anomaly, using the
/// default solver configuration.
///
/// This is the same as [`eccentric_anomaly_from_mean`].
///
/// # Example
/// ```
/// use celestial_sandbox::anomaly::{mean_anomaly_from_eccentric, solve_kepler};
///
/// let eccentric_anomaly = solve_kepler(0.5, 1.0).unwrap();
/// let mean_anomaly = mean_anomaly_from_eccentric(0.5, eccentric_anomaly).unwrap();
///
/// assert!((mean_anomaly - 1.0).abs() < 1e-8);
/// ```
pub fn solve_kepler(eccentricity: f64, mean_anomaly: f64) -> Result<f64> {
    eccentric_anomaly_from_mean(eccentricity, mean_anomaly)
}

/// Gets the eccentric anomaly at a given mean anomaly.
///
/// Uses [`KeplerSolver::default`]. If the solver runs out of iterations
/// the best estimate is returned anyway; use [`KeplerSolver::solve`]
/// directly if you need to know whether that happened.
pub fn eccentric_anomaly_from_mean(eccentricity: f64, mean_anomaly: f64) -> Result<f64> {
    KeplerSolver::default()
        .solve(eccentricity, mean_anomaly)
        .map(|solution| solution.eccentric_anomaly)
}

/// Gets the true anomaly at a given eccentric anomaly.
///
/// `ν = 2·atan2(√(1+e)·sin(E/2), √(1−e)·cos(E/2))`
///
/// The result is shifted by whole revolutions so that it lies in the
/// same revolution as the eccentric anomaly.
pub fn true_anomaly_from_eccentric(eccentricity: f64, eccentric_anomaly: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    check_finite(eccentric_anomaly)?;

    let (sin_half, cos_half) = (eccentric_anomaly * 0.5).sin_cos();
    let true_anomaly = 2.0
        * ((1.0 + eccentricity).sqrt() * sin_half).atan2((1.0 - eccentricity).sqrt() * cos_half);

    Ok(same_revolution(true_anomaly, eccentric_anomaly))
}

/// Gets the eccentric anomaly at a given true anomaly.
///
/// `E = 2·atan2(√(1−e)·sin(ν/2), √(1+e)·cos(ν/2))`
///
/// The result is shifted by whole revolutions so that it lies in the
/// same revolution as the true anomaly.
pub fn eccentric_anomaly_from_true(eccentricity: f64, true_anomaly: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    check_finite(true_anomaly)?;

    let (sin_half, cos_half) = (true_anomaly * 0.5).sin_cos();
    let eccentric_anomaly = 2.0
        * ((1.0 - eccentricity).sqrt() * sin_half).atan2((1.0 + eccentricity).sqrt() * cos_half);

    Ok(same_revolution(eccentric_anomaly, true_anomaly))
}

/// Gets the mean anomaly at a given eccentric anomaly.
///
/// This is Kepler's equation, `M = E − e·sin(E)`, and is exact.
pub fn mean_anomaly_from_eccentric(eccentricity: f64, eccentric_anomaly: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    check_finite(eccentric_anomaly)?;

    Ok(eccentric_anomaly - eccentricity * eccentric_anomaly.sin())
}

/// Gets the true anomaly at a given mean anomaly, going through the
/// eccentric anomaly.
pub fn true_anomaly_from_mean(eccentricity: f64, mean_anomaly: f64) -> Result<f64> {
    let eccentric_anomaly = eccentric_anomaly_from_mean(eccentricity, mean_anomaly)?;
    true_anomaly_from_eccentric(eccentricity, eccentric_anomaly)
}

/// Gets the mean anomaly at a given true anomaly, going through the
/// eccentric anomaly. No iteration is involved.
pub fn mean_anomaly_from_true(eccentricity: f64, true_anomaly: f64) -> Result<f64> {
    let eccentric_anomaly = eccentric_anomaly_from_true(eccentricity, true_anomaly)?;
    mean_anomaly_from_eccentric(eccentricity, eccentric_anomaly)
}

/// Configuration for the Newton–Raphson solver of Kepler's equation.
///
/// # Example
/// ```
/// use celestial_sandbox::KeplerSolver;
///
/// let solver = KeplerSolver::default().with_max_iterations(2);
/// let solution = solver.solve(0.99, 0.2).unwrap();
///
/// // Two iterations are not enough here, but we still get a finite estimate.
/// assert!(!solution.converged);
/// assert!(solution.eccentric_anomaly.is_finite());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerSolver {
    /// The residual `|E - e sin E - M|` below which the equation counts as solved.
    pub tolerance: f64,

    /// The maximum number of Newton iterations.
    ///
    /// Zero is allowed, in which case the initial guess `E₀ = M` is returned.
    pub max_iterations: u32,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl KeplerSolver {
    /// Creates a solver with the given tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Returns a copy of this solver with a different tolerance.
    #[must_use]
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    /// Returns a copy of this solver with a different iteration cap.
    #[must_use]
    pub fn with_max_iterations(self, max_iterations: u32) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Solves Kepler's equation `E − e·sin(E) = M` for the eccentric anomaly.
    ///
    /// Running out of iterations is not an error: the best estimate is
    /// returned with [`KeplerSolution::converged`] set to `false`.
    ///
    /// # Method
    /// The mean anomaly is first reduced into `[0, π]` using the
    /// periodicity and odd symmetry of the equation; the whole revolutions
    /// and the sign are put back at the end, so the result satisfies the
    /// equation for the mean anomaly that was passed in.
    ///
    /// On the reduced problem, Newton's method starts from `E₀ = M`:
    ///
    /// `E ← E − f(E)/f'(E)`, with `f(E) = E − e·sin(E) − M` and
    /// `f'(E) = 1 − e·cos(E)`.
    ///
    /// The root always lies in `[M, min(M + e, π)]`. That bracket is
    /// tightened on every iteration, and a Newton step that would leave it
    /// is replaced by a bisection step. Near-parabolic orbits can otherwise
    /// throw the iteration several revolutions away from the root.
    ///
    /// # Errors
    /// - [`OrbitError::InvalidEccentricity`] if the eccentricity is outside `[0, 1)`.
    /// - [`OrbitError::NonFiniteAngle`] if the mean anomaly is NaN or infinite.
    pub fn solve(&self, eccentricity: f64, mean_anomaly: f64) -> Result<KeplerSolution> {
        validate_eccentricity(eccentricity)?;
        check_finite(mean_anomaly)?;

        let revolutions = (mean_anomaly / TAU).round();
        let reduced = mean_anomaly - revolutions * TAU;
        let sign = if reduced < 0.0 { -1.0 } else { 1.0 };

        let (eccentric_anomaly, iterations, residual) =
            self.solve_reduced(eccentricity, reduced.abs());

        let converged = residual < self.tolerance;

        if converged {
            trace!(iterations, "Kepler's equation solved");
        } else {
            warn!(
                eccentricity,
                mean_anomaly,
                iterations,
                residual,
                "Kepler solver hit its iteration cap; returning best estimate"
            );
        }

        Ok(KeplerSolution {
            eccentric_anomaly: sign * eccentric_anomaly + revolutions * TAU,
            iterations,
            residual,
            converged,
        })
    }

    /// Safeguarded Newton iteration for a mean anomaly in `[0, π]`.
    ///
    /// Returns the estimate, the number of iterations and the final residual.
    fn solve_reduced(&self, eccentricity: f64, mean_anomaly: f64) -> (f64, u32, f64) {
        let mut lower = mean_anomaly;
        let mut upper = (mean_anomaly + eccentricity).min(PI);

        let mut eccentric_anomaly = mean_anomaly;
        let mut residual = keplers_equation(mean_anomaly, eccentric_anomaly, eccentricity);
        let mut iterations = 0;

        while residual.abs() >= self.tolerance && iterations < self.max_iterations {
            iterations += 1;

            // f is strictly increasing, so its sign tells us which side the root is on
            if residual < 0.0 {
                lower = eccentric_anomaly;
            } else {
                upper = eccentric_anomaly;
            }

            // f' >= 1 - e > 0, no division by zero here
            let derivative = keplers_equation_derivative(eccentric_anomaly, eccentricity);
            let newton = eccentric_anomaly - residual / derivative;

            eccentric_anomaly = if newton > lower && newton < upper {
                newton
            } else {
                0.5 * (lower + upper)
            };

            residual = keplers_equation(mean_anomaly, eccentric_anomaly, eccentricity);
        }

        (eccentric_anomaly, iterations, residual.abs())
    }
}

/// The outcome of one run of the [`KeplerSolver`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerSolution {
    /// The eccentric anomaly, in radians, unwrapped.
    pub eccentric_anomaly: f64,

    /// How many Newton (or bisection) steps were taken.
    pub iterations: u32,

    /// The final `|E − e·sin(E) − M|`.
    pub residual: f64,

    /// Whether the residual got below the solver's tolerance.
    pub converged: bool,
}

impl KeplerSolution {
    /// Returns the eccentric anomaly only if the solver converged.
    ///
    /// # Errors
    /// [`OrbitError::SolverNonConvergence`] otherwise.
    pub fn require_converged(self) -> Result<f64> {
        if self.converged {
            Ok(self.eccentric_anomaly)
        } else {
            Err(OrbitError::SolverNonConvergence {
                iterations: self.iterations,
                residual: self.residual,
            })
        }
    }
}

#[inline]
fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - (eccentricity * eccentric_anomaly.sin()) - mean_anomaly
}

#[inline]
fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - (eccentricity * eccentric_anomaly.cos())
}

/// Shifts `angle` by whole revolutions so it is within half a turn of `reference`.
#[inline]
fn same_revolution(angle: f64, reference: f64) -> f64 {
    angle + TAU * ((reference - angle) / TAU).round()
}

#[inline]
fn check_finite(angle: f64) -> Result<()> {
    if angle.is_finite() {
        Ok(())
    } else {
        Err(OrbitError::NonFiniteAngle { value: angle })
    }
}
