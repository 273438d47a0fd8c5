use thiserror::Error;

/// Shorthand for results produced by this crate.
pub type Result<T, E = OrbitError> = core::result::Result<T, E>;

/// Everything that can go wrong while working with orbital elements.
///
/// Variants carry the offending value where there is one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    /// The eccentricity is outside of `[0, 1)`.
    ///
    /// Parabolic and hyperbolic trajectories (e ≥ 1) are not supported.
    #[error("eccentricity must be within [0, 1), got {value}")]
    InvalidEccentricity {
        /// The rejected eccentricity.
        value: f64,
    },

    /// The apoapsis is below the periapsis, or either of them is negative.
    #[error("invalid apsides: periapsis {periapsis} km, apoapsis {apoapsis} km")]
    InvalidApsides {
        /// The rejected periapsis, in kilometers.
        periapsis: f64,
        /// The rejected apoapsis, in kilometers.
        apoapsis: f64,
    },

    /// The orbital period is zero, negative or not finite.
    #[error("orbital period must be positive and finite, got {value} s")]
    InvalidPeriod {
        /// The rejected period, in seconds.
        value: f64,
    },

    /// The gravitational parameter is zero, negative or not finite.
    #[error("gravitational parameter must be positive and finite, got {value} km^3/s^2")]
    InvalidGravitationalParameter {
        /// The rejected gravitational parameter, in km^3/s^2.
        value: f64,
    },

    /// The semi-major axis is zero, negative or not finite.
    #[error("semi-major axis must be positive and finite, got {value} km")]
    InvalidSemiMajorAxis {
        /// The rejected semi-major axis, in kilometers.
        value: f64,
    },

    /// The mean motion is zero or not finite.
    #[error("mean motion must be non-zero and finite, got {value} rad/s")]
    InvalidMeanMotion {
        /// The rejected mean motion, in radians per second.
        value: f64,
    },

    /// A radial distance is zero, negative or not finite.
    #[error("distance must be positive and finite, got {value} km")]
    InvalidDistance {
        /// The rejected distance, in kilometers.
        value: f64,
    },

    /// An angle is NaN or infinite.
    #[error("angle must be finite, got {value} rad")]
    NonFiniteAngle {
        /// The rejected angle, in radians.
        value: f64,
    },

    /// A direction was needed from a zero-length vector.
    ///
    /// This happens for zero angular momentum (a radial trajectory),
    /// a zero eccentricity vector, or a position at the origin.
    #[error("degenerate orbit: a direction is required from a zero-length vector")]
    DegenerateOrbit,

    /// The orbit lies in the reference plane, so the ascending node
    /// and everything measured from it is undefined.
    #[error("degenerate geometry: inclination {inclination} rad leaves the ascending node undefined")]
    DegenerateGeometry {
        /// The inclination that was found, in radians.
        inclination: f64,
    },

    /// Kepler's equation was not solved to tolerance within the iteration cap.
    ///
    /// The solver itself never returns this; it is produced by
    /// [`KeplerSolution::require_converged`][crate::KeplerSolution::require_converged].
    #[error("Kepler solver did not converge after {iterations} iterations (residual {residual})")]
    SolverNonConvergence {
        /// How many iterations were performed.
        iterations: u32,
        /// The remaining `|E - e sin E - M|`.
        residual: f64,
    },
}
