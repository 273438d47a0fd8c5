//! # Celestial Sandbox
//! This library crate contains the orbital mechanics behind a small
//! celestial sandbox: bodies following fixed Keplerian ellipses around
//! a parent, the way planets and moons do in a game or a planetarium.
//!
//! Everything here is a two-body model. An orbit never changes, so
//! nothing is integrated over time steps: the position of a body at
//! any time is found directly by solving Kepler's equation.
//!
//! Distances are in kilometers, times in seconds, angles in radians and
//! gravitational parameters in km³/s².
//!
//! ## Getting started
//! - [`anomaly`]: conversions between the mean, eccentric and true
//!   anomaly, and the [`KeplerSolver`].
//! - [`elements`]: closed-form relations between orbital elements
//!   (apsides, period, mean motion, angular momentum, ...).
//! - [`frame`]: rotations from the orbital plane into the inertial
//!   frame, and back from state vectors to elements.
//! - [`OrbitalElements`] and [`OrbitState`]: a validated orbit, and an
//!   orbiting body that can be located at any time.
//! - [`CelestialBody`], [`body_presets`] and [`star`]: the attracting
//!   bodies, including a simple stellar classifier.
//!
//! Both orbit structs implement [`OrbitTrait`], which provides most of
//! the per-orbit geometry.
//!
//! ## Example
//!
//! ```rust
//! use celestial_sandbox::{body_presets, OrbitalElements, OrbitState, OrbitTrait};
//!
//! # fn main() -> celestial_sandbox::Result<()> {
//! let earth = body_presets::earth();
//! let mu = earth.gravitational_parameter();
//!
//! let elements = OrbitalElements::with_apsides(6778.0, 7178.0, 0.9, 0.0, 0.0)?;
//! let satellite = OrbitState::with_gravitational_parameter(elements, mu, None)?;
//!
//! // At t = 0 the satellite is at its periapsis.
//! let position = satellite.position_at(0.0)?;
//! assert!((position.length() - satellite.get_periapsis()).abs() < 1e-6);
//!
//! // Half an orbit later it is at its apoapsis.
//! let later = satellite.position_at(satellite.orbital_period() / 2.0)?;
//! assert!((later.length() - satellite.get_apoapsis()).abs() < 1e-6);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod anomaly;
mod body;
pub mod body_presets;
pub mod constants;
pub mod elements;
mod error;
pub mod frame;
mod orbit;
pub mod star;

use glam::{DVec2, DVec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use anomaly::{solve_kepler, KeplerSolution, KeplerSolver};
pub use body::{BodyKind, CelestialBody, PlanetProperties, StarProperties};
pub use elements::{elements_from_apsides, elements_from_momentum, ApsidalShape, NodalOrientation};
pub use error::{OrbitError, Result};
pub use frame::{EulerAngles, OsculatingElements};
pub use orbit::{position_at, OrbitState, OrbitalElements};
pub use star::{classify_star, LifecycleStage, MassCategory, StarType};

/// A struct representing a 3x2 matrix.
///
/// This struct is used to store the transformation matrix
/// for transforming a 2D vector into a 3D vector.
///
/// Namely, it is used in the [`transform_pqw_vector`][OrbitTrait::transform_pqw_vector]
/// method to tilt a vector in the orbital plane into the inertial frame.
///
/// Each element is named `eXY`, where `X` is the row and `Y` is the column.
///
/// # Example
/// ```
/// use glam::{DVec2, DVec3};
///
/// use celestial_sandbox::Matrix3x2;
///
/// let matrix = Matrix3x2 {
///     e11: 1.0, e12: 0.0,
///     e21: 0.0, e22: 1.0,
///     e31: 1.0, e32: 1.0,
/// };
///
/// assert_eq!(matrix.dot_vec(DVec2::new(1.0, 2.0)), DVec3::new(1.0, 2.0, 3.0));
/// ```
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix3x2 {
    // Element XY
    pub e11: f64,
    pub e12: f64,
    pub e21: f64,
    pub e22: f64,
    pub e31: f64,
    pub e32: f64,
}

impl Matrix3x2 {
    /// Computes a dot product between this matrix and a 2D vector.
    pub fn dot_vec(&self, vec: DVec2) -> DVec3 {
        DVec3::new(
            vec.x * self.e11 + vec.y * self.e12,
            vec.x * self.e21 + vec.y * self.e22,
            vec.x * self.e31 + vec.y * self.e32,
        )
    }
}

/// A position and velocity at a point in the orbit.
///
/// The position is in kilometers and the velocity in kilometers per
/// second, both relative to the attracting body.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors {
    /// The 3D position at a point in the orbit, in kilometers.
    pub position: DVec3,
    /// The 3D velocity at a point in the orbit, in kilometers per second.
    pub velocity: DVec3,
}

impl StateVectors {
    /// Recovers the orbit these state vectors lie on, given the
    /// gravitational parameter of the attracting body.
    ///
    /// See [`frame::elements_from_state_vectors`] for the conventions
    /// used for circular and equatorial orbits.
    ///
    /// # Example
    /// ```
    /// use celestial_sandbox::{OrbitalElements, OrbitTrait};
    ///
    /// let mu = 398_600.0;
    /// let elements = OrbitalElements::new(8000.0, 0.2, 0.4, 1.2, 0.3).unwrap();
    /// let state_vectors = elements.get_state_vectors_at_true_anomaly(2.0, mu).unwrap();
    ///
    /// let recovered = state_vectors.to_elements(mu).unwrap();
    /// assert!((recovered.elements.get_semi_major_axis() - 8000.0).abs() < 1e-6);
    /// assert!((recovered.elements.get_arg_pe() - 0.3).abs() < 1e-9);
    /// assert!((recovered.true_anomaly - 2.0).abs() < 1e-9);
    /// ```
    ///
    /// # Performance
    /// This function uses several cross products and trigonometric
    /// operations. Prefer keeping the elements around over repeatedly
    /// converting from state vectors.
    pub fn to_elements(self, mu: f64) -> Result<OsculatingElements> {
        frame::elements_from_state_vectors(self, mu)
    }

    /// Reads Euler angles directly off the state vectors.
    ///
    /// This is the narrow approximation from
    /// [`frame::state_vector_to_elements`], not a general inverse; use
    /// [`to_elements`][Self::to_elements] for that.
    pub fn to_euler_angles(self) -> Result<EulerAngles> {
        frame::state_vector_to_elements(self.position, self.velocity)
    }
}

/// A trait that defines the methods that a Keplerian orbit must implement.
///
/// This trait is implemented by both [`OrbitalElements`] and
/// [`OrbitState`]. Implementors only provide the five elements and the
/// transformation matrix; everything else is derived from them.
///
/// Implementors are expected to hold validated elements (`a > 0` and
/// `0 ≤ e < 1`); the getters below do not check them again.
///
/// # Example
/// ```
/// use celestial_sandbox::{OrbitalElements, OrbitState, OrbitTrait};
///
/// fn accepts_orbit(orbit: &impl OrbitTrait) {
///     println!("That's an orbit!");
/// }
///
/// let elements = OrbitalElements::default();
/// accepts_orbit(&elements);
///
/// let state = OrbitState::from(elements);
/// accepts_orbit(&state);
/// ```
pub trait OrbitTrait {
    /// Gets the semi-major axis of the orbit, in kilometers.
    ///
    /// In an elliptic orbit, the semi-major axis is the
    /// average of the apoapsis and periapsis.
    ///
    /// Learn more: <https://en.wikipedia.org/wiki/Semi-major_and_semi-minor_axes>
    fn get_semi_major_axis(&self) -> f64;

    /// Gets the eccentricity of the orbit, within `[0, 1)`.
    ///
    /// See more: <https://en.wikipedia.org/wiki/Orbital_eccentricity>
    fn get_eccentricity(&self) -> f64;

    /// Gets the inclination of the orbit, in radians.
    fn get_inclination(&self) -> f64;

    /// Gets the longitude of the ascending node, in radians.
    fn get_long_asc_node(&self) -> f64;

    /// Gets the argument of periapsis, in radians.
    fn get_arg_pe(&self) -> f64;

    /// Gets the matrix that tilts vectors in the orbital plane into the
    /// inertial frame.
    ///
    /// See [`frame::transformation_matrix`].
    fn get_transformation_matrix(&self) -> Matrix3x2;

    /// Gets the periapsis, the closest distance to the attracting body,
    /// in kilometers.
    ///
    /// # Example
    /// ```
    /// use celestial_sandbox::{OrbitalElements, OrbitTrait};
    ///
    /// let orbit = OrbitalElements::new(100.0, 0.5, 0.0, 0.0, 0.0).unwrap();
    /// assert_eq!(orbit.get_periapsis(), 50.0);
    /// assert_eq!(orbit.get_apoapsis(), 150.0);
    /// ```
    fn get_periapsis(&self) -> f64 {
        self.get_semi_major_axis() * (1.0 - self.get_eccentricity())
    }

    /// Gets the apoapsis, the furthest distance from the attracting body,
    /// in kilometers.
    fn get_apoapsis(&self) -> f64 {
        self.get_semi_major_axis() * (1.0 + self.get_eccentricity())
    }

    /// Gets the semi-minor axis of the orbit, `b = a·√(1−e²)`.
    fn get_semi_minor_axis(&self) -> f64 {
        self.get_semi_major_axis() * (1.0 - self.get_eccentricity().powi(2)).sqrt()
    }

    /// Gets the semi-latus rectum of the orbit, `p = a·(1−e²)`.
    ///
    /// Learn more: <https://en.wikipedia.org/wiki/Ellipse#Semi-latus_rectum>
    fn get_semi_latus_rectum(&self) -> f64 {
        self.get_semi_major_axis() * (1.0 - self.get_eccentricity().powi(2))
    }

    /// Gets the linear eccentricity of the orbit, in kilometers.
    ///
    /// This is the distance between the center of the ellipse and either of
    /// its two foci.
    ///
    /// # Example
    /// ```
    /// use celestial_sandbox::{OrbitalElements, OrbitTrait};
    ///
    /// // Periapsis at x = 50, apoapsis at x = -100.
    /// // The midpoint would be at x = -25, while the attracting body sits at
    /// // one of the foci, at the origin.
    /// let orbit = OrbitalElements::with_apsides(50.0, 100.0, 0.0, 0.0, 0.0).unwrap();
    /// assert!((orbit.get_linear_eccentricity() - 25.0).abs() < 1e-9);
    /// ```
    fn get_linear_eccentricity(&self) -> f64 {
        self.get_semi_major_axis() - self.get_periapsis()
    }

    /// Gets the orbital period around a body with gravitational parameter
    /// `mu`, in seconds.
    ///
    /// # Errors
    /// [`OrbitError::InvalidGravitationalParameter`] if `mu` is not positive.
    fn get_orbital_period(&self, mu: f64) -> Result<f64> {
        elements::period_from_semi_major_axis(self.get_semi_major_axis(), mu)
    }

    /// Gets the mean motion around a body with gravitational parameter
    /// `mu`, in radians per second.
    ///
    /// # Errors
    /// [`OrbitError::InvalidGravitationalParameter`] if `mu` is not positive.
    fn get_mean_motion(&self, mu: f64) -> Result<f64> {
        elements::mean_motion(self.get_semi_major_axis(), mu)
    }

    /// Gets the distance from the attracting body at a given true anomaly,
    /// `r = a·(1−e²) / (1 + e·cos ν)`.
    ///
    /// # Errors
    /// [`OrbitError::NonFiniteAngle`] if the true anomaly is NaN or infinite.
    fn get_altitude_at_true_anomaly(&self, true_anomaly: f64) -> Result<f64> {
        elements::distance_to_center(self.get_semi_major_axis(), self.get_eccentricity(), true_anomaly)
    }

    /// Gets the speed at a given true anomaly from the vis-viva equation,
    /// in kilometers per second.
    fn get_speed_at_true_anomaly(&self, true_anomaly: f64, mu: f64) -> Result<f64> {
        elements::orbital_speed(
            self.get_altitude_at_true_anomaly(true_anomaly)?,
            self.get_semi_major_axis(),
            mu,
        )
    }

    /// Gets the position in the orbital plane (PQW frame) at a given
    /// true anomaly, in kilometers.
    ///
    /// The x axis points at the periapsis.
    fn get_pqw_position_at_true_anomaly(&self, true_anomaly: f64) -> Result<DVec2> {
        frame::perifocal_position(self.get_semi_major_axis(), self.get_eccentricity(), true_anomaly)
    }

    /// Gets the position in the inertial frame at a given true anomaly,
    /// in kilometers.
    ///
    /// # Example
    /// ```
    /// use celestial_sandbox::{OrbitalElements, OrbitTrait};
    /// use glam::DVec3;
    ///
    /// let orbit = OrbitalElements::new(100.0, 0.5, 0.0, 0.0, 0.0).unwrap();
    /// let periapsis = orbit.get_position_at_true_anomaly(0.0).unwrap();
    /// assert_eq!(periapsis, DVec3::new(50.0, 0.0, 0.0));
    /// ```
    fn get_position_at_true_anomaly(&self, true_anomaly: f64) -> Result<DVec3> {
        Ok(self.transform_pqw_vector(self.get_pqw_position_at_true_anomaly(true_anomaly)?))
    }

    /// Gets the position in the inertial frame at a given eccentric
    /// anomaly, in kilometers.
    fn get_position_at_eccentric_anomaly(&self, eccentric_anomaly: f64) -> Result<DVec3> {
        let true_anomaly =
            anomaly::true_anomaly_from_eccentric(self.get_eccentricity(), eccentric_anomaly)?;
        self.get_position_at_true_anomaly(true_anomaly)
    }

    /// Gets the position in the inertial frame at a given mean anomaly,
    /// in kilometers.
    ///
    /// # Performance
    /// This solves Kepler's equation with the default [`KeplerSolver`],
    /// which is iterative. If you already know the true anomaly, use
    /// [`get_position_at_true_anomaly`][Self::get_position_at_true_anomaly]
    /// instead.
    fn get_position_at_mean_anomaly(&self, mean_anomaly: f64) -> Result<DVec3> {
        let eccentric_anomaly = solve_kepler(self.get_eccentricity(), mean_anomaly)?;
        self.get_position_at_eccentric_anomaly(eccentric_anomaly)
    }

    /// Gets the velocity in the orbital plane (PQW frame) at a given
    /// true anomaly, in kilometers per second.
    fn get_pqw_velocity_at_true_anomaly(&self, true_anomaly: f64, mu: f64) -> Result<DVec2> {
        frame::perifocal_velocity(
            self.get_semi_major_axis(),
            self.get_eccentricity(),
            true_anomaly,
            mu,
        )
    }

    /// Gets the velocity in the inertial frame at a given true anomaly,
    /// in kilometers per second.
    fn get_velocity_at_true_anomaly(&self, true_anomaly: f64, mu: f64) -> Result<DVec3> {
        Ok(self.transform_pqw_vector(self.get_pqw_velocity_at_true_anomaly(true_anomaly, mu)?))
    }

    /// Gets the position and velocity at a given true anomaly.
    ///
    /// See [`frame::state_vectors`].
    fn get_state_vectors_at_true_anomaly(&self, true_anomaly: f64, mu: f64) -> Result<StateVectors> {
        frame::state_vectors(self, true_anomaly, mu)
    }

    /// Transforms a vector from the orbital plane (PQW frame) into the
    /// inertial frame, using the orbit's transformation matrix.
    ///
    /// # Performance
    /// This only takes a handful of multiplications as long as
    /// [`get_transformation_matrix`][Self::get_transformation_matrix] is
    /// cheap. [`OrbitState`] caches the matrix, while [`OrbitalElements`]
    /// recomputes it on every call.
    fn transform_pqw_vector(&self, position: DVec2) -> DVec3 {
        self.get_transformation_matrix().dot_vec(position)
    }
}

#[cfg(test)]
mod tests;
