#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::TAU;

use glam::DVec3;

use crate::{
    anomaly::{mean_anomaly_at, normalize_angle, true_anomaly_from_eccentric, validate_eccentricity},
    constants::DEFAULT_ORBITAL_PERIOD,
    elements::{elements_from_apsides, period_from_semi_major_axis},
    frame::transformation_matrix,
    KeplerSolution, KeplerSolver, Matrix3x2, OrbitError, OrbitTrait, Result, StateVectors,
};

/// The five classical elements that fix the size, shape and orientation
/// of an elliptic orbit.
///
/// Construction validates every element, so an `OrbitalElements` value
/// always describes a real ellipse:
/// - `a > 0`
/// - `0 ≤ e < 1`
/// - the three angles are finite, with Ω and ω wrapped into `[0, τ)`.
///
/// # Example
/// ```
/// use celestial_sandbox::{OrbitalElements, OrbitError, OrbitTrait};
///
/// let elements = OrbitalElements::new(
///     // Semi-major axis, in km
///     7000.0,
///     // Eccentricity
///     0.1,
///     // Inclination
///     0.5,
///     // Longitude of ascending node
///     1.0,
///     // Argument of periapsis
///     2.0,
/// )?;
/// assert!((elements.get_periapsis() - 6300.0).abs() < 1e-9);
///
/// // Only elliptic orbits are supported
/// assert_eq!(
///     OrbitalElements::new(7000.0, 1.0, 0.0, 0.0, 0.0),
///     Err(OrbitError::InvalidEccentricity { value: 1.0 }),
/// );
/// # Ok::<(), OrbitError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawOrbitalElements")
)]
pub struct OrbitalElements {
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    long_asc_node: f64,
    arg_pe: f64,
}

impl OrbitalElements {
    /// Creates a new set of elements.
    ///
    /// # Parameters
    /// - `semi_major_axis`: in kilometers.
    /// - `eccentricity`: within `[0, 1)`.
    /// - `inclination`: in radians.
    /// - `long_asc_node`: the longitude of the ascending node, in radians.
    /// - `arg_pe`: the argument of periapsis, in radians.
    ///
    /// # Errors
    /// - [`OrbitError::InvalidSemiMajorAxis`] if the semi-major axis is not
    ///   positive and finite.
    /// - [`OrbitError::InvalidEccentricity`] if the eccentricity is outside
    ///   `[0, 1)`.
    /// - [`OrbitError::NonFiniteAngle`] if any angle is NaN or infinite.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        long_asc_node: f64,
        arg_pe: f64,
    ) -> Result<Self> {
        if !(semi_major_axis.is_finite() && semi_major_axis > 0.0) {
            return Err(OrbitError::InvalidSemiMajorAxis {
                value: semi_major_axis,
            });
        }
        validate_eccentricity(eccentricity)?;
        for angle in [inclination, long_asc_node, arg_pe] {
            if !angle.is_finite() {
                return Err(OrbitError::NonFiniteAngle { value: angle });
            }
        }

        Ok(Self {
            semi_major_axis,
            eccentricity,
            inclination,
            long_asc_node: normalize_angle(long_asc_node),
            arg_pe: normalize_angle(arg_pe),
        })
    }

    /// Creates a new set of elements from the periapsis and apoapsis
    /// distances instead of the semi-major axis and eccentricity.
    ///
    /// # Errors
    /// [`OrbitError::InvalidApsides`] if the apoapsis is below the periapsis
    /// or either is negative, on top of everything [`new`][Self::new]
    /// rejects. A zero periapsis and apoapsis is rejected as an
    /// [`OrbitError::InvalidSemiMajorAxis`].
    ///
    /// # Example
    /// ```
    /// use celestial_sandbox::{OrbitalElements, OrbitTrait};
    ///
    /// let elements = OrbitalElements::with_apsides(50.0, 150.0, 0.0, 0.0, 0.0).unwrap();
    /// assert_eq!(elements.get_semi_major_axis(), 100.0);
    /// assert_eq!(elements.get_eccentricity(), 0.5);
    /// ```
    pub fn with_apsides(
        periapsis: f64,
        apoapsis: f64,
        inclination: f64,
        long_asc_node: f64,
        arg_pe: f64,
    ) -> Result<Self> {
        let shape = elements_from_apsides(periapsis, apoapsis)?;

        Self::new(
            shape.semi_major_axis,
            shape.eccentricity,
            inclination,
            long_asc_node,
            arg_pe,
        )
    }
}

impl Default for OrbitalElements {
    /// A circular, equatorial orbit with a radius of 1 km.
    fn default() -> Self {
        Self {
            semi_major_axis: 1.0,
            eccentricity: 0.0,
            inclination: 0.0,
            long_asc_node: 0.0,
            arg_pe: 0.0,
        }
    }
}

impl OrbitTrait for OrbitalElements {
    fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    fn get_inclination(&self) -> f64 {
        self.inclination
    }

    fn get_long_asc_node(&self) -> f64 {
        self.long_asc_node
    }

    fn get_arg_pe(&self) -> f64 {
        self.arg_pe
    }

    fn get_transformation_matrix(&self) -> Matrix3x2 {
        transformation_matrix(self.arg_pe, self.inclination, self.long_asc_node)
    }
}

/// An orbiting body: its elements, how long one revolution takes, and
/// the solver used to locate it along the orbit at a given time.
///
/// Time is measured in seconds since a periapsis passage, so at `t = 0`
/// the body sits at its periapsis.
///
/// The rotation from the orbital plane into the inertial frame is computed
/// once on construction and reused for every query.
///
/// # Example
/// ```
/// use celestial_sandbox::{OrbitalElements, OrbitState};
///
/// let elements = OrbitalElements::new(7000.0, 0.0, 0.0, 0.0, 0.0).unwrap();
/// let state = OrbitState::new(elements, Some(5820.0), Some("Satellite".to_string())).unwrap();
///
/// // A quarter of the way around
/// let position = state.position_at(5820.0 / 4.0).unwrap();
/// assert!(position.x.abs() < 1e-6);
/// assert!((position.y - 7000.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawOrbitState")
)]
pub struct OrbitState {
    elements: OrbitalElements,
    orbital_period: f64,
    name: Option<String>,
    solver: KeplerSolver,
    // Rebuilt from the elements on deserialization
    #[cfg_attr(feature = "serde", serde(skip))]
    transformation_matrix: Matrix3x2,
}

impl OrbitState {
    /// Creates a new orbit state.
    ///
    /// `orbital_period` is in seconds, and defaults to
    /// [`DEFAULT_ORBITAL_PERIOD`] (365 days) when `None`.
    ///
    /// # Errors
    /// [`OrbitError::InvalidPeriod`] if the period is not positive and finite.
    pub fn new(
        elements: OrbitalElements,
        orbital_period: Option<f64>,
        name: Option<String>,
    ) -> Result<Self> {
        let orbital_period = orbital_period.unwrap_or(DEFAULT_ORBITAL_PERIOD);
        if !(orbital_period.is_finite() && orbital_period > 0.0) {
            return Err(OrbitError::InvalidPeriod {
                value: orbital_period,
            });
        }

        Ok(Self::from_parts(elements, orbital_period, name))
    }

    /// Creates a new orbit state whose period follows from Kepler's third
    /// law, `T = 2π·√(a³/μ)`.
    ///
    /// # Errors
    /// [`OrbitError::InvalidGravitationalParameter`] if `mu` is not positive.
    ///
    /// # Example
    /// ```
    /// use celestial_sandbox::{body_presets, OrbitalElements, OrbitState};
    ///
    /// let earth = body_presets::earth();
    /// let elements = OrbitalElements::new(6778.0, 0.0, 0.0, 0.0, 0.0).unwrap();
    /// let iss = OrbitState::with_gravitational_parameter(
    ///     elements,
    ///     earth.gravitational_parameter(),
    ///     Some("ISS".to_string()),
    /// )
    /// .unwrap();
    ///
    /// // Roughly an hour and a half
    /// assert!((iss.orbital_period() / 60.0 - 92.6).abs() < 0.5);
    /// ```
    pub fn with_gravitational_parameter(
        elements: OrbitalElements,
        mu: f64,
        name: Option<String>,
    ) -> Result<Self> {
        let orbital_period = period_from_semi_major_axis(elements.get_semi_major_axis(), mu)?;

        Ok(Self::from_parts(elements, orbital_period, name))
    }

    /// Replaces the solver used for time queries.
    pub fn with_solver(mut self, solver: KeplerSolver) -> Self {
        self.solver = solver;
        self
    }

    fn from_parts(elements: OrbitalElements, orbital_period: f64, name: Option<String>) -> Self {
        Self {
            transformation_matrix: elements.get_transformation_matrix(),
            elements,
            orbital_period,
            name,
            solver: KeplerSolver::default(),
        }
    }

    /// The elements of the orbit.
    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// The time one revolution takes, in seconds.
    pub fn orbital_period(&self) -> f64 {
        self.orbital_period
    }

    /// The display name of the orbiting body, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The solver used for time queries.
    pub fn solver(&self) -> KeplerSolver {
        self.solver
    }

    /// The mean anomaly `M = 2π·t / T` at time `t`, in radians.
    ///
    /// The value is not wrapped; it keeps increasing with time.
    pub fn mean_anomaly(&self, t: f64) -> f64 {
        TAU * t / self.orbital_period
    }

    /// Runs the solver for the mean anomaly at time `t`, returning the full
    /// outcome including the iteration count and whether it converged.
    pub fn kepler_solution(&self, t: f64) -> Result<KeplerSolution> {
        self.solver
            .solve(self.elements.get_eccentricity(), self.mean_anomaly(t))
    }

    /// The eccentric anomaly at time `t`, in radians.
    ///
    /// Like [`mean_anomaly`][Self::mean_anomaly], this grows by `τ` with
    /// every revolution.
    pub fn eccentric_anomaly(&self, t: f64) -> Result<f64> {
        Ok(self.kepler_solution(t)?.eccentric_anomaly)
    }

    /// The true anomaly at time `t`, in radians.
    ///
    /// Like [`mean_anomaly`][Self::mean_anomaly], this grows by `τ` with
    /// every revolution.
    pub fn true_anomaly(&self, t: f64) -> Result<f64> {
        true_anomaly_from_eccentric(self.elements.get_eccentricity(), self.eccentric_anomaly(t)?)
    }

    /// The position of the body at time `t`, in kilometers, relative to
    /// the attracting body.
    pub fn position_at(&self, t: f64) -> Result<DVec3> {
        self.get_position_at_true_anomaly(self.true_anomaly(t)?)
    }

    /// The velocity of the body at time `t`, in kilometers per second.
    ///
    /// The gravitational parameter `mu` (km³/s²) of the attracting body is
    /// not stored in the state and must be passed in.
    pub fn velocity_at(&self, t: f64, mu: f64) -> Result<DVec3> {
        self.get_velocity_at_true_anomaly(self.true_anomaly(t)?, mu)
    }

    /// The position and velocity of the body at time `t`.
    ///
    /// See [`velocity_at`][Self::velocity_at] for the meaning of `mu`.
    pub fn state_vectors_at(&self, t: f64, mu: f64) -> Result<StateVectors> {
        self.get_state_vectors_at_true_anomaly(self.true_anomaly(t)?, mu)
    }
}

/// The serialized form of [`OrbitalElements`], validated through
/// [`OrbitalElements::new`] before it becomes one.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawOrbitalElements {
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    long_asc_node: f64,
    arg_pe: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawOrbitalElements> for OrbitalElements {
    type Error = OrbitError;

    fn try_from(raw: RawOrbitalElements) -> Result<Self> {
        Self::new(
            raw.semi_major_axis,
            raw.eccentricity,
            raw.inclination,
            raw.long_asc_node,
            raw.arg_pe,
        )
    }
}

/// The serialized form of [`OrbitState`]. The transformation matrix is
/// not part of it.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawOrbitState {
    elements: OrbitalElements,
    orbital_period: f64,
    name: Option<String>,
    solver: KeplerSolver,
}

#[cfg(feature = "serde")]
impl TryFrom<RawOrbitState> for OrbitState {
    type Error = OrbitError;

    fn try_from(raw: RawOrbitState) -> Result<Self> {
        Ok(Self::new(raw.elements, Some(raw.orbital_period), raw.name)?.with_solver(raw.solver))
    }
}

impl From<OrbitalElements> for OrbitState {
    /// Wraps the elements in an unnamed state with the default period.
    fn from(elements: OrbitalElements) -> Self {
        Self::from_parts(elements, DEFAULT_ORBITAL_PERIOD, None)
    }
}

impl OrbitTrait for OrbitState {
    fn get_semi_major_axis(&self) -> f64 {
        self.elements.get_semi_major_axis()
    }

    fn get_eccentricity(&self) -> f64 {
        self.elements.get_eccentricity()
    }

    fn get_inclination(&self) -> f64 {
        self.elements.get_inclination()
    }

    fn get_long_asc_node(&self) -> f64 {
        self.elements.get_long_asc_node()
    }

    fn get_arg_pe(&self) -> f64 {
        self.elements.get_arg_pe()
    }

    fn get_transformation_matrix(&self) -> Matrix3x2 {
        self.transformation_matrix
    }
}

/// The position at time `t` of a body on an orbit with the given elements
/// and period.
///
/// This is a one-off version of [`OrbitState::position_at`] using the
/// default solver.
///
/// # Errors
/// [`OrbitError::InvalidPeriod`] if the period is not positive and finite.
///
/// # Example
/// ```
/// use celestial_sandbox::{position_at, OrbitalElements};
///
/// let elements = OrbitalElements::new(1.0, 0.0, 0.0, 0.0, 0.0).unwrap();
/// let half_way = position_at(&elements, 10.0, 5.0).unwrap();
/// assert!((half_way.x + 1.0).abs() < 1e-9);
/// ```
pub fn position_at(elements: &OrbitalElements, period: f64, t: f64) -> Result<DVec3> {
    let mean_anomaly = mean_anomaly_at(period, t)?;
    elements.get_position_at_mean_anomaly(mean_anomaly)
}
