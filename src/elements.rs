//! Derives orbital elements from other, more readily available quantities.
//!
//! Distances are in kilometers, times in seconds, angles in radians and
//! gravitational parameters in km³/s².
//!
//! Each function checks its domain and returns an [`OrbitError`] instead of
//! letting a zero denominator turn into a `NaN` or an infinity.

use core::f64::consts::TAU;

use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    anomaly::{normalize_angle, validate_eccentricity},
    OrbitError, Result,
};

/// The size and shape of an orbit, derived from its apsides.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ApsidalShape {
    /// The semi-major axis, in kilometers.
    pub semi_major_axis: f64,
    /// The eccentricity.
    pub eccentricity: f64,
}

/// The orientation of an orbital plane, derived from its angular momentum.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodalOrientation {
    /// The inclination, in radians, within `[0, π]`.
    pub inclination: f64,
    /// The longitude of the ascending node, in radians, within `[0, τ)`.
    pub longitude_of_ascending_node: f64,
}

fn validate_apsides(periapsis: f64, apoapsis: f64) -> Result<()> {
    let valid = periapsis.is_finite()
        && apoapsis.is_finite()
        && periapsis >= 0.0
        && apoapsis >= periapsis
        && apoapsis + periapsis > 0.0;

    if valid {
        Ok(())
    } else {
        Err(OrbitError::InvalidApsides {
            periapsis,
            apoapsis,
        })
    }
}

fn validate_semi_major_axis(semi_major_axis: f64) -> Result<()> {
    if semi_major_axis.is_finite() && semi_major_axis > 0.0 {
        Ok(())
    } else {
        Err(OrbitError::InvalidSemiMajorAxis {
            value: semi_major_axis,
        })
    }
}

fn validate_mu(mu: f64) -> Result<()> {
    if mu.is_finite() && mu > 0.0 {
        Ok(())
    } else {
        Err(OrbitError::InvalidGravitationalParameter { value: mu })
    }
}

fn validate_period(period: f64) -> Result<()> {
    if period.is_finite() && period > 0.0 {
        Ok(())
    } else {
        Err(OrbitError::InvalidPeriod { value: period })
    }
}

/// Gets the eccentricity of an orbit from its periapsis and apoapsis.
///
/// `e = (apoapsis − periapsis) / (apoapsis + periapsis)`
///
/// # Errors
/// [`OrbitError::InvalidApsides`] unless `apoapsis ≥ periapsis ≥ 0`
/// and at least one of them is non-zero.
///
/// # Example
/// ```
/// use celestial_sandbox::{elements::eccentricity_from_apsides, OrbitError};
///
/// assert_eq!(eccentricity_from_apsides(50.0, 150.0), Ok(0.5));
/// assert!(matches!(
///     eccentricity_from_apsides(100.0, 50.0),
///     Err(OrbitError::InvalidApsides { .. })
/// ));
/// ```
pub fn eccentricity_from_apsides(periapsis: f64, apoapsis: f64) -> Result<f64> {
    validate_apsides(periapsis, apoapsis)?;
    Ok((apoapsis - periapsis) / (apoapsis + periapsis))
}

/// Gets the semi-major axis of an orbit from its periapsis and apoapsis.
///
/// This is just their average.
pub fn semi_major_axis_from_apsides(periapsis: f64, apoapsis: f64) -> Result<f64> {
    validate_apsides(periapsis, apoapsis)?;
    Ok((periapsis + apoapsis) * 0.5)
}

/// Gets both the semi-major axis and the eccentricity from the apsides.
pub fn elements_from_apsides(periapsis: f64, apoapsis: f64) -> Result<ApsidalShape> {
    Ok(ApsidalShape {
        semi_major_axis: semi_major_axis_from_apsides(periapsis, apoapsis)?,
        eccentricity: eccentricity_from_apsides(periapsis, apoapsis)?,
    })
}

/// Gets the periapsis (closest distance to the attracting body), `a·(1−e)`.
pub fn periapsis_from_semi_major_axis(semi_major_axis: f64, eccentricity: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    Ok(semi_major_axis * (1.0 - eccentricity))
}

/// Gets the apoapsis (farthest distance from the attracting body), `a·(1+e)`.
pub fn apoapsis_from_semi_major_axis(semi_major_axis: f64, eccentricity: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    Ok(semi_major_axis * (1.0 + eccentricity))
}

/// Gets the semi-major axis from the eccentricity and periapsis, `rp / (1−e)`.
pub fn semi_major_axis_from_periapsis(eccentricity: f64, periapsis: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    Ok(periapsis / (1.0 - eccentricity))
}

/// Gets the semi-major axis from the eccentricity and apoapsis, `ra / (1+e)`.
pub fn semi_major_axis_from_apoapsis(eccentricity: f64, apoapsis: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    Ok(apoapsis / (1.0 + eccentricity))
}

/// Gets the semi-minor axis, `a·√(1−e²)`.
pub fn semi_minor_axis(semi_major_axis: f64, eccentricity: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    Ok(semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt())
}

/// Gets the major axis, the widest diameter of the ellipse.
pub fn major_axis(semi_major_axis: f64) -> f64 {
    2.0 * semi_major_axis
}

/// Gets the semi-major axis from the orbital period using Kepler's third law.
///
/// `a = (μ·T² / 4π²)^(1/3)`
///
/// # Example
/// ```
/// use celestial_sandbox::elements::{period_from_semi_major_axis, semi_major_axis_from_period};
///
/// let mu = 398_600.4418;
/// let period = period_from_semi_major_axis(42_164.0, mu).unwrap();
/// let sma = semi_major_axis_from_period(period, mu).unwrap();
///
/// assert!((sma - 42_164.0).abs() < 1e-6);
/// ```
pub fn semi_major_axis_from_period(period: f64, mu: f64) -> Result<f64> {
    validate_period(period)?;
    validate_mu(mu)?;

    Ok((mu * period * period / (TAU * TAU)).cbrt())
}

/// Gets the orbital period from the semi-major axis, `T = 2π·√(a³/μ)`.
pub fn period_from_semi_major_axis(semi_major_axis: f64, mu: f64) -> Result<f64> {
    validate_semi_major_axis(semi_major_axis)?;
    validate_mu(mu)?;

    Ok(TAU * (semi_major_axis.powi(3) / mu).sqrt())
}

/// Gets the mean motion (average angular speed, in rad/s), `n = √(μ/a³)`.
pub fn mean_motion(semi_major_axis: f64, mu: f64) -> Result<f64> {
    validate_semi_major_axis(semi_major_axis)?;
    validate_mu(mu)?;

    Ok((mu / semi_major_axis.powi(3)).sqrt())
}

/// Gets the semi-major axis from the mean motion, `a = (μ/n²)^(1/3)`.
pub fn semi_major_axis_from_mean_motion(mean_motion: f64, mu: f64) -> Result<f64> {
    if !mean_motion.is_finite() || mean_motion == 0.0 {
        return Err(OrbitError::InvalidMeanMotion { value: mean_motion });
    }
    validate_mu(mu)?;

    Ok((mu / (mean_motion * mean_motion)).cbrt())
}

/// Gets the speed at a given distance from the attracting body, using
/// the vis-viva equation `v = √(μ·(2/r − 1/a))`.
///
/// # Errors
/// - [`OrbitError::InvalidDistance`] if `r` is not positive, or beyond the
///   apoapsis of any orbit with that semi-major axis (`r > 2a`).
/// - [`OrbitError::InvalidSemiMajorAxis`] / [`OrbitError::InvalidGravitationalParameter`].
pub fn orbital_speed(distance: f64, semi_major_axis: f64, mu: f64) -> Result<f64> {
    validate_semi_major_axis(semi_major_axis)?;
    validate_mu(mu)?;
    if !(distance.is_finite() && distance > 0.0 && distance <= 2.0 * semi_major_axis) {
        return Err(OrbitError::InvalidDistance { value: distance });
    }

    Ok((mu * (2.0 / distance - 1.0 / semi_major_axis)).sqrt())
}

/// Gets the inclination from the orbital angular momentum vector.
///
/// `i = acos(h_z / |h|)`
///
/// # Errors
/// [`OrbitError::DegenerateOrbit`] for a zero vector, which describes a
/// radial trajectory that these elements cannot represent.
pub fn inclination_from_momentum(momentum: DVec3) -> Result<f64> {
    let length = momentum.length();
    if !(length.is_finite() && length > 0.0) {
        return Err(OrbitError::DegenerateOrbit);
    }

    // Rounding can push the ratio a hair outside of [-1, 1]
    Ok((momentum.z / length).clamp(-1.0, 1.0).acos())
}

/// Gets the longitude of the ascending node from the orbital angular
/// momentum vector.
///
/// `Ω = atan2(h_x, −h_y)`, wrapped into `[0, τ)`.
///
/// An equatorial orbit (momentum along the z axis) has no ascending node;
/// zero is returned for it by convention.
///
/// # Errors
/// [`OrbitError::DegenerateOrbit`] for a zero vector.
pub fn longitude_of_ascending_node_from_momentum(momentum: DVec3) -> Result<f64> {
    if !(momentum.length().is_finite() && momentum != DVec3::ZERO) {
        return Err(OrbitError::DegenerateOrbit);
    }
    if momentum.x == 0.0 && momentum.y == 0.0 {
        return Ok(0.0);
    }

    Ok(normalize_angle(momentum.x.atan2(-momentum.y)))
}

/// Gets the inclination and longitude of the ascending node together.
pub fn elements_from_momentum(momentum: DVec3) -> Result<NodalOrientation> {
    Ok(NodalOrientation {
        inclination: inclination_from_momentum(momentum)?,
        longitude_of_ascending_node: longitude_of_ascending_node_from_momentum(momentum)?,
    })
}

/// Gets the argument of periapsis from the eccentricity vector.
///
/// `ω = atan2(e_y, e_x)`, wrapped into `[0, τ)`.
///
/// This measures the angle in the reference plane from the x axis, so it
/// only equals the argument of periapsis for equatorial orbits. For
/// inclined orbits it is the longitude of periapsis.
///
/// Only the x and y components are used; any z component is ignored.
///
/// # Errors
/// [`OrbitError::DegenerateOrbit`] for a vector with no component in the
/// reference plane (`e_x = e_y = 0`). This covers the zero vector of a
/// circular orbit, which has no periapsis direction.
pub fn argument_of_periapsis_from_eccentricity_vector(eccentricity_vector: DVec3) -> Result<f64> {
    if eccentricity_vector.x == 0.0 && eccentricity_vector.y == 0.0 {
        return Err(OrbitError::DegenerateOrbit);
    }

    Ok(normalize_angle(
        eccentricity_vector.y.atan2(eccentricity_vector.x),
    ))
}

/// Gets the argument of periapsis from the longitude of periapsis and the
/// longitude of the ascending node, `ω = ϖ − Ω`.
pub fn argument_of_periapsis_from_longitude(
    longitude_of_periapsis: f64,
    longitude_of_ascending_node: f64,
) -> f64 {
    longitude_of_periapsis - longitude_of_ascending_node
}

/// Gets the distance from the attracting body at a given true anomaly.
///
/// `r = a·(1−e²) / (1 + e·cos ν)`
///
/// The denominator is at least `1 − e`, which is positive for every
/// valid eccentricity.
///
/// # Example
/// ```
/// use celestial_sandbox::elements::distance_to_center;
///
/// let periapsis = distance_to_center(100.0, 0.5, 0.0).unwrap();
/// let apoapsis = distance_to_center(100.0, 0.5, std::f64::consts::PI).unwrap();
///
/// assert!((periapsis - 50.0).abs() < 1e-9);
/// assert!((apoapsis - 150.0).abs() < 1e-9);
/// ```
pub fn distance_to_center(semi_major_axis: f64, eccentricity: f64, true_anomaly: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    if !true_anomaly.is_finite() {
        return Err(OrbitError::NonFiniteAngle {
            value: true_anomaly,
        });
    }

    Ok(semi_major_axis * (1.0 - eccentricity * eccentricity)
        / (1.0 + eccentricity * true_anomaly.cos()))
}
