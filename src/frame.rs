//! Rotations between the orbital plane and the inertial reference frame.
//!
//! The forward transform takes a vector in the perifocal (PQW) frame, where
//! the x axis points at the periapsis and the orbit lies in the xy plane, and
//! applies `R = Rz(Ω)·Rx(i)·Rz(ω)`:
//! 1. rotate by the argument of periapsis `ω` about the orbit normal,
//! 2. rotate by the inclination `i` about the x axis (the line of nodes),
//! 3. rotate by the longitude of the ascending node `Ω` about the z axis.
//!
//! Two inverses are provided. [`state_vector_to_elements`] is a narrow
//! approximation that reads Euler angles straight off the state vectors.
//! [`elements_from_state_vectors`] recovers the full osculating elements
//! through the angular momentum and eccentricity vectors.

use glam::{DMat3, DVec2, DVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    anomaly::{mean_anomaly_from_true, normalize_angle, validate_eccentricity},
    elements::{
        argument_of_periapsis_from_eccentricity_vector, distance_to_center,
        inclination_from_momentum, longitude_of_ascending_node_from_momentum,
    },
    Matrix3x2, OrbitError, OrbitTrait, OrbitalElements, Result, StateVectors,
};

/// How close `sin(i)` may get to zero before the narrow inverse gives up.
const GEOMETRY_TOLERANCE: f64 = 1e-9;

/// Eccentricities below this are treated as circular by the general inverse.
const CIRCULAR_TOLERANCE: f64 = 1e-11;

/// Node vectors shorter than this fraction of `|h|` are treated as equatorial.
const EQUATORIAL_TOLERANCE: f64 = 1e-11;

/// A right-handed rotation by `angle` radians about the x axis.
pub fn rotation_x(angle: f64) -> DMat3 {
    DMat3::from_rotation_x(angle)
}

/// A right-handed rotation by `angle` radians about the y axis.
pub fn rotation_y(angle: f64) -> DMat3 {
    DMat3::from_rotation_y(angle)
}

/// A right-handed rotation by `angle` radians about the z axis.
pub fn rotation_z(angle: f64) -> DMat3 {
    DMat3::from_rotation_z(angle)
}

/// The composite rotation `Rz(Ω)·Rx(i)·Rz(ω)` from the perifocal frame
/// into the inertial frame.
///
/// # Example
/// ```
/// use celestial_sandbox::frame::rotation_matrix;
/// use glam::DVec3;
///
/// // No rotation at all
/// let matrix = rotation_matrix(0.0, 0.0, 0.0);
/// assert_eq!(matrix * DVec3::X, DVec3::X);
/// ```
pub fn rotation_matrix(
    argument_of_periapsis: f64,
    inclination: f64,
    longitude_of_ascending_node: f64,
) -> DMat3 {
    rotation_z(longitude_of_ascending_node)
        * rotation_x(inclination)
        * rotation_z(argument_of_periapsis)
}

/// The first two columns of [`rotation_matrix`], which is all that is
/// needed to rotate in-plane vectors (their z component is always zero).
pub fn transformation_matrix(
    argument_of_periapsis: f64,
    inclination: f64,
    longitude_of_ascending_node: f64,
) -> Matrix3x2 {
    let (sin_inc, cos_inc) = inclination.sin_cos();
    let (sin_arg_pe, cos_arg_pe) = argument_of_periapsis.sin_cos();
    let (sin_lan, cos_lan) = longitude_of_ascending_node.sin_cos();

    // https://downloads.rene-schwarz.com/download/M001-Keplerian_Orbit_Elements_to_Cartesian_State_Vectors.pdf
    Matrix3x2 {
        e11: cos_arg_pe * cos_lan - sin_arg_pe * cos_inc * sin_lan,
        e12: -(sin_arg_pe * cos_lan + cos_arg_pe * cos_inc * sin_lan),

        e21: cos_arg_pe * sin_lan + sin_arg_pe * cos_inc * cos_lan,
        e22: cos_arg_pe * cos_inc * cos_lan - sin_arg_pe * sin_lan,

        e31: sin_arg_pe * sin_inc,
        e32: cos_arg_pe * sin_inc,
    }
}

/// Rotates an in-plane vector into the inertial frame, one elementary
/// rotation at a time.
///
/// This gives the same result as multiplying by [`rotation_matrix`];
/// prefer [`transformation_matrix`] when transforming many vectors with
/// the same angles.
///
/// # Example
/// ```
/// use celestial_sandbox::frame::to_inertial;
/// use glam::{DVec2, DVec3};
/// use std::f64::consts::FRAC_PI_2;
///
/// // Tilting the orbit by 90° sends its y axis up the z axis.
/// let v = to_inertial(DVec2::new(0.0, 1.0), 0.0, FRAC_PI_2, 0.0);
/// assert!((v - DVec3::Z).length() < 1e-12);
/// ```
pub fn to_inertial(
    vector: DVec2,
    argument_of_periapsis: f64,
    inclination: f64,
    longitude_of_ascending_node: f64,
) -> DVec3 {
    // argument of periapsis, about the orbit normal
    let (sin, cos) = argument_of_periapsis.sin_cos();
    let x = vector.x * cos - vector.y * sin;
    let y = vector.x * sin + vector.y * cos;

    // inclination, about the line of nodes
    let (sin, cos) = inclination.sin_cos();
    let z = y * sin;
    let y = y * cos;

    // longitude of ascending node, about the reference pole
    let (sin, cos) = longitude_of_ascending_node.sin_cos();
    DVec3::new(x * cos - y * sin, x * sin + y * cos, z)
}

/// The position in the perifocal frame at a given true anomaly,
/// `(r·cos ν, r·sin ν)` with `r` from [`distance_to_center`].
pub fn perifocal_position(
    semi_major_axis: f64,
    eccentricity: f64,
    true_anomaly: f64,
) -> Result<DVec2> {
    let radius = distance_to_center(semi_major_axis, eccentricity, true_anomaly)?;
    let (sin, cos) = true_anomaly.sin_cos();

    Ok(DVec2::new(radius * cos, radius * sin))
}

/// The velocity in the perifocal frame at a given true anomaly.
///
/// `v = √(μ/p)·(−sin ν, e + cos ν)`, where `p = a·(1−e²)` is the
/// semi-latus rectum.
///
/// The argument of periapsis does not appear here: the rotation by ω is
/// applied afterwards by the frame transform, together with `i` and `Ω`.
///
/// # Errors
/// - [`OrbitError::InvalidEccentricity`] if `e` is outside `[0, 1)`.
/// - [`OrbitError::InvalidSemiMajorAxis`] if `a` is not positive.
/// - [`OrbitError::InvalidGravitationalParameter`] if `μ` is not positive.
pub fn perifocal_velocity(
    semi_major_axis: f64,
    eccentricity: f64,
    true_anomaly: f64,
    mu: f64,
) -> Result<DVec2> {
    validate_eccentricity(eccentricity)?;
    if !(semi_major_axis.is_finite() && semi_major_axis > 0.0) {
        return Err(OrbitError::InvalidSemiMajorAxis {
            value: semi_major_axis,
        });
    }
    if !(mu.is_finite() && mu > 0.0) {
        return Err(OrbitError::InvalidGravitationalParameter { value: mu });
    }

    let semi_latus_rectum = semi_major_axis * (1.0 - eccentricity * eccentricity);
    let factor = (mu / semi_latus_rectum).sqrt();
    let (sin, cos) = true_anomaly.sin_cos();

    Ok(DVec2::new(-factor * sin, factor * (eccentricity + cos)))
}

/// The position and velocity of a body at a given true anomaly, rotated
/// into the inertial frame.
///
/// Both vectors go through the same [`transformation_matrix`] of the orbit.
pub fn state_vectors<O: OrbitTrait + ?Sized>(
    orbit: &O,
    true_anomaly: f64,
    mu: f64,
) -> Result<StateVectors> {
    let semi_major_axis = orbit.get_semi_major_axis();
    let eccentricity = orbit.get_eccentricity();

    let position = perifocal_position(semi_major_axis, eccentricity, true_anomaly)?;
    let velocity = perifocal_velocity(semi_major_axis, eccentricity, true_anomaly, mu)?;

    Ok(StateVectors {
        position: orbit.transform_pqw_vector(position),
        velocity: orbit.transform_pqw_vector(velocity),
    })
}

/// Euler angles read back from a pair of state vectors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EulerAngles {
    /// The inclination, in radians.
    pub inclination: f64,
    /// The longitude of the ascending node, in radians, within `[0, τ)`.
    pub longitude_of_ascending_node: f64,
    /// The argument of periapsis, in radians, within `[0, τ)`.
    pub argument_of_periapsis: f64,
}

/// Reads Euler angles directly off a position and velocity.
///
/// - `i = acos(z / |r|)`
/// - `Ω = atan2(y, x)`
/// - `ω = atan2(v_z, v_x) − Ω`
///
/// Ω and ω are wrapped into `[0, τ)`.
///
/// # Limitations
/// This is a quick approximation, not a general inverse of the forward
/// transform: it only recovers the angles along the particular geometry
/// it was derived for. Use [`elements_from_state_vectors`] for a proper
/// inverse.
///
/// # Errors
/// - [`OrbitError::DegenerateOrbit`] if the position is at the origin.
/// - [`OrbitError::DegenerateGeometry`] if the inclination comes out
///   within numerical tolerance of `0` or `π`, where Ω is undefined.
pub fn state_vector_to_elements(position: DVec3, velocity: DVec3) -> Result<EulerAngles> {
    let radius = position.length();
    if !(radius.is_finite() && radius > 0.0) {
        return Err(OrbitError::DegenerateOrbit);
    }

    let inclination = (position.z / radius).clamp(-1.0, 1.0).acos();
    if inclination.sin().abs() < GEOMETRY_TOLERANCE {
        debug!(inclination, "rejecting state vectors with undefined ascending node");
        return Err(OrbitError::DegenerateGeometry { inclination });
    }

    let long_asc_node = position.y.atan2(position.x);
    let arg_pe = velocity.z.atan2(velocity.x) - long_asc_node;

    Ok(EulerAngles {
        inclination,
        longitude_of_ascending_node: normalize_angle(long_asc_node),
        argument_of_periapsis: normalize_angle(arg_pe),
    })
}

/// Osculating orbital elements recovered from state vectors, together
/// with where along the orbit the state vectors were taken.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OsculatingElements {
    /// The orbit the state vectors lie on.
    pub elements: OrbitalElements,
    /// The true anomaly of the position, in radians, within `[0, τ)`.
    pub true_anomaly: f64,
}

impl OsculatingElements {
    /// The mean anomaly of the position, in radians.
    pub fn mean_anomaly(&self) -> Result<f64> {
        mean_anomaly_from_true(self.elements.get_eccentricity(), self.true_anomaly)
    }
}

/// Recovers the orbital elements from a position and velocity, given the
/// gravitational parameter of the attracting body.
///
/// Reference:
/// <https://orbital-mechanics.space/classical-orbital-elements/orbital-elements-and-the-state-vector.html>
///
/// # Conventions
/// - Circular orbits have no periapsis; the argument of periapsis is set
///   to zero and the true anomaly is measured from the ascending node.
/// - Equatorial orbits have no ascending node; its longitude is set to
///   zero and the argument of periapsis is measured from the x axis.
///
/// # Errors
/// - [`OrbitError::InvalidGravitationalParameter`] if `μ` is not positive.
/// - [`OrbitError::DegenerateOrbit`] if the position is at the origin or the
///   angular momentum is zero (radial motion).
/// - [`OrbitError::InvalidEccentricity`] if the state vectors describe a
///   parabolic or hyperbolic trajectory.
pub fn elements_from_state_vectors(
    state_vectors: StateVectors,
    mu: f64,
) -> Result<OsculatingElements> {
    if !(mu.is_finite() && mu > 0.0) {
        return Err(OrbitError::InvalidGravitationalParameter { value: mu });
    }

    let StateVectors { position, velocity } = state_vectors;

    let radius = position.length();
    if !(radius.is_finite() && radius > 0.0) {
        return Err(OrbitError::DegenerateOrbit);
    }

    // Orbital angular momentum
    let momentum = position.cross(velocity);
    let inclination = inclination_from_momentum(momentum)?;
    let momentum_len = momentum.length();
    let normal = momentum / momentum_len;

    // Node vector: z cross h
    let node = DVec3::new(-momentum.y, momentum.x, 0.0);
    let equatorial = node.length() <= EQUATORIAL_TOLERANCE * momentum_len;

    // Eccentricity vector
    let eccentricity_vector = velocity.cross(momentum) / mu - position / radius;
    let eccentricity = eccentricity_vector.length();
    validate_eccentricity(eccentricity)?;
    let circular = eccentricity < CIRCULAR_TOLERANCE;

    let semi_major_axis = momentum_len * momentum_len / mu / (1.0 - eccentricity * eccentricity);

    let long_asc_node = if equatorial {
        0.0
    } else {
        longitude_of_ascending_node_from_momentum(momentum)?
    };

    // Signed angle from `from` to `to`, measured in the direction of motion
    let angle_in_plane = |from: DVec3, to: DVec3| -> f64 {
        normalize_angle(from.cross(to).dot(normal).atan2(from.dot(to)))
    };

    let arg_pe = if circular {
        0.0
    } else if equatorial {
        let angle = argument_of_periapsis_from_eccentricity_vector(eccentricity_vector)?;
        // A retrograde plane is flipped over the x axis
        if momentum.z < 0.0 {
            normalize_angle(-angle)
        } else {
            angle
        }
    } else {
        angle_in_plane(node, eccentricity_vector)
    };

    let reference = match (circular, equatorial) {
        (false, _) => eccentricity_vector,
        (true, false) => node,
        (true, true) => DVec3::X,
    };
    let true_anomaly = angle_in_plane(reference, position);

    Ok(OsculatingElements {
        elements: OrbitalElements::new(
            semi_major_axis,
            eccentricity,
            inclination,
            long_asc_node,
            arg_pe,
        )?,
        true_anomaly,
    })
}
