#![cfg(test)]

use glam::{DVec2, DVec3};

use crate::{
    anomaly::{
        eccentric_anomaly_from_mean, eccentric_anomaly_from_true, mean_anomaly_at,
        mean_anomaly_from_eccentric, mean_anomaly_from_true, normalize_angle, solve_kepler,
        true_anomaly_from_eccentric, true_anomaly_from_mean,
    },
    body_presets,
    constants::{
        gravitational_parameter_from_mass, km_to_parsec, parsec_to_km, DEFAULT_ORBITAL_PERIOD,
        SOLAR_RADIUS,
    },
    elements::{
        apoapsis_from_semi_major_axis, argument_of_periapsis_from_eccentricity_vector,
        argument_of_periapsis_from_longitude, distance_to_center, elements_from_apsides,
        elements_from_momentum, major_axis, mean_motion, orbital_speed,
        period_from_semi_major_axis, periapsis_from_semi_major_axis, semi_major_axis_from_apoapsis,
        semi_major_axis_from_mean_motion, semi_major_axis_from_period,
        semi_major_axis_from_periapsis, semi_minor_axis,
    },
    frame::{
        rotation_matrix, rotation_x, rotation_y, rotation_z, state_vector_to_elements,
        to_inertial, transformation_matrix,
    },
    position_at,
    star::StarRanges,
    BodyKind, CelestialBody, KeplerSolver, LifecycleStage, OrbitError, OrbitState,
    OrbitTrait, OrbitalElements, StarType, StateVectors,
};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

const ORBIT_POLL_ANGLES: usize = 4096;
const RANDOM_ITERS: usize = 256;


use assertions::*;
use polling::*;
use seeders::*;

const ECCENTRICITIES: [f64; 7] = [0.0, 0.01, 0.1, 0.5, 0.9, 0.99, 0.9999];

const ANGLES: [f64; 11] = [
    -3.0 * TAU - 0.1,
    -PI,
    -1.0,
    0.0,
    1e-9,
    0.5,
    FRAC_PI_2,
    PI,
    4.0,
    TAU,
    3.0 * TAU + 0.1,
];

fn unit_orbit() -> OrbitalElements {
    OrbitalElements::default()
}

// Anomalies

#[test]
fn mean_eccentric_round_trip() {
    for e in ECCENTRICITIES {
        for mean_anomaly in ANGLES {
            let eccentric_anomaly = eccentric_anomaly_from_mean(e, mean_anomaly).unwrap();
            let round_trip = mean_anomaly_from_eccentric(e, eccentric_anomaly).unwrap();

            assert_almost_eq(
                round_trip,
                mean_anomaly,
                &format!("M -> E -> M for e = {e}, M = {mean_anomaly}"),
            );
        }
    }
}

#[test]
fn true_eccentric_round_trip() {
    for e in ECCENTRICITIES {
        for true_anomaly in ANGLES {
            let eccentric_anomaly = eccentric_anomaly_from_true(e, true_anomaly).unwrap();
            let round_trip = true_anomaly_from_eccentric(e, eccentric_anomaly).unwrap();

            assert_almost_eq_angle(
                round_trip,
                true_anomaly,
                &format!("ν -> E -> ν for e = {e}, ν = {true_anomaly}"),
            );
        }
    }
}

#[test]
fn mean_true_round_trip() {
    for e in ECCENTRICITIES {
        for mean_anomaly in ANGLES {
            let true_anomaly = true_anomaly_from_mean(e, mean_anomaly).unwrap();
            let round_trip = mean_anomaly_from_true(e, true_anomaly).unwrap();

            assert_almost_eq_angle(
                round_trip,
                mean_anomaly,
                &format!("M -> ν -> M for e = {e}, M = {mean_anomaly}"),
            );
        }
    }
}

#[test]
fn unwrapped_anomalies_stay_in_revolution() {
    let e = 0.3;
    let mean_anomaly = 3.0 * TAU + 0.1;

    let eccentric_anomaly = solve_kepler(e, mean_anomaly).unwrap();
    assert!(
        eccentric_anomaly > 3.0 * TAU && eccentric_anomaly < 3.0 * TAU + PI,
        "E = {eccentric_anomaly} should be a little past 3τ"
    );

    let true_anomaly = true_anomaly_from_eccentric(e, eccentric_anomaly).unwrap();
    assert!(
        true_anomaly > 3.0 * TAU && true_anomaly < 3.0 * TAU + PI,
        "ν = {true_anomaly} should be a little past 3τ"
    );
}

#[test]
fn circular_anomalies_coincide() {
    for mean_anomaly in ANGLES {
        let eccentric_anomaly = solve_kepler(0.0, mean_anomaly).unwrap();
        assert_almost_eq(
            eccentric_anomaly,
            mean_anomaly,
            &format!("E vs M on a circular orbit, M = {mean_anomaly}"),
        );

        let true_anomaly = true_anomaly_from_eccentric(0.0, eccentric_anomaly).unwrap();
        assert_almost_eq(
            true_anomaly,
            mean_anomaly,
            &format!("ν vs M on a circular orbit, M = {mean_anomaly}"),
        );
    }
}

#[test]
fn kepler_solver_residual() {
    let solver = KeplerSolver::default();

    for _ in 0..RANDOM_ITERS {
        let e = rand::random_range(0.0..0.9999);
        let mean_anomaly = rand::random_range(-20.0..20.0);

        let solution = solver.solve(e, mean_anomaly).unwrap();
        assert!(
            solution.converged,
            "solver did not converge for e = {e}, M = {mean_anomaly}: {solution:?}"
        );

        let residual =
            (solution.eccentric_anomaly - e * solution.eccentric_anomaly.sin() - mean_anomaly).abs();
        assert!(
            residual < 1e-8,
            "residual {residual} too large for e = {e}, M = {mean_anomaly}"
        );
        assert_eq!(solution.require_converged(), Ok(solution.eccentric_anomaly));
    }
}

#[test]
fn kepler_solver_near_parabolic() {
    for mean_anomaly in [1e-12, 1e-6, 1e-3, 0.01, 0.1, 1.0, 3.1] {
        let solution = KeplerSolver::default().solve(0.9999, mean_anomaly).unwrap();

        assert!(
            solution.converged,
            "no convergence near parabola at M = {mean_anomaly}: {solution:?}"
        );
        assert!(solution.iterations <= 100);
    }
}

#[test]
fn kepler_solver_iteration_cap() {
    let solver = KeplerSolver::new(1e-8, 2);
    let solution = solver.solve(0.99, 0.2).unwrap();

    assert!(!solution.converged);
    assert_eq!(solution.iterations, 2);
    assert!(solution.eccentric_anomaly.is_finite());
    assert!(matches!(
        solution.require_converged(),
        Err(OrbitError::SolverNonConvergence { iterations: 2, .. })
    ));

    let untouched = KeplerSolver::default()
        .with_max_iterations(0)
        .solve(0.5, 1.0)
        .unwrap();
    assert_eq!(untouched.eccentric_anomaly, 1.0);
    assert_eq!(untouched.iterations, 0);
}

#[test]
fn anomaly_rejects_bad_input() {
    for e in [1.0, 1.5, -0.1, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(
                solve_kepler(e, 0.5),
                Err(OrbitError::InvalidEccentricity { .. })
            ),
            "e = {e} should be rejected"
        );
        assert!(matches!(
            true_anomaly_from_eccentric(e, 0.5),
            Err(OrbitError::InvalidEccentricity { .. })
        ));
    }

    assert!(matches!(
        solve_kepler(0.5, f64::NAN),
        Err(OrbitError::NonFiniteAngle { .. })
    ));
    assert_eq!(
        mean_anomaly_at(0.0, 1.0),
        Err(OrbitError::InvalidPeriod { value: 0.0 })
    );
    assert_almost_eq(mean_anomaly_at(10.0, 2.5).unwrap(), FRAC_PI_2, "mean anomaly");
}

#[test]
fn normalized_angles() {
    for angle in ANGLES {
        let normalized = normalize_angle(angle);
        assert!(
            (0.0..TAU).contains(&normalized),
            "{angle} normalized to {normalized}"
        );
        assert_almost_eq_angle(normalized, angle, "normalized angle");
    }
    assert_eq!(normalize_angle(-1e-20), 0.0);
}

// Element algebra

#[test]
fn apsides_conversions() {
    let shape = elements_from_apsides(50.0, 150.0).unwrap();
    assert_eq!(shape.semi_major_axis, 100.0);
    assert_eq!(shape.eccentricity, 0.5);

    let circle = elements_from_apsides(100.0, 100.0).unwrap();
    assert_eq!(circle.eccentricity, 0.0);
    assert_eq!(circle.semi_major_axis, 100.0);

    assert_eq!(
        elements_from_apsides(150.0, 50.0),
        Err(OrbitError::InvalidApsides {
            periapsis: 150.0,
            apoapsis: 50.0
        })
    );
    assert!(matches!(
        elements_from_apsides(-1.0, 10.0),
        Err(OrbitError::InvalidApsides { .. })
    ));
    assert!(matches!(
        elements_from_apsides(0.0, 0.0),
        Err(OrbitError::InvalidApsides { .. })
    ));

    // A zero periapsis is a valid shape but not a valid ellipse
    assert!(matches!(
        OrbitalElements::with_apsides(0.0, 10.0, 0.0, 0.0, 0.0),
        Err(OrbitError::InvalidEccentricity { .. })
    ));
}

#[test]
fn apsides_consistency() {
    for _ in 0..RANDOM_ITERS {
        let orbit = random_elliptic();
        let a = orbit.get_semi_major_axis();
        let e = orbit.get_eccentricity();

        let periapsis = periapsis_from_semi_major_axis(a, e).unwrap();
        let apoapsis = apoapsis_from_semi_major_axis(a, e).unwrap();

        assert_almost_eq_rescale(periapsis, orbit.get_periapsis(), "periapsis");
        assert_almost_eq_rescale(apoapsis, orbit.get_apoapsis(), "apoapsis");
        assert_almost_eq_rescale(
            semi_major_axis_from_periapsis(e, periapsis).unwrap(),
            a,
            "a from periapsis",
        );
        assert_almost_eq_rescale(
            semi_major_axis_from_apoapsis(e, apoapsis).unwrap(),
            a,
            "a from apoapsis",
        );

        let shape = elements_from_apsides(periapsis, apoapsis).unwrap();
        assert_almost_eq_rescale(shape.semi_major_axis, a, "a from apsides");
        assert_almost_eq(shape.eccentricity, e, "e from apsides");

        assert_almost_eq_rescale(
            distance_to_center(a, e, 0.0).unwrap(),
            periapsis,
            "distance at ν = 0",
        );
        assert_almost_eq_rescale(
            distance_to_center(a, e, PI).unwrap(),
            apoapsis,
            "distance at ν = π",
        );
        assert_almost_eq_rescale(
            orbit.get_linear_eccentricity(),
            a * e,
            "linear eccentricity",
        );
    }
}

#[test]
fn axes() {
    assert_almost_eq(semi_minor_axis(100.0, 0.6).unwrap(), 80.0, "semi-minor axis");
    assert_eq!(major_axis(100.0), 200.0);
    assert!(matches!(
        semi_minor_axis(100.0, 1.0),
        Err(OrbitError::InvalidEccentricity { .. })
    ));

    let orbit = OrbitalElements::new(100.0, 0.6, 0.0, 0.0, 0.0).unwrap();
    assert_almost_eq(orbit.get_semi_minor_axis(), 80.0, "semi-minor axis getter");
    assert_almost_eq(orbit.get_semi_latus_rectum(), 64.0, "semi-latus rectum");
}

#[test]
fn period_and_mean_motion() {
    for _ in 0..RANDOM_ITERS {
        let a = rand::random_range(1.0..1e8);
        let mu = random_mu();

        let period = period_from_semi_major_axis(a, mu).unwrap();
        let n = mean_motion(a, mu).unwrap();

        assert_almost_eq(n * period, TAU, "n·T");
        assert_almost_eq_rescale(
            semi_major_axis_from_period(period, mu).unwrap(),
            a,
            "a from period",
        );
        assert_almost_eq_rescale(
            semi_major_axis_from_mean_motion(n, mu).unwrap(),
            a,
            "a from mean motion",
        );
    }

    assert_eq!(
        period_from_semi_major_axis(1.0, 0.0),
        Err(OrbitError::InvalidGravitationalParameter { value: 0.0 })
    );
    assert_eq!(
        semi_major_axis_from_period(-1.0, 1.0),
        Err(OrbitError::InvalidPeriod { value: -1.0 })
    );
    assert_eq!(
        semi_major_axis_from_mean_motion(0.0, 1.0),
        Err(OrbitError::InvalidMeanMotion { value: 0.0 })
    );
    assert_eq!(
        period_from_semi_major_axis(-5.0, 1.0),
        Err(OrbitError::InvalidSemiMajorAxis { value: -5.0 })
    );
}

#[test]
fn circular_speed() {
    let mu = 398_600.0;
    let r = 7000.0;

    assert_almost_eq(
        orbital_speed(r, r, mu).unwrap(),
        (mu / r).sqrt(),
        "circular speed",
    );
    assert_eq!(
        orbital_speed(0.0, r, mu),
        Err(OrbitError::InvalidDistance { value: 0.0 })
    );
    assert!(matches!(
        orbital_speed(2.5 * r, r, mu),
        Err(OrbitError::InvalidDistance { .. })
    ));
}

#[test]
fn angles_from_momentum() {
    let equatorial = elements_from_momentum(DVec3::Z).unwrap();
    assert_eq!(equatorial.inclination, 0.0);
    assert_eq!(equatorial.longitude_of_ascending_node, 0.0);

    let retrograde = elements_from_momentum(DVec3::new(0.0, 0.0, -3.0)).unwrap();
    assert_almost_eq(retrograde.inclination, PI, "retrograde inclination");
    assert_eq!(retrograde.longitude_of_ascending_node, 0.0);

    // Orbit plane is the xz plane, crossing upward along +x
    let polar = elements_from_momentum(DVec3::new(0.0, -2.0, 0.0)).unwrap();
    assert_almost_eq(polar.inclination, FRAC_PI_2, "polar inclination");
    assert_almost_eq(polar.longitude_of_ascending_node, 0.0, "polar node");

    let tilted = elements_from_momentum(DVec3::new(1.0, 0.0, 1.0)).unwrap();
    assert_almost_eq(tilted.inclination, PI / 4.0, "tilted inclination");
    assert_almost_eq(tilted.longitude_of_ascending_node, FRAC_PI_2, "tilted node");

    assert_eq!(
        elements_from_momentum(DVec3::ZERO),
        Err(OrbitError::DegenerateOrbit)
    );
}

#[test]
fn periapsis_direction() {
    assert_almost_eq(
        argument_of_periapsis_from_eccentricity_vector(DVec3::new(0.0, 0.2, 0.0)).unwrap(),
        FRAC_PI_2,
        "periapsis along +y",
    );
    assert_almost_eq(
        argument_of_periapsis_from_eccentricity_vector(DVec3::new(0.0, -0.2, 0.0)).unwrap(),
        1.5 * PI,
        "periapsis along -y",
    );
    assert_eq!(
        argument_of_periapsis_from_eccentricity_vector(DVec3::ZERO),
        Err(OrbitError::DegenerateOrbit)
    );
    // Non-zero, but with no direction in the reference plane
    assert_eq!(
        argument_of_periapsis_from_eccentricity_vector(DVec3::new(0.0, 0.0, 0.3)),
        Err(OrbitError::DegenerateOrbit)
    );
    assert_almost_eq(
        argument_of_periapsis_from_eccentricity_vector(DVec3::new(0.1, 0.0, 0.3)).unwrap(),
        0.0,
        "periapsis along +x, tilted out of the plane",
    );
    assert_eq!(argument_of_periapsis_from_longitude(3.0, 1.0), 2.0);
    assert!(matches!(
        distance_to_center(1.0, 0.5, f64::NAN),
        Err(OrbitError::NonFiniteAngle { .. })
    ));
}

// Frame rotations

#[test]
fn rotations_are_orthonormal() {
    for _ in 0..RANDOM_ITERS {
        let angle = rand::random_range(-TAU..TAU);
        assert_orthonormal(rotation_x(angle), "Rx");
        assert_orthonormal(rotation_y(angle), "Ry");
        assert_orthonormal(rotation_z(angle), "Rz");

        let arg_pe = rand::random_range(-TAU..TAU);
        let inclination = rand::random_range(-TAU..TAU);
        let long_asc_node = rand::random_range(-TAU..TAU);
        assert_orthonormal(
            rotation_matrix(arg_pe, inclination, long_asc_node),
            "composite rotation",
        );
    }
}

#[test]
fn elementary_rotations() {
    assert_almost_eq_vec3(rotation_x(FRAC_PI_2) * DVec3::Y, DVec3::Z, "Rx(90°)·y");
    assert_almost_eq_vec3(rotation_y(FRAC_PI_2) * DVec3::Z, DVec3::X, "Ry(90°)·z");
    assert_almost_eq_vec3(rotation_z(FRAC_PI_2) * DVec3::X, DVec3::Y, "Rz(90°)·x");
}

#[test]
fn transformation_forms_agree() {
    for _ in 0..RANDOM_ITERS {
        let arg_pe = rand::random_range(-TAU..TAU);
        let inclination = rand::random_range(-TAU..TAU);
        let long_asc_node = rand::random_range(-TAU..TAU);
        let vector = DVec2::new(
            rand::random_range(-10.0..10.0),
            rand::random_range(-10.0..10.0),
        );

        let full = rotation_matrix(arg_pe, inclination, long_asc_node) * vector.extend(0.0);
        let reduced = transformation_matrix(arg_pe, inclination, long_asc_node).dot_vec(vector);
        let stepwise = to_inertial(vector, arg_pe, inclination, long_asc_node);

        assert_almost_eq_vec3(reduced, full, "3x2 matrix vs full rotation");
        assert_almost_eq_vec3(stepwise, full, "step-by-step vs full rotation");
    }
}

#[test]
fn unit_orbit_angle_3d() {
    let orbit = unit_orbit();

    assert_orbit_positions_3d(
        &orbit,
        &[
            ("unit orbit 1", 0.0 * PI, DVec3::new(1.0, 0.0, 0.0)),
            ("unit orbit 2", 0.5 * PI, DVec3::new(0.0, 1.0, 0.0)),
            ("unit orbit 3", 1.0 * PI, DVec3::new(-1.0, 0.0, 0.0)),
            ("unit orbit 4", 1.5 * PI, DVec3::new(0.0, -1.0, 0.0)),
            ("unit orbit 5", 2.0 * PI, DVec3::new(1.0, 0.0, 0.0)),
        ],
    );
}

#[test]
fn unit_orbit_angle_2d() {
    let orbit = unit_orbit();

    let tests = [
        ("unit orbit 1", 0.0 * PI, DVec2::new(1.0, 0.0)),
        ("unit orbit 2", 0.5 * PI, DVec2::new(0.0, 1.0)),
        ("unit orbit 3", 1.0 * PI, DVec2::new(-1.0, 0.0)),
        ("unit orbit 4", 1.5 * PI, DVec2::new(0.0, -1.0)),
    ];

    for (what, angle, expected) in tests {
        let pos = orbit.get_pqw_position_at_true_anomaly(angle).unwrap();
        assert_almost_eq_vec2(pos, expected, what);
    }
}

#[test]
fn unit_orbit_transformation() {
    // Without any tilt, transforming should not do anything.
    let orbit = unit_orbit();

    let tests = [(1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)];

    for point in tests {
        let transformed = orbit.transform_pqw_vector(DVec2::new(point.0, point.1));

        assert_eq!(transformed.x, point.0);
        assert_eq!(transformed.y, point.1);
        assert_eq!(transformed.z, 0.0);
    }
}

#[test]
fn tilted_90deg() {
    let orbit = OrbitalElements::new(1.0, 0.0, FRAC_PI_2, 0.0, 0.0).unwrap();

    let tests = [
        // Before and after transformation
        ("Vector 1", (1.0, 0.0), DVec3::new(1.0, 0.0, 0.0)),
        ("Vector 2", (0.0, 1.0), DVec3::new(0.0, 0.0, 1.0)),
        ("Vector 3", (-1.0, 0.0), DVec3::new(-1.0, 0.0, 0.0)),
        ("Vector 4", (0.0, -1.0), DVec3::new(0.0, 0.0, -1.0)),
    ];

    for (what, point, expected) in tests {
        let transformed = orbit.transform_pqw_vector(DVec2::new(point.0, point.1));
        assert_almost_eq_vec3(transformed, expected, what);
    }
}

#[test]
fn tilted_equidistant() {
    let elements = OrbitalElements::new(1.0, 0.0, 2.848915582093, 2.1834987325, 1.9520945821)
        .unwrap();
    let state = OrbitState::new(elements, Some(100.0), None).unwrap();

    for point in poll_orbit(&state) {
        assert_almost_eq(point.length(), 1.0, "Distance");
    }
}

#[test]
fn transformed_plane_is_flat() {
    for _ in 0..16 {
        let orbit = random_any();
        let normal = orbit
            .transform_pqw_vector(DVec2::X)
            .cross(orbit.transform_pqw_vector(DVec2::Y));

        assert_almost_eq(normal.length(), 1.0, "orbit normal length");

        for point in poll_transform(&orbit) {
            assert_almost_eq(point.length(), 1.0, "transformed unit vector length");
            assert_almost_eq(point.dot(normal), 0.0, "out-of-plane component");
        }
    }
}

#[test]
fn flat_positions_within_apsides() {
    for _ in 0..16 {
        let orbit = random_elliptic();
        let periapsis = orbit.get_periapsis();
        let apoapsis = orbit.get_apoapsis();

        for point in poll_flat(&orbit) {
            let r = point.length();
            assert!(
                r >= periapsis * (1.0 - 1e-12) && r <= apoapsis * (1.0 + 1e-12),
                "r = {r} outside [{periapsis}, {apoapsis}]"
            );
        }
    }
}

#[test]
fn narrow_inverse() {
    let angles = state_vector_to_elements(DVec3::Y, DVec3::Z).unwrap();
    assert_almost_eq(angles.inclination, FRAC_PI_2, "inclination");
    assert_almost_eq(angles.longitude_of_ascending_node, FRAC_PI_2, "node");
    assert_almost_eq(angles.argument_of_periapsis, 0.0, "argument of periapsis");

    let angles = StateVectors {
        position: DVec3::new(1.0, 0.0, 1.0),
        velocity: DVec3::new(-1.0, 0.0, 0.0),
    }
    .to_euler_angles()
    .unwrap();
    assert_almost_eq(angles.inclination, PI / 4.0, "inclination");
    assert_almost_eq(angles.longitude_of_ascending_node, 0.0, "node");
    assert_almost_eq(angles.argument_of_periapsis, PI, "argument of periapsis");

    // Ω and ω come back wrapped
    let angles = state_vector_to_elements(DVec3::new(1.0, -1.0, 0.5), DVec3::new(1.0, 0.0, -1.0))
        .unwrap();
    assert!((0.0..TAU).contains(&angles.longitude_of_ascending_node));
    assert!((0.0..TAU).contains(&angles.argument_of_periapsis));
}

#[test]
fn narrow_inverse_rejects_degenerate() {
    assert_eq!(
        state_vector_to_elements(DVec3::ZERO, DVec3::X),
        Err(OrbitError::DegenerateOrbit)
    );
    assert_eq!(
        state_vector_to_elements(DVec3::new(0.0, 0.0, 5.0), DVec3::X),
        Err(OrbitError::DegenerateGeometry { inclination: 0.0 })
    );
    assert!(matches!(
        state_vector_to_elements(DVec3::new(0.0, 0.0, -5.0), DVec3::X),
        Err(OrbitError::DegenerateGeometry { .. })
    ));
}

#[test]
fn state_vectors_to_elements() {
    for _ in 0..RANDOM_ITERS {
        let orbit = random_inclined_elliptic();
        let mu = random_mu();
        let true_anomaly = rand::random_range(0.0..TAU);

        let state_vectors = orbit
            .get_state_vectors_at_true_anomaly(true_anomaly, mu)
            .unwrap();
        let recovered = state_vectors.to_elements(mu).unwrap();
        let what = format!("{orbit:?} at ν = {true_anomaly}");

        assert_almost_eq_orbit(&recovered.elements, &orbit, &what);
        assert_almost_eq_angle(recovered.true_anomaly, true_anomaly, &what);
        assert_almost_eq_angle(
            recovered.mean_anomaly().unwrap(),
            mean_anomaly_from_true(orbit.get_eccentricity(), true_anomaly).unwrap(),
            &what,
        );
    }
}

#[test]
fn state_vectors_to_elements_conventions() {
    let mu = 398_600.0;

    // Circular: no periapsis, ν is measured from the ascending node
    let circular = OrbitalElements::new(7000.0, 0.0, 0.7, 2.0, 1.0).unwrap();
    let recovered = circular
        .get_state_vectors_at_true_anomaly(0.5, mu)
        .unwrap()
        .to_elements(mu)
        .unwrap();
    assert_eq!(recovered.elements.get_arg_pe(), 0.0);
    assert_almost_eq(recovered.elements.get_long_asc_node(), 2.0, "circular node");
    assert_almost_eq(recovered.true_anomaly, 1.5, "circular true anomaly");

    // Equatorial: no node, ω is measured from the x axis
    let equatorial = OrbitalElements::new(7000.0, 0.2, 0.0, 1.0, 0.5).unwrap();
    let recovered = equatorial
        .get_state_vectors_at_true_anomaly(0.3, mu)
        .unwrap()
        .to_elements(mu)
        .unwrap();
    assert_eq!(recovered.elements.get_long_asc_node(), 0.0);
    assert_almost_eq(recovered.elements.get_arg_pe(), 1.5, "equatorial argument of periapsis");
    assert_almost_eq(recovered.true_anomaly, 0.3, "equatorial true anomaly");

    // Retrograde equatorial
    let retrograde = OrbitalElements::new(7000.0, 0.2, PI, 0.0, 0.5).unwrap();
    let state_vectors = retrograde.get_state_vectors_at_true_anomaly(0.3, mu).unwrap();
    let recovered = state_vectors.to_elements(mu).unwrap();
    assert_almost_eq(recovered.elements.get_inclination(), PI, "retrograde inclination");
    assert_almost_eq_angle(recovered.elements.get_arg_pe(), 0.5, "retrograde argument of periapsis");
    assert_almost_eq_angle(recovered.true_anomaly, 0.3, "retrograde true anomaly");

    // Whatever the convention, the body ends up in the same place
    for orbit in [circular, equatorial, retrograde] {
        let state_vectors = orbit.get_state_vectors_at_true_anomaly(2.0, mu).unwrap();
        let recovered = state_vectors.to_elements(mu).unwrap();
        let position = recovered
            .elements
            .get_position_at_true_anomaly(recovered.true_anomaly)
            .unwrap();

        assert_almost_eq_vec3(position, state_vectors.position, &format!("{orbit:?}"));
    }
}

#[test]
fn state_vectors_to_elements_rejects_open_and_radial() {
    let hyperbolic = StateVectors {
        position: DVec3::X,
        velocity: DVec3::new(0.0, 2.0, 0.0),
    };
    assert!(matches!(
        hyperbolic.to_elements(1.0),
        Err(OrbitError::InvalidEccentricity { .. })
    ));

    let radial = StateVectors {
        position: DVec3::X,
        velocity: DVec3::new(0.5, 0.0, 0.0),
    };
    assert_eq!(radial.to_elements(1.0), Err(OrbitError::DegenerateOrbit));

    let at_origin = StateVectors {
        position: DVec3::ZERO,
        velocity: DVec3::Y,
    };
    assert_eq!(at_origin.to_elements(1.0), Err(OrbitError::DegenerateOrbit));

    assert_eq!(
        hyperbolic.to_elements(-1.0),
        Err(OrbitError::InvalidGravitationalParameter { value: -1.0 })
    );
}

#[test]
fn vis_viva_speed() {
    for _ in 0..RANDOM_ITERS {
        let orbit = random_elliptic();
        let mu = random_mu();
        let true_anomaly = rand::random_range(-TAU..TAU);

        let velocity = orbit
            .get_velocity_at_true_anomaly(true_anomaly, mu)
            .unwrap();
        let speed = orbit.get_speed_at_true_anomaly(true_anomaly, mu).unwrap();

        assert_almost_eq_rescale(velocity.length(), speed, "speed vs |velocity|");
    }
}

#[test]
fn angular_momentum_is_conserved() {
    for _ in 0..32 {
        let orbit = random_elliptic();
        let mu = random_mu();
        let expected = (mu * orbit.get_semi_latus_rectum()).sqrt();

        for true_anomaly in ANGLES {
            let StateVectors { position, velocity } = orbit
                .get_state_vectors_at_true_anomaly(true_anomaly, mu)
                .unwrap();

            assert_almost_eq_rescale(
                position.cross(velocity).length(),
                expected,
                "specific angular momentum",
            );
        }
    }
}

// Orbit state

#[test]
fn orbital_elements_validation() {
    assert_eq!(
        OrbitalElements::new(1.0, 1.0, 0.0, 0.0, 0.0),
        Err(OrbitError::InvalidEccentricity { value: 1.0 })
    );
    assert_eq!(
        OrbitalElements::new(0.0, 0.5, 0.0, 0.0, 0.0),
        Err(OrbitError::InvalidSemiMajorAxis { value: 0.0 })
    );
    assert!(matches!(
        OrbitalElements::new(1.0, 0.5, f64::NAN, 0.0, 0.0),
        Err(OrbitError::NonFiniteAngle { .. })
    ));
    assert!(matches!(
        OrbitalElements::new(1.0, 0.5, 0.0, 0.0, f64::INFINITY),
        Err(OrbitError::NonFiniteAngle { .. })
    ));

    let wrapped = OrbitalElements::new(1.0, 0.5, 0.3, -1.0, 7.0).unwrap();
    assert_almost_eq(wrapped.get_long_asc_node(), TAU - 1.0, "wrapped node");
    assert_almost_eq(wrapped.get_arg_pe(), 7.0 - TAU, "wrapped argument of periapsis");
    assert_eq!(wrapped.get_inclination(), 0.3);
}

#[test]
fn earth_like_orbit() {
    let elements = OrbitalElements::new(149_597_870.0, 0.0167, 0.0, 0.0, 0.0).unwrap();
    let expected = 149_597_870.0 * (1.0 - 0.0167);

    let position = position_at(&elements, DEFAULT_ORBITAL_PERIOD, 0.0).unwrap();
    assert!(position.x > 0.0);
    assert_almost_eq_rescale(position.length(), expected, "distance at t = 0");
    assert_almost_eq(position.y, 0.0, "y at t = 0");
    assert_almost_eq(position.z, 0.0, "z at t = 0");

    let state = OrbitState::new(elements, None, Some("Earth".to_string())).unwrap();
    assert_eq!(state.position_at(0.0).unwrap(), position);
}

#[test]
fn quarter_period() {
    for _ in 0..RANDOM_ITERS {
        let state = random_orbit_state(random_circular());
        let period = state.orbital_period();

        let start = state.position_at(0.0).unwrap();
        let quarter = state.position_at(period / 4.0).unwrap();

        assert_almost_eq_rescale(start.length(), quarter.length(), "radius");
        assert_almost_eq(start.angle_between(quarter), FRAC_PI_2, "angle travelled");
    }
}

#[test]
fn periapsis_and_apoapsis_in_time() {
    for _ in 0..RANDOM_ITERS {
        let state = random_orbit_state(random_elliptic());
        let period = state.orbital_period();

        assert_almost_eq_rescale(
            state.position_at(0.0).unwrap().length(),
            state.get_periapsis(),
            "distance at t = 0",
        );
        assert_almost_eq_rescale(
            state.position_at(period / 2.0).unwrap().length(),
            state.get_apoapsis(),
            "distance at t = T/2",
        );
        assert_almost_eq_vec3_rescale(
            state.position_at(period).unwrap(),
            state.position_at(0.0).unwrap(),
            "one full period later",
        );
    }
}

#[test]
fn eccentric_anomaly_increases() {
    for _ in 0..16 {
        let state = random_orbit_state(random_any());
        let anomalies = poll_eccentric_anomaly(&state);

        for pair in anomalies.windows(2) {
            assert!(
                pair[1] > pair[0],
                "eccentric anomaly went backwards: {pair:?} on {state:?}"
            );
        }
    }
}

#[test]
fn time_queries_chain() {
    let elements = OrbitalElements::new(10_000.0, 0.4, 0.2, 0.3, 0.4).unwrap();
    let state = OrbitState::new(elements, Some(1000.0), None).unwrap();

    assert_almost_eq(state.mean_anomaly(1000.0), TAU, "mean anomaly after a period");
    assert_almost_eq(state.mean_anomaly(-250.0), -FRAC_PI_2, "mean anomaly before periapsis");

    for t in [-300.0, 0.0, 123.4, 999.0, 5000.0] {
        let solution = state.kepler_solution(t).unwrap();
        assert!(solution.converged);
        assert_eq!(state.eccentric_anomaly(t).unwrap(), solution.eccentric_anomaly);

        let true_anomaly = state.true_anomaly(t).unwrap();
        assert_almost_eq(
            mean_anomaly_from_true(0.4, true_anomaly).unwrap(),
            state.mean_anomaly(t),
            "mean anomaly from true anomaly",
        );
        assert_almost_eq_vec3(
            state.position_at(t).unwrap(),
            position_at(&elements, 1000.0, t).unwrap(),
            "position via state vs free function",
        );
    }
}

#[test]
fn velocity_matches_position_derivative() {
    let mu = 398_600.0;
    let elements = OrbitalElements::new(7000.0, 0.3, 0.9, 1.2, 2.3).unwrap();
    let state = OrbitState::with_gravitational_parameter(elements, mu, None)
        .unwrap()
        .with_solver(KeplerSolver::default().with_tolerance(1e-14));

    let step = 0.1;
    for i in 0..16 {
        let t = state.orbital_period() * (i as f64) / 16.0;

        let before = state.position_at(t - step).unwrap();
        let after = state.position_at(t + step).unwrap();
        let numerical = (after - before) / (2.0 * step);

        let state_vectors = state.state_vectors_at(t, mu).unwrap();
        assert_almost_eq_vec3(
            state_vectors.velocity,
            numerical,
            &format!("velocity at t = {t}"),
        );
        assert_eq!(state_vectors.velocity, state.velocity_at(t, mu).unwrap());
        assert_eq!(state_vectors.position, state.position_at(t).unwrap());
    }
}

#[test]
fn orbit_state_construction() {
    let elements = OrbitalElements::new(7000.0, 0.1, 0.5, 1.0, 2.0).unwrap();

    let state = OrbitState::new(elements, None, None).unwrap();
    assert_eq!(state.orbital_period(), DEFAULT_ORBITAL_PERIOD);
    assert_eq!(state.orbital_period(), 31_536_000.0);
    assert_eq!(state.name(), None);
    assert_eq!(state.solver(), KeplerSolver::default());
    assert_eq!(state, OrbitState::from(elements));

    let named = OrbitState::new(elements, Some(3600.0), Some("Probe".to_string())).unwrap();
    assert_eq!(named.name(), Some("Probe"));
    assert_eq!(named.elements(), &elements);

    for period in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(
                OrbitState::new(elements, Some(period), None),
                Err(OrbitError::InvalidPeriod { .. })
            ),
            "period {period} should be rejected"
        );
    }

    let mu = 398_600.0;
    let kepler = OrbitState::with_gravitational_parameter(elements, mu, None).unwrap();
    assert_almost_eq(
        kepler.orbital_period(),
        period_from_semi_major_axis(7000.0, mu).unwrap(),
        "period from μ",
    );
    assert_almost_eq(
        kepler.orbital_period(),
        elements.get_orbital_period(mu).unwrap(),
        "period getter",
    );
    assert!(matches!(
        OrbitState::with_gravitational_parameter(elements, 0.0, None),
        Err(OrbitError::InvalidGravitationalParameter { .. })
    ));

    let solver = KeplerSolver::new(1e-12, 10);
    assert_eq!(state.with_solver(solver).solver(), solver);
}

#[test]
fn cached_matrix_matches_elements() {
    for _ in 0..RANDOM_ITERS {
        let elements = random_any();
        let state = OrbitState::from(elements);

        assert_eq!(
            state.get_transformation_matrix(),
            elements.get_transformation_matrix()
        );
        assert_eq!(state.get_periapsis(), elements.get_periapsis());
        assert_eq!(state.get_arg_pe(), elements.get_arg_pe());
    }
}

#[cfg(feature = "serde")]
#[test]
fn deserialization_validates_elements() {
    let elements = OrbitalElements::new(7000.0, 0.1, 0.5, 1.0, 2.0).unwrap();
    let json = serde_json::to_string(&elements).unwrap();
    assert_eq!(
        serde_json::from_str::<OrbitalElements>(&json).unwrap(),
        elements
    );

    for (a, e) in [(7000.0, 1.5), (-5.0, 0.1), (-5.0, 1.5)] {
        let json = format!(
            r#"{{"semi_major_axis":{a},"eccentricity":{e},"inclination":0.0,"long_asc_node":0.0,"arg_pe":0.0}}"#
        );
        assert!(
            serde_json::from_str::<OrbitalElements>(&json).is_err(),
            "a = {a}, e = {e} should not deserialize"
        );
    }
}

#[cfg(feature = "serde")]
#[test]
fn deserialization_validates_orbit_state() {
    let elements = OrbitalElements::new(7000.0, 0.1, 0.5, 1.0, 2.0).unwrap();
    let state = OrbitState::new(elements, Some(5820.0), Some("Satellite".to_string()))
        .unwrap()
        .with_solver(KeplerSolver::default().with_tolerance(1e-12));

    let json = serde_json::to_string(&state).unwrap();
    assert!(!json.contains("transformation_matrix"), "{json}");

    let restored: OrbitState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
    assert_eq!(
        restored.get_transformation_matrix(),
        elements.get_transformation_matrix()
    );

    let zero_period = json.replace("5820.0", "0.0");
    assert!(serde_json::from_str::<OrbitState>(&zero_period).is_err());

    let negative_axis = json.replace(r#""semi_major_axis":7000.0"#, r#""semi_major_axis":-7000.0"#);
    assert_ne!(negative_axis, json);
    assert!(serde_json::from_str::<OrbitState>(&negative_axis).is_err());
}

// Bodies and stars

#[test]
fn body_presets_and_masses() {
    let earth = body_presets::earth();
    assert_eq!(CelestialBody::default(), earth);
    assert_almost_eq(earth.earth_masses(), 5.972 / 5.97, "Earth masses");
    assert!((earth.gravitational_parameter() - 398_600.0).abs() < 100.0);
    assert!(matches!(earth.kind, BodyKind::Planet(_)));

    let sun = body_presets::the_sun();
    assert_almost_eq(sun.solar_masses(), 1.0, "solar masses of the Sun");
    assert_eq!(sun.radius, SOLAR_RADIUS);
    assert_eq!(sun.star_type(), Some(StarType::YellowDwarf));

    let mars = body_presets::mars();
    match mars.kind {
        BodyKind::Planet(properties) => assert_eq!(properties.atmospheric_pressure, 610.0),
        BodyKind::Star(_) => panic!("Mars is not a star"),
    }

    assert!(body_presets::jupiter().mass > 300.0 * earth.mass);
    assert!(body_presets::the_moon().mass < earth.mass / 80.0);
    assert_eq!(body_presets::the_moon().star_type(), None);
}

#[test]
fn constants_conversions() {
    assert_almost_eq(km_to_parsec(parsec_to_km(4.2)), 4.2, "parsec round trip");
    assert_eq!(parsec_to_km(1.0), 3.086e13);
    assert_almost_eq(
        gravitational_parameter_from_mass(1.0e9 / 6.6743e-11),
        1.0,
        "μ from mass",
    );
}

#[test]
fn star_classification() {
    use LifecycleStage::*;

    let cases = [
        ("V1057 Cyg", 0.5, 3000.0, PreMainSequence, 1.5, StarType::TTauri),
        ("HD 163296", 2.5, 10000.0, PreMainSequence, 2.5, StarType::HerbigAeBe),
        ("Proxima Centauri", 0.3, 3000.0, MainSequence, 0.3, StarType::RedDwarf),
        ("61 Cygni A", 0.7, 5000.0, MainSequence, 0.7, StarType::OrangeDwarf),
        ("The Sun", 1.0, 5778.0, MainSequence, 1.0, StarType::YellowDwarf),
        ("Zeta Ophiuchi", 16.0, 40000.0, MainSequence, 7.0, StarType::OType),
        ("Beta Hydri", 1.1, 5500.0, PostMainSequence, 2.0, StarType::Subgiant),
        ("Aldebaran", 0.8, 3500.0, PostMainSequence, 50.0, StarType::RedGiant),
        ("Betelgeuse", 12.0, 3500.0, PostMainSequence, 600.0, StarType::RedSupergiant),
        ("Rigel", 20.0, 20000.0, Supergiant, 700.0, StarType::BlueSupergiant),
        ("Eta Carinae", 30.0, 35000.0, Supergiant, 1300.0, StarType::Hypergiant),
        ("Sirius B", 0.6, 8000.0, FinalStage, 0.01, StarType::WhiteDwarf),
        ("Cygnus X-1", 10.0, 0.0, FinalStage, 0.0, StarType::BlackHole),
        ("WISE 0855-0714", 0.05, 1700.0, FailedStar, 0.1, StarType::BrownDwarf),
        ("Cool subdwarf", 0.07, 2900.0, MainSequence, 0.1, StarType::Subdwarf),
        ("Heavy remnant", 2.0, 1e6, FinalStage, 1e-5, StarType::NeutronStar),
        // Exactly at the Chandrasekhar limit still counts as a white dwarf
        ("PSR J0108-1431", 1.4, 6e6, FinalStage, 1e-5, StarType::WhiteDwarf),
        ("Hot dwarf", 1.0, 10000.0, MainSequence, 1.0, StarType::Unknown),
        ("Cloud", 1.0, 10.0, MolecularCloud, 1000.0, StarType::Unknown),
    ];

    for (name, mass, temperature, stage, radius, expected) in cases {
        let star_type = crate::classify_star(mass, temperature, stage, radius * SOLAR_RADIUS);
        assert_eq!(star_type, expected, "classification of {name}");
    }
}

#[test]
fn star_type_names_and_ranges() {
    assert_eq!(StarType::TTauri.to_string(), "T Tauri Star");
    assert_eq!(StarType::BlackHole.to_string(), "Stellar Black Hole");
    assert_eq!(StarType::Unknown.to_string(), "Unknown Star Type");

    assert_eq!(
        StarType::RedSupergiant.typical_ranges(),
        Some(StarRanges {
            radius: (200.0, 800.0),
            mass: (10.0, 40.0),
            temperature: (3500.0, 4500.0),
            age: (10.0, 20.0),
        })
    );
    assert_eq!(StarType::NeutronStar.typical_ranges(), None);

    assert!(LifecycleStage::FailedStar < LifecycleStage::MolecularCloud);
    assert_eq!(LifecycleStage::FinalStage as i32, 10);
}
