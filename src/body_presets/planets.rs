//! This module contains presets for planets.

use crate::CelestialBody;

/// Returns the Earth.
pub fn earth() -> CelestialBody {
    CelestialBody::planet("Earth".to_string(), 6378.0, 24.0, 9.8, 5.972e24, 101_325.0)
}

/// Returns Mars.
pub fn mars() -> CelestialBody {
    CelestialBody::planet("Mars".to_string(), 3389.5, 24.6, 3.71, 6.4171e23, 610.0)
}

/// Returns Jupiter.
///
/// Jupiter has no solid surface; its radius, gravity and pressure are
/// taken at the 1 bar level.
pub fn jupiter() -> CelestialBody {
    CelestialBody::planet("Jupiter".to_string(), 69_911.0, 9.925, 24.79, 1.8982e27, 100_000.0)
}
