//! This module contains presets for natural satellites.

use crate::CelestialBody;

/// Returns the Moon.
///
/// The Moon is tidally locked, so it rotates once per orbit
/// (about 27.3 days).
pub fn the_moon() -> CelestialBody {
    CelestialBody::planet("The Moon".to_string(), 1737.4, 655.7, 1.62, 7.342e22, 0.0)
}
