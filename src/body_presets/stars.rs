//! This module contains presets for stars.
//!
//! "A star is a luminous spheroid of plasma held together by self-gravity."  
//!
//! \- [Wikipedia](https://en.wikipedia.org/wiki/Star)

use crate::{constants::SOLAR_RADIUS, CelestialBody, StarProperties};

/// Returns the Sun.
///
/// Its rotation period varies with latitude; this uses roughly 27 days.
pub fn the_sun() -> CelestialBody {
    CelestialBody::star(
        "The Sun".to_string(),
        SOLAR_RADIUS,
        27.0 * 24.0,
        274.0,
        1.0,
        StarProperties::default(),
    )
}
