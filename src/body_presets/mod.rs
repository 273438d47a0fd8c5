//! This module contains presets for real celestial bodies.
//!
//! Values are rounded to a few significant figures, which is plenty
//! for a two-body sandbox.
//!
//! # Example
//! ```
//! use celestial_sandbox::body_presets;
//!
//! let sun = body_presets::the_sun();
//! let earth = body_presets::earth();
//! assert!(sun.mass / earth.mass > 300_000.0);
//! ```

pub mod moons;
pub mod planets;
pub mod stars;

pub use moons::the_moon;
pub use planets::{earth, jupiter, mars};
pub use stars::the_sun;
