//! Physical constants and unit conversions.

/// The gravitational constant, in m³/(kg·s²).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11;

/// One astronomical unit, in kilometers.
///
/// Roughly the average distance between the Earth and the Sun.
pub const AU: f64 = 149_597_870.0;

/// The speed of light in vacuum, in km/s.
pub const SPEED_OF_LIGHT: f64 = 299_792.458;

/// The number of seconds in a 24 hour day.
pub const DAY_TO_SECONDS: f64 = 86_400.0;

/// The number of seconds in a Julian year.
pub const YEAR_TO_SECONDS: f64 = 31_557_600.0;

/// One parsec, in kilometers.
pub const PARSEC_TO_KM: f64 = 3.086e13;

/// The Boltzmann constant, in J/K.
pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;

/// The Planck constant, in J·s.
pub const PLANCK_CONSTANT: f64 = 6.62607015e-34;

/// The Stefan-Boltzmann constant, in W/(m²·K⁴).
pub const STEFAN_BOLTZMANN_CONSTANT: f64 = 5.670374419e-8;

/// The mass of the Sun, in kilograms.
pub const SOLAR_MASS: f64 = 1.98847e30;

/// The mass of the Earth, in kilograms, as used for Earth-mass conversions.
pub const EARTH_MASS: f64 = 5.97e24;

/// The radius of the Sun, in kilometers.
pub const SOLAR_RADIUS: f64 = 696_340.0;

/// The orbital period used when none is given: 365 days, in seconds.
pub const DEFAULT_ORBITAL_PERIOD: f64 = 365.0 * DAY_TO_SECONDS;

/// Converts a distance from parsecs to kilometers.
pub fn parsec_to_km(parsec: f64) -> f64 {
    parsec * PARSEC_TO_KM
}

/// Converts a distance from kilometers to parsecs.
pub fn km_to_parsec(km: f64) -> f64 {
    km / PARSEC_TO_KM
}

/// The standard gravitational parameter `μ = G·M` of a body with the
/// given mass in kilograms, in km³/s².
///
/// # Example
/// ```
/// use celestial_sandbox::constants::gravitational_parameter_from_mass;
///
/// let mu = gravitational_parameter_from_mass(5.972e24);
/// assert!((mu - 398_600.0).abs() < 100.0);
/// ```
pub fn gravitational_parameter_from_mass(mass: f64) -> f64 {
    // m³ to km³
    GRAVITATIONAL_CONSTANT * mass * 1e-9
}
