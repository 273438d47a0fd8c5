use crate::{
    constants::{gravitational_parameter_from_mass, EARTH_MASS, SOLAR_MASS},
    star::{classify_star, LifecycleStage, MassCategory, StarType},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A struct representing a celestial body.
///
/// # Example
/// ```
/// use celestial_sandbox::CelestialBody;
///
/// // Defaults to the Earth
/// let earth = CelestialBody::default();
/// assert!((earth.earth_masses() - 1.0).abs() < 0.01);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CelestialBody {
    /// The name of the celestial body.
    pub name: String,

    /// The mean radius of the celestial body, in kilometers.
    pub radius: f64,

    /// The time it takes the body to rotate once, in hours.
    pub rotation_period: f64,

    /// The gravitational acceleration at the surface, in m/s².
    pub surface_gravity: f64,

    /// The mass of the celestial body, in kilograms.
    pub mass: f64,

    /// What kind of body this is.
    pub kind: BodyKind,
}

/// Properties specific to a kind of celestial body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyKind {
    /// A planet or moon.
    Planet(PlanetProperties),
    /// A star.
    Star(StarProperties),
}

/// Properties of a planet or moon.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanetProperties {
    /// The pressure of the atmosphere at the surface, in pascals.
    ///
    /// Zero for bodies without an atmosphere.
    pub atmospheric_pressure: f64,
}

/// Properties of a star.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StarProperties {
    /// The surface temperature, in kelvin.
    pub temperature: f64,

    /// The luminosity, in solar luminosities.
    pub luminosity: f64,

    /// Where the star is in its life, if known.
    pub stage: Option<LifecycleStage>,

    /// The mass bracket of the star, if known.
    pub mass_category: Option<MassCategory>,
}

impl Default for StarProperties {
    /// The properties of our Sun.
    fn default() -> Self {
        Self {
            temperature: 5772.0,
            luminosity: 1.0,
            stage: Some(LifecycleStage::MainSequence),
            mass_category: None,
        }
    }
}

impl CelestialBody {
    /// Creates a new planet (or moon).
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the body.
    /// * `radius` - The radius of the body, in kilometers.
    /// * `rotation_period` - The time one rotation takes, in hours.
    /// * `surface_gravity` - The surface gravity, in m/s².
    /// * `mass` - The mass of the body, in kilograms.
    /// * `atmospheric_pressure` - The surface pressure, in pascals.
    pub fn planet(
        name: String,
        radius: f64,
        rotation_period: f64,
        surface_gravity: f64,
        mass: f64,
        atmospheric_pressure: f64,
    ) -> Self {
        Self {
            name,
            radius,
            rotation_period,
            surface_gravity,
            mass,
            kind: BodyKind::Planet(PlanetProperties {
                atmospheric_pressure,
            }),
        }
    }

    /// Creates a new star.
    ///
    /// Unlike planets, the mass of a star is given in solar masses.
    pub fn star(
        name: String,
        radius: f64,
        rotation_period: f64,
        surface_gravity: f64,
        solar_masses: f64,
        properties: StarProperties,
    ) -> Self {
        Self {
            name,
            radius,
            rotation_period,
            surface_gravity,
            mass: solar_masses * SOLAR_MASS,
            kind: BodyKind::Star(properties),
        }
    }

    /// The mass of the body, in solar masses.
    pub fn solar_masses(&self) -> f64 {
        self.mass / SOLAR_MASS
    }

    /// The mass of the body, in Earth masses.
    pub fn earth_masses(&self) -> f64 {
        self.mass / EARTH_MASS
    }

    /// The standard gravitational parameter `μ = G·M` of the body, in km³/s².
    ///
    /// This is the `mu` taken by the velocity and period functions of
    /// orbits around this body.
    pub fn gravitational_parameter(&self) -> f64 {
        gravitational_parameter_from_mass(self.mass)
    }

    /// Classifies the body if it is a star with a known lifecycle stage.
    ///
    /// Returns `None` for planets and for stars without a stage.
    ///
    /// # Example
    /// ```
    /// use celestial_sandbox::{body_presets, StarType};
    ///
    /// assert_eq!(body_presets::the_sun().star_type(), Some(StarType::YellowDwarf));
    /// assert_eq!(body_presets::earth().star_type(), None);
    /// ```
    pub fn star_type(&self) -> Option<StarType> {
        match &self.kind {
            BodyKind::Star(properties) => {
                let stage = properties.stage?;
                Some(classify_star(
                    self.solar_masses(),
                    properties.temperature,
                    stage,
                    self.radius,
                ))
            }
            BodyKind::Planet(_) => None,
        }
    }
}

impl Default for CelestialBody {
    /// Creates a default `CelestialBody` instance.
    ///
    /// Currently, this function returns the Earth.
    /// However, do not rely on this behavior, as it may change in the future.
    fn default() -> Self {
        crate::body_presets::earth()
    }
}
