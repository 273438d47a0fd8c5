//! Stellar lifecycle stages and a rule-based star classifier.
//!
//! The classifier is coarse: it looks at a handful of
//! thresholds on mass, temperature and radius for a given lifecycle
//! stage, and answers [`StarType::Unknown`] when nothing matches.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::SOLAR_RADIUS;

/// A rough mass bracket for a star.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum MassCategory {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Where a star is in its life.
///
/// The discriminants follow the order of the stages, with a failed star
/// (one that never ignited) before everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum LifecycleStage {
    FailedStar = -1,
    MolecularCloud = 0,
    Protostar = 1,
    PreMainSequence = 2,
    MainSequence = 3,
    PostMainSequence = 4,
    Subgiant = 5,
    Supergiant = 6,
    RedGiantBranch = 7,
    HorizontalBranch = 8,
    AsymptoticGiantBranch = 9,
    FinalStage = 10,
}

/// The kinds of star the classifier can tell apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum StarType {
    TTauri,
    HerbigAeBe,
    Subdwarf,
    RedDwarf,
    OrangeDwarf,
    YellowDwarf,
    OType,
    Subgiant,
    RedGiant,
    RedSupergiant,
    BlueSupergiant,
    Hypergiant,
    WhiteDwarf,
    NeutronStar,
    BlackHole,
    BrownDwarf,
    Unknown,
}

impl fmt::Display for StarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StarType::TTauri => "T Tauri Star",
            StarType::HerbigAeBe => "Herbig Ae/Be Star",
            StarType::Subdwarf => "Subdwarf",
            StarType::RedDwarf => "Red Dwarf",
            StarType::OrangeDwarf => "Orange Dwarf",
            StarType::YellowDwarf => "Yellow Dwarf",
            StarType::OType => "O-Type Star",
            StarType::Subgiant => "Subgiant",
            StarType::RedGiant => "Red Giant",
            StarType::RedSupergiant => "Red Supergiant",
            StarType::BlueSupergiant => "Blue Supergiant",
            StarType::Hypergiant => "Hypergiant",
            StarType::WhiteDwarf => "White Dwarf",
            StarType::NeutronStar => "Neutron Star",
            StarType::BlackHole => "Stellar Black Hole",
            StarType::BrownDwarf => "Brown Dwarf",
            StarType::Unknown => "Unknown Star Type",
        };
        f.write_str(name)
    }
}

/// Typical property ranges for a kind of star, as `(min, max)` pairs.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StarRanges {
    /// Radius, in solar radii.
    pub radius: (f64, f64),
    /// Mass, in solar masses.
    pub mass: (f64, f64),
    /// Surface temperature, in kelvin.
    pub temperature: (f64, f64),
    /// Age, in millions of years.
    pub age: (f64, f64),
}

impl StarRanges {
    const fn new(
        radius: (f64, f64),
        mass: (f64, f64),
        temperature: (f64, f64),
        age: (f64, f64),
    ) -> Self {
        Self {
            radius,
            mass,
            temperature,
            age,
        }
    }
}

impl StarType {
    /// The typical ranges of radius, mass, temperature and age for this
    /// kind of star, where they are known.
    ///
    /// Compact remnants and the rarer types have no tabulated ranges and
    /// return `None`.
    ///
    /// # Example
    /// ```
    /// use celestial_sandbox::StarType;
    ///
    /// let ranges = StarType::YellowDwarf.typical_ranges().unwrap();
    /// assert_eq!(ranges.temperature, (5000.0, 6000.0));
    /// assert!(StarType::BlackHole.typical_ranges().is_none());
    /// ```
    pub fn typical_ranges(self) -> Option<StarRanges> {
        let ranges = match self {
            StarType::TTauri => {
                StarRanges::new((0.4, 2.0), (0.08, 2.0), (2800.0, 3900.0), (1.0, 10.0))
            }
            StarType::HerbigAeBe => {
                StarRanges::new((1.5, 6.0), (2.0, 20.0), (7000.0, 10000.0), (1.0, 10.0))
            }
            StarType::RedDwarf => {
                StarRanges::new((0.08, 0.7), (0.08, 0.5), (2400.0, 3700.0), (10.0, 100.0))
            }
            StarType::OrangeDwarf => {
                StarRanges::new((0.7, 1.4), (0.7, 1.5), (3700.0, 5000.0), (1.0, 10.0))
            }
            StarType::YellowDwarf => {
                StarRanges::new((0.7, 1.4), (0.7, 1.5), (5000.0, 6000.0), (1.0, 10.0))
            }
            StarType::OType => {
                StarRanges::new((15.0, 90.0), (15.0, 90.0), (30000.0, 50000.0), (1.0, 10.0))
            }
            StarType::Subgiant => {
                StarRanges::new((1.5, 5.0), (0.8, 8.0), (4800.0, 10000.0), (1000.0, 10000.0))
            }
            StarType::RedGiant => {
                StarRanges::new((20.0, 100.0), (0.3, 8.0), (3500.0, 5000.0), (2000.0, 10000.0))
            }
            StarType::RedSupergiant => {
                StarRanges::new((200.0, 800.0), (10.0, 40.0), (3500.0, 4500.0), (10.0, 20.0))
            }
            _ => return None,
        };

        Some(ranges)
    }
}

/// Classifies a star from its mass, surface temperature, lifecycle stage
/// and radius.
///
/// # Parameters
/// - `solar_masses`: the mass, in solar masses.
/// - `temperature`: the surface temperature, in kelvin.
/// - `stage`: the lifecycle stage.
/// - `radius`: the radius, in **kilometers**.
///
/// Returns [`StarType::Unknown`] when no rule matches.
///
/// # Example
/// ```
/// use celestial_sandbox::{classify_star, LifecycleStage, StarType};
///
/// // Our Sun
/// let sun = classify_star(1.0, 5778.0, LifecycleStage::MainSequence, 696_340.0);
/// assert_eq!(sun, StarType::YellowDwarf);
///
/// // Betelgeuse
/// let betelgeuse = classify_star(12.0, 3500.0, LifecycleStage::PostMainSequence, 600.0 * 696_340.0);
/// assert_eq!(betelgeuse, StarType::RedSupergiant);
/// ```
pub fn classify_star(
    solar_masses: f64,
    temperature: f64,
    stage: LifecycleStage,
    radius: f64,
) -> StarType {
    let mass = solar_masses;
    let radius = radius / SOLAR_RADIUS;

    match stage {
        LifecycleStage::PreMainSequence => {
            if mass <= 2.0 && (0.5..=2.0).contains(&radius) {
                return StarType::TTauri;
            } else if mass > 2.0 && radius > 2.0 && radius <= 5.0 {
                return StarType::HerbigAeBe;
            }
        }
        LifecycleStage::MainSequence => {
            if mass <= 0.08 && temperature <= 3000.0 {
                return StarType::Subdwarf;
            } else if mass <= 0.5 && temperature <= 3700.0 {
                return StarType::RedDwarf;
            } else if mass > 0.5 && mass <= 0.8 && temperature > 3700.0 && temperature <= 5200.0 {
                return StarType::OrangeDwarf;
            } else if mass > 0.8 && mass <= 1.4 && temperature > 5200.0 && temperature <= 6000.0 {
                return StarType::YellowDwarf;
            } else if mass > 15.0 && temperature > 30000.0 {
                return StarType::OType;
            }
        }
        LifecycleStage::PostMainSequence => {
            if radius > 1.5 && radius <= 5.0 {
                return StarType::Subgiant;
            } else if radius > 5.0 && radius <= 100.0 {
                return StarType::RedGiant;
            } else if radius > 100.0 {
                return StarType::RedSupergiant;
            }
        }
        LifecycleStage::Supergiant => {
            if mass > 15.0 && mass <= 25.0 && radius > 600.0 {
                return StarType::BlueSupergiant;
            } else if mass > 25.0 && temperature > 30000.0 {
                return StarType::Hypergiant;
            }
        }
        LifecycleStage::FinalStage => {
            // Chandrasekhar limit, then the rough neutron star mass limit
            if mass <= 1.4 {
                return StarType::WhiteDwarf;
            } else if mass > 1.4 && mass <= 3.0 {
                return StarType::NeutronStar;
            } else if mass > 3.0 {
                return StarType::BlackHole;
            }
        }
        LifecycleStage::FailedStar => return StarType::BrownDwarf,
        _ => {}
    }

    StarType::Unknown
}
