//! Ephemeris seam: planetary positions and house cusps for a Julian Day.
//!
//! Everything downstream (astrology, Human Design, rendering) depends only on
//! the [`Ephemeris`] trait. Production positions come from the Swiss
//! Ephemeris library ([`SwissEphemeris`], behind the `swiss-ephemeris`
//! feature); [`TableEphemeris`] serves deterministic linear motion for
//! fixtures and reproducible tests.

#[cfg(feature = "swiss-ephemeris")]
mod swiss;
mod table;

#[cfg(feature = "swiss-ephemeris")]
pub use swiss::SwissEphemeris;
pub use table::{LinearMotion, TableEphemeris};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::{JulianDay, ValidationError};

/// Errors that can occur during ephemeris lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Failed to calculate position for {body} at JD {julian_day}: {message}")]
    CalculationFailed {
        body: Body,
        julian_day: f64,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
    #[error("Body {0} is not available from this ephemeris")]
    UnsupportedBody(Body),
}

/// Bodies the ephemeris can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    MeanNode,
    TrueNode,
    Chiron,
}

impl Body {
    /// The ten classical planets, Sun through Pluto.
    pub const PLANETS: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Swiss Ephemeris body number.
    pub fn swiss_id(self) -> i32 {
        match self {
            Body::Sun => 0,
            Body::Moon => 1,
            Body::Mercury => 2,
            Body::Venus => 3,
            Body::Mars => 4,
            Body::Jupiter => 5,
            Body::Saturn => 6,
            Body::Uranus => 7,
            Body::Neptune => 8,
            Body::Pluto => 9,
            Body::MeanNode => 10,
            Body::TrueNode => 11,
            Body::Chiron => 15,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::MeanNode => "Mean Node",
            Body::TrueNode => "True Node",
            Body::Chiron => "Chiron",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Body::Sun => "☉",
            Body::Moon => "☽",
            Body::Mercury => "☿",
            Body::Venus => "♀",
            Body::Mars => "♂",
            Body::Jupiter => "♃",
            Body::Saturn => "♄",
            Body::Uranus => "♅",
            Body::Neptune => "♆",
            Body::Pluto => "♇",
            Body::MeanNode | Body::TrueNode => "☊",
            Body::Chiron => "⚷",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Swiss Ephemeris house system, identified by its one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HouseSystem(char);

const HOUSE_SYSTEMS: &[(char, &str)] = &[
    ('P', "Placidus"),
    ('K', "Koch"),
    ('O', "Porphyry"),
    ('R', "Regiomontanus"),
    ('C', "Campanus"),
    ('E', "Equal"),
    ('A', "Equal (Ascendant)"),
    ('W', "Whole Sign"),
    ('B', "Alcabitius"),
    ('M', "Morinus"),
    ('T', "Polich/Page"),
    ('X', "Axial Rotation"),
];

impl HouseSystem {
    pub const PLACIDUS: HouseSystem = HouseSystem('P');

    /// Parse a one-letter code (case-insensitive).
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        let mut chars = code.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                let c = c.to_ascii_uppercase();
                if HOUSE_SYSTEMS.iter().any(|(k, _)| *k == c) {
                    Ok(HouseSystem(c))
                } else {
                    Err(ValidationError::UnsupportedHouseSystem(code.to_string()))
                }
            }
            _ => Err(ValidationError::UnsupportedHouseSystem(code.to_string())),
        }
    }

    pub fn code(self) -> char {
        self.0
    }

    pub fn name(self) -> &'static str {
        HOUSE_SYSTEMS
            .iter()
            .find(|(k, _)| *k == self.0)
            .map(|(_, name)| *name)
            .unwrap_or("Unknown")
    }
}

impl Default for HouseSystem {
    fn default() -> Self {
        Self::PLACIDUS
    }
}

/// Position of a body in ecliptic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryPosition {
    /// Longitude in degrees, `0 <= lon < 360`
    pub longitude: f64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
    /// Whether the body is moving backwards along the ecliptic
    pub retrograde: bool,
}

impl PlanetaryPosition {
    /// Build a position, normalizing the longitude and deriving the retrograde flag.
    pub fn new(longitude: f64, latitude: f64, speed: f64) -> Self {
        Self {
            longitude: crate::models::normalize_degrees(longitude),
            latitude,
            speed,
            retrograde: speed < 0.0,
        }
    }

    /// The point directly opposite on the ecliptic (Earth from Sun, South from North Node).
    pub fn opposite(&self) -> Self {
        Self {
            longitude: crate::models::normalize_degrees(self.longitude + 180.0),
            latitude: -self.latitude,
            speed: self.speed,
            retrograde: self.retrograde,
        }
    }
}

/// House cusps and the two main angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousePositions {
    /// Cusp longitudes for houses 1 through 12
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

impl HousePositions {
    /// House (1-12) containing the given longitude.
    pub fn house_of(&self, longitude: f64) -> u8 {
        let lon = crate::models::normalize_degrees(longitude);
        for i in 0..12 {
            let start = self.cusps[i];
            let end = self.cusps[(i + 1) % 12];
            let span = crate::models::normalize_degrees(end - start);
            let offset = crate::models::normalize_degrees(lon - start);
            if offset < span {
                return (i + 1) as u8;
            }
        }
        // Degenerate cusps (all equal); fall back to the first house
        1
    }
}

/// Source of planetary positions and house cusps.
///
/// Implementations must be deterministic for a given Julian Day.
pub trait Ephemeris: Send + Sync {
    /// Ecliptic position of `body` at `julian_day` (UT).
    fn position(&self, body: Body, julian_day: JulianDay)
        -> Result<PlanetaryPosition, EphemerisError>;

    /// House cusps for an observer at `lat`/`lng`.
    fn houses(
        &self,
        julian_day: JulianDay,
        lat: f64,
        lng: f64,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_system_from_code() {
        assert_eq!(HouseSystem::from_code("P").unwrap().name(), "Placidus");
        assert_eq!(HouseSystem::from_code("w").unwrap().code(), 'W');
        assert!(HouseSystem::from_code("Z").is_err());
        assert!(HouseSystem::from_code("PP").is_err());
        assert!(HouseSystem::from_code("").is_err());
    }

    #[test]
    fn test_position_derives_retrograde() {
        let pos = PlanetaryPosition::new(-10.0, 0.0, -0.2);
        assert_eq!(pos.longitude, 350.0);
        assert!(pos.retrograde);
    }

    #[test]
    fn test_opposite_point() {
        let sun = PlanetaryPosition::new(200.0, 0.0, 1.0);
        assert_eq!(sun.opposite().longitude, 20.0);
    }

    #[test]
    fn test_house_of_wraps_past_aries() {
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = crate::models::normalize_degrees(345.0 + 30.0 * i as f64);
        }
        let houses = HousePositions {
            cusps,
            ascendant: 345.0,
            midheaven: 255.0,
        };
        assert_eq!(houses.house_of(350.0), 1);
        assert_eq!(houses.house_of(10.0), 1);
        assert_eq!(houses.house_of(15.0), 2);
        assert_eq!(houses.house_of(344.0), 12);
    }

    #[test]
    fn test_body_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Body::MeanNode).unwrap(), "\"mean_node\"");
    }
}
