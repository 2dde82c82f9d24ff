//! Planetary activations on the Personality and Design sides.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dignity::DignityResult;
use super::gates::GatePosition;
use crate::ephemeris::Body;

/// Personality is the birth moment; Design is the moment the Sun stood 88° earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Personality,
    Design,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Personality => Side::Design,
            Side::Design => Side::Personality,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Side::Personality => "Personality",
            Side::Design => "Design",
        }
    }
}

/// Which sides activate a gate or channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Imprint {
    Personality,
    Design,
    Both,
}

impl Imprint {
    pub fn add(self, side: Side) -> Imprint {
        match (self, side) {
            (Imprint::Personality, Side::Personality) => Imprint::Personality,
            (Imprint::Design, Side::Design) => Imprint::Design,
            _ => Imprint::Both,
        }
    }
}

impl From<Side> for Imprint {
    fn from(side: Side) -> Self {
        match side {
            Side::Personality => Imprint::Personality,
            Side::Design => Imprint::Design,
        }
    }
}

/// The thirteen activating points, in panel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HdPlanet {
    Sun,
    Earth,
    Moon,
    #[serde(rename = "North_Node")]
    NorthNode,
    #[serde(rename = "South_Node")]
    SouthNode,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl HdPlanet {
    pub const ORDER: [HdPlanet; 13] = [
        HdPlanet::Sun,
        HdPlanet::Earth,
        HdPlanet::Moon,
        HdPlanet::NorthNode,
        HdPlanet::SouthNode,
        HdPlanet::Mercury,
        HdPlanet::Venus,
        HdPlanet::Mars,
        HdPlanet::Jupiter,
        HdPlanet::Saturn,
        HdPlanet::Uranus,
        HdPlanet::Neptune,
        HdPlanet::Pluto,
    ];

    /// Ephemeris body supplying this point, and whether it is the opposite point.
    pub fn source(self) -> (Body, bool) {
        match self {
            HdPlanet::Sun => (Body::Sun, false),
            HdPlanet::Earth => (Body::Sun, true),
            HdPlanet::Moon => (Body::Moon, false),
            HdPlanet::NorthNode => (Body::TrueNode, false),
            HdPlanet::SouthNode => (Body::TrueNode, true),
            HdPlanet::Mercury => (Body::Mercury, false),
            HdPlanet::Venus => (Body::Venus, false),
            HdPlanet::Mars => (Body::Mars, false),
            HdPlanet::Jupiter => (Body::Jupiter, false),
            HdPlanet::Saturn => (Body::Saturn, false),
            HdPlanet::Uranus => (Body::Uranus, false),
            HdPlanet::Neptune => (Body::Neptune, false),
            HdPlanet::Pluto => (Body::Pluto, false),
        }
    }

    /// Display name, as used in the dignity table.
    pub fn name(self) -> &'static str {
        match self {
            HdPlanet::Sun => "Sun",
            HdPlanet::Earth => "Earth",
            HdPlanet::Moon => "Moon",
            HdPlanet::NorthNode => "North Node",
            HdPlanet::SouthNode => "South Node",
            HdPlanet::Mercury => "Mercury",
            HdPlanet::Venus => "Venus",
            HdPlanet::Mars => "Mars",
            HdPlanet::Jupiter => "Jupiter",
            HdPlanet::Saturn => "Saturn",
            HdPlanet::Uranus => "Uranus",
            HdPlanet::Neptune => "Neptune",
            HdPlanet::Pluto => "Pluto",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            HdPlanet::Sun => "☉",
            HdPlanet::Earth => "⊕",
            HdPlanet::Moon => "☽",
            HdPlanet::NorthNode => "☊",
            HdPlanet::SouthNode => "☋",
            HdPlanet::Mercury => "☿",
            HdPlanet::Venus => "♀",
            HdPlanet::Mars => "♂",
            HdPlanet::Jupiter => "♃",
            HdPlanet::Saturn => "♄",
            HdPlanet::Uranus => "♅",
            HdPlanet::Neptune => "♆",
            HdPlanet::Pluto => "♇",
        }
    }
}

impl fmt::Display for HdPlanet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One planet's gate activation with its dignity annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub planet: HdPlanet,
    pub longitude: f64,
    #[serde(flatten)]
    pub position: GatePosition,
    pub dignity: DignityResult,
}

impl Activation {
    pub fn gate(&self) -> u8 {
        self.position.gate
    }

    pub fn line(&self) -> u8 {
        self.position.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imprint_accumulates() {
        let imprint = Imprint::from(Side::Design);
        assert_eq!(imprint.add(Side::Design), Imprint::Design);
        assert_eq!(imprint.add(Side::Personality), Imprint::Both);
        assert_eq!(Imprint::Both.add(Side::Design), Imprint::Both);
    }

    #[test]
    fn test_planet_keys() {
        assert_eq!(
            serde_json::to_string(&HdPlanet::NorthNode).unwrap(),
            "\"North_Node\""
        );
        assert_eq!(HdPlanet::NorthNode.name(), "North Node");
        assert_eq!(HdPlanet::ORDER.len(), 13);
    }
}
