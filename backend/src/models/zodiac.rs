//! Tropical zodiac tables: signs, elements and modalities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize an ecliptic longitude into `[0, 360)`.
pub fn normalize_degrees(longitude: f64) -> f64 {
    let lon = longitude.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if lon >= 360.0 {
        0.0
    } else {
        lon
    }
}

/// Smallest angular distance between two longitudes, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Cardinal, Modality::Fixed, Modality::Mutable];
}

/// The twelve tropical signs, 30° each from 0° Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    /// Sign containing the given ecliptic longitude.
    pub fn from_longitude(longitude: f64) -> Self {
        let index = (normalize_degrees(longitude) / 30.0).floor() as usize;
        Self::ALL[index.min(11)]
    }

    /// Zero-based position in the zodiac.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Longitude of 0° of this sign.
    pub fn start_longitude(self) -> f64 {
        self.index() as f64 * 30.0
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }

    /// Three-letter abbreviation used in chart payloads.
    pub fn abbreviation(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Sign::Aries => "♈",
            Sign::Taurus => "♉",
            Sign::Gemini => "♊",
            Sign::Cancer => "♋",
            Sign::Leo => "♌",
            Sign::Virgo => "♍",
            Sign::Libra => "♎",
            Sign::Scorpio => "♏",
            Sign::Sagittarius => "♐",
            Sign::Capricorn => "♑",
            Sign::Aquarius => "♒",
            Sign::Pisces => "♓",
        }
    }

    pub fn element(self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    pub fn modality(self) -> Modality {
        match self.index() % 3 {
            0 => Modality::Cardinal,
            1 => Modality::Fixed,
            _ => Modality::Mutable,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Format a longitude as degrees and minutes within its sign, e.g. `25°36' Virgo`.
pub fn format_degree(longitude: f64) -> String {
    let lon = normalize_degrees(longitude);
    let sign = Sign::from_longitude(lon);
    let within = lon - sign.start_longitude();
    let mut degrees = within.floor() as u32;
    let mut minutes = ((within - degrees as f64) * 60.0).round() as u32;
    if minutes == 60 {
        degrees += 1;
        minutes = 0;
    }
    format!("{}°{:02}' {}", degrees, minutes, sign.name())
}
