use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::aspects::{calculate_aspects, Aspect};
use super::AstrologyError;
use crate::ephemeris::{Body, Ephemeris, HousePositions, PlanetaryPosition};
use crate::models::{format_degree, normalize_degrees, BirthData, BirthSummary, Element, Modality, Sign};

/// Bodies placed in a natal chart. Chiron is optional.
pub const NATAL_BODIES: [Body; 12] = [
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
    Body::MeanNode,
    Body::Chiron,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPlacement {
    pub body: Body,
    pub name: String,
    pub sign: Sign,
    /// Degrees within the sign
    pub position: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub speed: f64,
    pub retrograde: bool,
    pub house: u8,
    /// e.g. `25°36' Virgo`
    pub formatted: String,
}

impl PlanetPlacement {
    fn new(body: Body, pos: &PlanetaryPosition, houses: &HousePositions) -> Self {
        let sign = Sign::from_longitude(pos.longitude);
        Self {
            body,
            name: body.name().to_string(),
            sign,
            position: pos.longitude - sign.start_longitude(),
            longitude: pos.longitude,
            latitude: pos.latitude,
            speed: pos.speed,
            retrograde: pos.retrograde,
            house: houses.house_of(pos.longitude),
            formatted: format_degree(pos.longitude),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    pub house: u8,
    pub longitude: f64,
    pub sign: Sign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Angles {
    pub ascendant: f64,
    pub ascendant_sign: Sign,
    pub midheaven: f64,
    pub midheaven_sign: Sign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl MoonPhase {
    /// Eight 45° phases centered on the principal elongations.
    pub fn from_elongation(elongation: f64) -> Self {
        let e = normalize_degrees(elongation + 22.5);
        match (e / 45.0).floor() as u32 {
            0 => MoonPhase::NewMoon,
            1 => MoonPhase::WaxingCrescent,
            2 => MoonPhase::FirstQuarter,
            3 => MoonPhase::WaxingGibbous,
            4 => MoonPhase::FullMoon,
            5 => MoonPhase::WaningGibbous,
            6 => MoonPhase::LastQuarter,
            _ => MoonPhase::WaningCrescent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarPhase {
    pub phase: MoonPhase,
    /// Moon minus Sun, 0-360
    pub elongation: f64,
    /// Illuminated fraction in percent
    pub illumination: f64,
}

impl LunarPhase {
    pub fn from_positions(sun: f64, moon: f64) -> Self {
        let elongation = normalize_degrees(moon - sun);
        let illumination = (1.0 - elongation.to_radians().cos()) / 2.0 * 100.0;
        Self {
            phase: MoonPhase::from_elongation(elongation),
            elongation,
            illumination: (illumination * 10.0).round() / 10.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementBalance {
    pub fire: u32,
    pub earth: u32,
    pub air: u32,
    pub water: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModalityBalance {
    pub cardinal: u32,
    pub fixed: u32,
    pub mutable: u32,
}

impl ElementBalance {
    fn add(&mut self, element: Element) {
        match element {
            Element::Fire => self.fire += 1,
            Element::Earth => self.earth += 1,
            Element::Air => self.air += 1,
            Element::Water => self.water += 1,
        }
    }
}

impl ModalityBalance {
    fn add(&mut self, modality: Modality) {
        match modality {
            Modality::Cardinal => self.cardinal += 1,
            Modality::Fixed => self.fixed += 1,
            Modality::Mutable => self.mutable += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub name: String,
    pub birth_data: BirthSummary,
    pub house_system: String,
    pub planets: Vec<PlanetPlacement>,
    pub houses: Vec<HouseCusp>,
    pub angles: Angles,
    pub aspects: Vec<Aspect>,
    pub lunar_phase: LunarPhase,
    pub elements: ElementBalance,
    pub modalities: ModalityBalance,
}

impl NatalChart {
    pub fn planet(&self, body: Body) -> Option<&PlanetPlacement> {
        self.planets.iter().find(|p| p.body == body)
    }
}

/// Calculate a natal chart: placements, houses, aspects, lunar phase and
/// element/modality balance.
pub fn calculate_natal_chart(
    ephemeris: &dyn Ephemeris,
    birth: &BirthData,
) -> Result<NatalChart, AstrologyError> {
    let moment = birth.resolve()?;
    let jd = moment.julian_day;
    let houses = ephemeris.houses(jd, moment.lat, moment.lng, moment.house_system)?;

    let mut positions = Vec::with_capacity(NATAL_BODIES.len());
    for body in NATAL_BODIES {
        match ephemeris.position(body, jd) {
            Ok(pos) => positions.push((body, pos)),
            Err(e) if body == Body::Chiron => {
                warn!("Skipping Chiron: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let planets: Vec<PlanetPlacement> = positions
        .iter()
        .map(|(body, pos)| PlanetPlacement::new(*body, pos, &houses))
        .collect();

    let mut elements = ElementBalance::default();
    let mut modalities = ModalityBalance::default();
    for p in &planets {
        elements.add(p.sign.element());
        modalities.add(p.sign.modality());
    }

    let longitude_of = |body: Body| {
        positions
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, p)| p.longitude)
            .unwrap_or(0.0)
    };
    let lunar_phase = LunarPhase::from_positions(longitude_of(Body::Sun), longitude_of(Body::Moon));

    let houses_out = houses
        .cusps
        .iter()
        .enumerate()
        .map(|(i, lon)| HouseCusp {
            house: (i + 1) as u8,
            longitude: *lon,
            sign: Sign::from_longitude(*lon),
        })
        .collect();

    let aspects = calculate_aspects(&positions);
    info!(
        "Natal chart for {}: {} placements, {} aspects",
        birth.name,
        planets.len(),
        aspects.len()
    );

    Ok(NatalChart {
        name: birth.name.clone(),
        birth_data: birth.summary(),
        house_system: moment.house_system.name().to_string(),
        planets,
        houses: houses_out,
        angles: Angles {
            ascendant: houses.ascendant,
            ascendant_sign: Sign::from_longitude(houses.ascendant),
            midheaven: houses.midheaven,
            midheaven_sign: Sign::from_longitude(houses.midheaven),
        },
        aspects,
        lunar_phase,
        elements,
        modalities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moon_phase_boundaries() {
        assert_eq!(MoonPhase::from_elongation(0.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(350.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(90.0), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_elongation(180.0), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_elongation(300.0), MoonPhase::WaningCrescent);
    }

    #[test]
    fn test_illumination() {
        assert_eq!(LunarPhase::from_positions(0.0, 0.0).illumination, 0.0);
        assert_eq!(LunarPhase::from_positions(10.0, 190.0).illumination, 100.0);
        assert_eq!(LunarPhase::from_positions(0.0, 90.0).illumination, 50.0);
    }

    #[test]
    fn test_balance_serializes_capitalized() {
        let json = serde_json::to_value(ElementBalance {
            fire: 1,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["Fire"], 1);
    }
}
