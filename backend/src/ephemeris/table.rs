use std::collections::BTreeMap;

use super::{Body, Ephemeris, EphemerisError, HousePositions, HouseSystem, PlanetaryPosition};
use crate::models::{normalize_degrees, JulianDay};

/// Sidereal rotation of the ascendant, degrees per day.
const SIDEREAL_RATE: f64 = 360.985_647_366_29;

/// Uniform motion of a body from the table epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMotion {
    pub longitude: f64,
    pub latitude: f64,
    /// Degrees per day, negative for retrograde motion
    pub speed: f64,
}

/// Ephemeris serving uniform linear motion from a fixed epoch.
///
/// Houses are equal houses from an ascendant that turns at the sidereal rate
/// and is shifted by the observer's longitude. The requested house system is
/// ignored.
#[derive(Debug, Clone)]
pub struct TableEphemeris {
    epoch: JulianDay,
    bodies: BTreeMap<Body, LinearMotion>,
    ascendant: f64,
}

impl TableEphemeris {
    pub fn new(epoch: JulianDay) -> Self {
        Self {
            epoch,
            bodies: BTreeMap::new(),
            ascendant: 0.0,
        }
    }

    /// Add (or replace) a body's longitude at the epoch and its daily motion.
    pub fn with_body(mut self, body: Body, longitude: f64, speed: f64) -> Self {
        self.bodies.insert(
            body,
            LinearMotion {
                longitude,
                latitude: 0.0,
                speed,
            },
        );
        self
    }

    /// Ascendant at the epoch for an observer on the Greenwich meridian.
    pub fn with_ascendant(mut self, ascendant: f64) -> Self {
        self.ascendant = ascendant;
        self
    }

    pub fn epoch(&self) -> JulianDay {
        self.epoch
    }
}

impl Ephemeris for TableEphemeris {
    fn position(
        &self,
        body: Body,
        julian_day: JulianDay,
    ) -> Result<PlanetaryPosition, EphemerisError> {
        let motion = self
            .bodies
            .get(&body)
            .ok_or(EphemerisError::UnsupportedBody(body))?;
        let dt = julian_day.value() - self.epoch.value();
        Ok(PlanetaryPosition::new(
            motion.longitude + motion.speed * dt,
            motion.latitude,
            motion.speed,
        ))
    }

    fn houses(
        &self,
        julian_day: JulianDay,
        lat: f64,
        lng: f64,
        _system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(EphemerisError::HouseCalculationFailed {
                message: "non-finite observer coordinates".to_string(),
            });
        }
        let dt = julian_day.value() - self.epoch.value();
        let ascendant = normalize_degrees(self.ascendant + SIDEREAL_RATE * dt + lng);
        let mut cusps = [0.0; 12];
        for (i, cusp) in cusps.iter_mut().enumerate() {
            *cusp = normalize_degrees(ascendant + 30.0 * i as f64);
        }
        Ok(HousePositions {
            cusps,
            ascendant,
            midheaven: normalize_degrees(ascendant - 90.0),
        })
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_motion() {
        let eph = TableEphemeris::new(JulianDay::new(2_451_545.0)).with_body(Body::Sun, 280.0, 1.0);
        let pos = eph
            .position(Body::Sun, JulianDay::new(2_451_545.0 + 100.0))
            .unwrap();
        assert!((pos.longitude - 20.0).abs() < 1e-9);
        assert!(!pos.retrograde);
    }

    #[test]
    fn test_unknown_body() {
        let eph = TableEphemeris::new(JulianDay::new(2_451_545.0));
        assert_eq!(
            eph.position(Body::Chiron, JulianDay::new(2_451_545.0)),
            Err(EphemerisError::UnsupportedBody(Body::Chiron))
        );
    }

    #[test]
    fn test_equal_houses() {
        let eph = TableEphemeris::new(JulianDay::new(2_451_545.0)).with_ascendant(100.0);
        let houses = eph
            .houses(JulianDay::new(2_451_545.0), 10.0, 20.0, HouseSystem::default())
            .unwrap();
        assert_eq!(houses.ascendant, 120.0);
        assert_eq!(houses.cusps[3], 210.0);
        assert_eq!(houses.midheaven, 30.0);
    }
}
