use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AstrologyError;
use crate::ephemeris::{Body, Ephemeris};
use crate::models::{JulianDay, LocationSummary, Sign, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitPosition {
    pub planet: Body,
    pub name: String,
    pub sign: Sign,
    pub longitude: f64,
    pub retrograde: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transits {
    /// Observer-local ISO 8601 timestamp
    pub timestamp: String,
    pub location: LocationSummary,
    pub transits: Vec<TransitPosition>,
}

/// Parse and range-check a transit observer.
pub fn observer(lat: f64, lng: f64, tz_str: &str) -> Result<Tz, ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::OutOfRange {
            field: "lat",
            min: -90.0,
            max: 90.0,
            value: lat,
        });
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::OutOfRange {
            field: "lng",
            min: -180.0,
            max: 180.0,
            value: lng,
        });
    }
    tz_str
        .parse::<Tz>()
        .map_err(|_| ValidationError::UnknownTimezone(tz_str.to_string()))
}

/// Positions of the ten planets at `at`, reported in the observer's timezone.
pub fn calculate_transits(
    ephemeris: &dyn Ephemeris,
    at: DateTime<Utc>,
    lat: f64,
    lng: f64,
    tz_str: &str,
) -> Result<Transits, AstrologyError> {
    let tz = observer(lat, lng, tz_str)?;
    let jd = JulianDay::from_datetime(at);

    let mut transits = Vec::with_capacity(Body::PLANETS.len());
    for body in Body::PLANETS {
        let pos = ephemeris.position(body, jd)?;
        transits.push(TransitPosition {
            planet: body,
            name: body.name().to_string(),
            sign: Sign::from_longitude(pos.longitude),
            longitude: pos.longitude,
            retrograde: pos.retrograde,
        });
    }
    debug!("Transits at JD {:.5} for {}", jd.value(), tz_str);

    Ok(Transits {
        timestamp: at.with_timezone(&tz).to_rfc3339(),
        location: LocationSummary {
            lat,
            lng,
            timezone: tz_str.to_string(),
            place: None,
        },
        transits,
    })
}
