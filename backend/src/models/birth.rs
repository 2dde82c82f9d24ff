//! Birth data input, validation and resolution to a UTC instant.

use chrono::{DateTime, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::JulianDay;
use crate::ephemeris::HouseSystem;

/// Reasons a birth record is rejected before any calculation runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid input: {field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Unsupported house system: {0}")]
    UnsupportedHouseSystem(String),
}

/// Failure to map a civil time onto the UTC timeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimezoneError {
    #[error("Local time {local} does not exist in timezone {tz}")]
    NonexistentLocalTime { local: String, tz: String },
}

/// Civil birth data as submitted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub lat: f64,
    pub lng: f64,
    pub tz_str: String,
    #[serde(default = "default_house_system")]
    pub house_system: String,
    /// Free-form place label, echoed back but never geocoded.
    #[serde(default)]
    pub place: Option<String>,
}

pub fn default_house_system() -> String {
    "P".to_string()
}

/// Either rejection reason raised while resolving a birth record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Timezone(#[from] TimezoneError),
}

/// A validated birth moment on the UTC timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthMoment {
    pub utc: DateTime<Utc>,
    pub julian_day: JulianDay,
    pub lat: f64,
    pub lng: f64,
    pub tz: Tz,
    pub house_system: HouseSystem,
}

/// Birth data echoed in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthSummary {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub location: LocationSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub lat: f64,
    pub lng: f64,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

impl BirthData {
    /// Validate field ranges, the calendar date, the timezone and the house system.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Invalid("name must not be empty".to_string()));
        }
        check_range("year", self.year as f64, 1900.0, 2100.0)?;
        check_range("month", self.month as f64, 1.0, 12.0)?;
        check_range("day", self.day as f64, 1.0, 31.0)?;
        check_range("hour", self.hour as f64, 0.0, 23.0)?;
        check_range("minute", self.minute as f64, 0.0, 59.0)?;
        check_range("lat", self.lat, -90.0, 90.0)?;
        check_range("lng", self.lng, -180.0, 180.0)?;

        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return Err(ValidationError::Invalid(format!(
                "{:04}-{:02}-{:02} is not a calendar date",
                self.year, self.month, self.day
            )));
        }
        self.timezone()?;
        HouseSystem::from_code(&self.house_system)?;
        Ok(())
    }

    /// Parse `tz_str` as an IANA zone name.
    pub fn timezone(&self) -> Result<Tz, ValidationError> {
        self.tz_str
            .parse::<Tz>()
            .map_err(|_| ValidationError::UnknownTimezone(self.tz_str.clone()))
    }

    /// Validate and convert to a UTC birth moment.
    ///
    /// Ambiguous local times (a DST fold) resolve to the earlier instant.
    pub fn resolve(&self) -> Result<BirthMoment, ResolveError> {
        self.validate()?;
        let tz = self.timezone()?;
        let house_system = HouseSystem::from_code(&self.house_system)?;
        let naive = NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_opt(self.hour, self.minute, 0))
            .ok_or_else(|| ValidationError::Invalid("invalid date or time".to_string()))?;

        let local = match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => {
                return Err(TimezoneError::NonexistentLocalTime {
                    local: naive.format("%Y-%m-%d %H:%M").to_string(),
                    tz: self.tz_str.clone(),
                }
                .into())
            }
        };
        let utc = local.with_timezone(&Utc);

        Ok(BirthMoment {
            utc,
            julian_day: JulianDay::from_datetime(utc),
            lat: self.lat,
            lng: self.lng,
            tz,
            house_system,
        })
    }

    pub fn summary(&self) -> BirthSummary {
        BirthSummary {
            date: format!("{:04}-{:02}-{:02}", self.year, self.month, self.day),
            time: format!("{:02}:{:02}", self.hour, self.minute),
            location: LocationSummary {
                lat: self.lat,
                lng: self.lng,
                timezone: self.tz_str.clone(),
                place: self.place.clone(),
            },
        }
    }
}
