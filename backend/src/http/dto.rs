//! Data Transfer Objects for the HTTP API.
//!
//! Calculation results (natal chart, Human Design chart, synthesis) already
//! derive `Serialize` and are returned as-is; this module only holds the
//! service metadata bodies and the query-string shapes of the GET endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{default_house_system, BirthData};
use crate::render::{BodygraphOptions, ChartFormat, Theme};

/// Response for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub systems: SystemDescriptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemDescriptions {
    pub astrology: String,
    pub humandesign: String,
    pub synthesis: String,
}

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub systems: HealthSystems,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSystems {
    pub astrology: String,
    pub humandesign: String,
    pub ephemeris: String,
}

/// Query for `GET /astrology/chart`.
///
/// Birth fields are spelled out rather than flattened from [`BirthData`]:
/// flattened query strings lose their numeric types.
#[derive(Debug, Clone, Deserialize)]
pub struct NatalChartQuery {
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
    #[serde(default)]
    pub format: ChartFormat,
    #[serde(default)]
    pub theme: Theme,
    /// Place label printed in the metadata panel
    #[serde(default)]
    pub city: Option<String>,
}

impl NatalChartQuery {
    pub fn birth_data(&self) -> BirthData {
        BirthData {
            name: self.name.clone(),
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            lat: self.lat,
            lng: self.lng,
            tz_str: self.tz_str.clone(),
            house_system: self.house_system.clone(),
            place: self.city.clone().filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Query for `GET /humandesign/bodygraph`.
#[derive(Debug, Clone, Deserialize)]
pub struct BodygraphQuery {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub lat: f64,
    pub lng: f64,
    pub tz_str: String,
    #[serde(default)]
    pub format: ChartFormat,
    #[serde(default = "default_true")]
    pub panels: bool,
    #[serde(default)]
    pub summary: bool,
    #[serde(default)]
    pub theme: Theme,
}

impl BodygraphQuery {
    pub fn birth_data(&self) -> BirthData {
        BirthData {
            name: self.name.clone(),
            year: self.year,
            month: self.month,
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            lat: self.lat,
            lng: self.lng,
            tz_str: self.tz_str.clone(),
            house_system: default_house_system(),
            place: None,
        }
    }

    pub fn options(&self) -> BodygraphOptions {
        BodygraphOptions {
            panels: self.panels,
            summary: self.summary,
            theme: self.theme,
        }
    }
}

/// Query for `GET /astrology/transits`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitQuery {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default = "default_tz")]
    pub tz_str: String,
}

fn default_true() -> bool {
    true
}

fn default_tz() -> String {
    "UTC".to_string()
}
