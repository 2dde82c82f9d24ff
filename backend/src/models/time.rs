use serde::*;

/// Julian Day on the Universal Time scale.
/// JD 2440587.5 = 1970-01-01 00:00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDay(f64);

/// Julian Day of the Unix epoch.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

impl JulianDay {
    /// Create a new Julian Day value.
    pub fn new(v: f64) -> Self {
        Self(v)
    }

    /// Raw Julian Day as f64.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Shift by a (possibly fractional) number of days.
    pub fn add_days(&self, days: f64) -> Self {
        Self(self.0 + days)
    }

    /// Convert to Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn to_unix_timestamp(&self) -> f64 {
        (self.0 - UNIX_EPOCH_JD) * 86400.0
    }

    /// Create from Unix timestamp (seconds since 1970-01-01 00:00:00 UTC).
    pub fn from_unix_timestamp(timestamp: f64) -> Self {
        Self(timestamp / 86400.0 + UNIX_EPOCH_JD)
    }

    /// Convert to chrono DateTime<Utc>, rounded to the millisecond.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        let millis = (self.to_unix_timestamp() * 1000.0).round() as i64;
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or(chrono::DateTime::UNIX_EPOCH)
    }

    /// Create from chrono DateTime<Utc>.
    pub fn from_datetime(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Self::from_unix_timestamp(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9)
    }
}

impl From<f64> for JulianDay {
    fn from(v: f64) -> Self {
        JulianDay::new(v)
    }
}
