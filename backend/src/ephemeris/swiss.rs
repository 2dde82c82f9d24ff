use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, houses_ex};
use swisseph::{AscMc, Cusp};
use tracing::{debug, info, warn};

use super::{Body, Ephemeris, EphemerisError, HousePositions, HouseSystem, PlanetaryPosition};
use crate::models::{normalize_degrees, JulianDay};

/// FLG_SWIEPH: use the Swiss Ephemeris data files (falls back to Moshier)
const FLG_SWIEPH: i32 = 2;
/// FLG_SPEED: also compute daily motion
const FLG_SPEED: i32 = 256;

/// Swiss Ephemeris backed positions.
///
/// The underlying C library keeps global state, so every call is serialized
/// through a single lock.
pub struct SwissEphemeris {
    data_path: Option<PathBuf>,
    lock: Mutex<()>,
}

impl SwissEphemeris {
    /// Create the adapter. When `data_path` is given it is exported as
    /// `SE_EPHE_PATH` before the library is first touched; a missing
    /// directory only logs a warning because the library falls back to its
    /// built-in analytical theory.
    pub fn new(data_path: Option<PathBuf>) -> Self {
        if let Some(path) = data_path.as_deref() {
            if !path.exists() {
                warn!(
                    "Ephemeris path {} does not exist; falling back to built-in theory",
                    path.display()
                );
            }
            std::env::set_var("SE_EPHE_PATH", path);
            info!("Swiss Ephemeris data path set to {}", path.display());
        }
        Self {
            data_path,
            lock: Mutex::new(()),
        }
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }
}

impl Ephemeris for SwissEphemeris {
    fn position(
        &self,
        body: Body,
        julian_day: JulianDay,
    ) -> Result<PlanetaryPosition, EphemerisError> {
        let _guard = self.lock.lock();
        let jd = julian_day.value();
        let result = calc_ut(jd, body.swiss_id() as u32, (FLG_SWIEPH | FLG_SPEED) as u32)
            .map_err(|e| EphemerisError::CalculationFailed {
                body,
                julian_day: jd,
                message: format!("Swiss Ephemeris error: {}", e),
            })?;

        let out = result.out;
        if !out[0].is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body,
                julian_day: jd,
                message: "non-finite longitude".to_string(),
            });
        }
        debug!("{} at JD {:.5}: {:.6}°", body, jd, out[0]);
        Ok(PlanetaryPosition::new(out[0], out[1], out[3]))
    }

    fn houses(
        &self,
        julian_day: JulianDay,
        lat: f64,
        lng: f64,
        system: HouseSystem,
    ) -> Result<HousePositions, EphemerisError> {
        let _guard = self.lock.lock();
        let (c, a) = houses_ex(julian_day.value(), 0, lat, lng, system.code() as i32);
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let values = [
            cusps.first,
            cusps.second,
            cusps.third,
            cusps.fourth,
            cusps.fifth,
            cusps.sixth,
            cusps.seventh,
            cusps.eighth,
            cusps.ninth,
            cusps.tenth,
            cusps.eleventh,
            cusps.twelfth,
        ];
        if values.iter().any(|v| !v.is_finite()) || !ascmc.ascendant.is_finite() {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!(
                    "{} houses undefined at lat {:.4}, lng {:.4}",
                    system.name(),
                    lat,
                    lng
                ),
            });
        }

        Ok(HousePositions {
            cusps: values.map(normalize_degrees),
            ascendant: normalize_degrees(ascmc.ascendant),
            midheaven: normalize_degrees(ascmc.mc),
        })
    }

    fn name(&self) -> &'static str {
        "swiss-ephemeris"
    }
}
