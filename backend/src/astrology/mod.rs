//! Western tropical astrology: natal charts and current transits.

pub mod aspects;
pub mod calculator;
pub mod transits;

pub use aspects::{calculate_aspects, Aspect, AspectKind};
pub use calculator::{
    calculate_natal_chart, Angles, ElementBalance, HouseCusp, LunarPhase, ModalityBalance,
    MoonPhase, NatalChart, PlanetPlacement,
};
pub use transits::{calculate_transits, TransitPosition, Transits};

use thiserror::Error;

use crate::ephemeris::EphemerisError;
use crate::models::{ResolveError, ValidationError};

#[derive(Debug, Error)]
pub enum AstrologyError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

impl From<ValidationError> for AstrologyError {
    fn from(err: ValidationError) -> Self {
        AstrologyError::Resolve(err.into())
    }
}
