//! # Cartographer
//!
//! Unified archetypal mapping engine: Western natal astrology and Human
//! Design computed from the same ephemeris, rendered as SVG, PNG or PDF and
//! served over a REST API.
//!
//! ## Architecture
//!
//! - [`models`]: birth data, validation, Julian Day and zodiac primitives
//! - [`ephemeris`]: the position seam ([`ephemeris::Ephemeris`]) with the
//!   Swiss Ephemeris adapter and a deterministic fixture table
//! - [`astrology`]: natal charts, aspects, lunar phase, transits
//! - [`humandesign`]: gates, lines, dignities, centers, type, authority,
//!   profile, incarnation cross and variables
//! - [`render`]: bodygraph and natal wheel SVG, PNG and PDF conversion
//! - [`synthesis`]: combined portraits
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: Axum server and request handlers

pub mod astrology;
pub mod config;
pub mod ephemeris;
pub mod humandesign;
pub mod models;
pub mod render;
pub mod synthesis;

#[cfg(feature = "http-server")]
pub mod http;
