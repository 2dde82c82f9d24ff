//! Axum REST API.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP layer (axum handlers)                               │
//! │  - query / JSON parsing, validation, token check          │
//! │  - CORS, compression, tracing, error mapping              │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │ spawn_blocking
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  astrology / humandesign / synthesis / render             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Ephemeris trait (Swiss Ephemeris or fixture table)       │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
