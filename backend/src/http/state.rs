//! Application state for the HTTP server.

use std::sync::Arc;

use crate::ephemeris::Ephemeris;
use crate::humandesign::DignityTable;
use crate::render::{BodygraphLayout, Rasterizer};

/// Shared, read-only state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub ephemeris: Arc<dyn Ephemeris>,
    pub dignities: Arc<DignityTable>,
    pub layout: Arc<BodygraphLayout>,
    pub rasterizer: Arc<Rasterizer>,
    /// Expected `x-api-token`; `None` leaves the API open
    pub api_token: Option<Arc<str>>,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(
        ephemeris: Arc<dyn Ephemeris>,
        dignities: Arc<DignityTable>,
        layout: Arc<BodygraphLayout>,
        rasterizer: Arc<Rasterizer>,
    ) -> Self {
        Self {
            ephemeris,
            dignities,
            layout,
            rasterizer,
            api_token: None,
            body_limit: 64 * 1024,
        }
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.is_empty()).map(Arc::from);
        self
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }
}
