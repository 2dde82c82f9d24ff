//! Router configuration for the HTTP API.
//!
//! Sets up all routes, token authentication and the shared middleware
//! (CORS, compression, tracing).

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::require_token;
use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        // Astrology
        .route("/astrology/calculate", post(handlers::calculate_astrology))
        .route("/astrology/chart", get(handlers::astrology_chart))
        .route("/astrology/transits", get(handlers::astrology_transits))
        // Human Design
        .route("/humandesign/calculate", post(handlers::calculate_humandesign))
        .route("/humandesign/bodygraph", get(handlers::humandesign_bodygraph))
        // Synthesis
        .route("/synthesis/complete", post(handlers::synthesis_complete))
        .route("/synthesis/charts", post(handlers::synthesis_charts))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ephemeris::TableEphemeris;
    use crate::humandesign::DignityTable;
    use crate::models::JulianDay;
    use crate::render::{BodygraphLayout, Rasterizer, RasterizerOptions};

    #[test]
    fn test_router_creation() {
        let state = AppState::new(
            Arc::new(TableEphemeris::new(JulianDay::new(2_451_545.0))),
            Arc::new(DignityTable::default()),
            Arc::new(BodygraphLayout::standard()),
            Arc::new(Rasterizer::new(&RasterizerOptions {
                load_system_fonts: false,
                ..Default::default()
            })),
        )
        .with_api_token(Some("secret".to_string()));
        let _router = create_router(state);
    }
}
