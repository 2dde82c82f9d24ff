//! HTTP handlers for the REST API.
//!
//! Calculation and rendering are CPU bound and the Swiss Ephemeris adapter
//! serializes on a lock, so every non-trivial handler hands its work to the
//! blocking pool.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, info};

use super::dto::{
    BodygraphQuery, HealthResponse, HealthSystems, NatalChartQuery, ServiceInfo,
    SystemDescriptions, TransitQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::astrology::{calculate_natal_chart, calculate_transits, NatalChart, Transits};
use crate::humandesign::{calculate_human_design, HumanDesignChart};
use crate::models::BirthData;
use crate::render::{render_bodygraph, render_natal_chart, RenderedImage};
use crate::synthesis::{render_both, synthesize, ChartBundle, Synthesis};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run `f` on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
}

fn validated(payload: Result<Json<BirthData>, JsonRejection>) -> Result<BirthData, AppError> {
    let Json(birth) = payload?;
    birth.validate()?;
    Ok(birth)
}

fn image_response(image: RenderedImage) -> Response {
    (
        [(header::CONTENT_TYPE, image.media_type())],
        image.bytes,
    )
        .into_response()
}

// =============================================================================
// Service
// =============================================================================

/// GET /
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "Cartographer".to_string(),
        version: VERSION.to_string(),
        description: "Unified Archetypal Mapping Engine".to_string(),
        systems: SystemDescriptions {
            astrology: "Western natal charts, transits, aspects".to_string(),
            humandesign: "Bodygraph calculations, mechanics, gates".to_string(),
            synthesis: "Combined astrology + HD portraits".to_string(),
        },
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "operational".to_string(),
        version: VERSION.to_string(),
        systems: HealthSystems {
            astrology: "cartographer".to_string(),
            humandesign: "cartographer".to_string(),
            ephemeris: state.ephemeris.name().to_string(),
        },
    })
}

// =============================================================================
// Astrology
// =============================================================================

/// POST /astrology/calculate
pub async fn calculate_astrology(
    State(state): State<AppState>,
    payload: Result<Json<BirthData>, JsonRejection>,
) -> HandlerResult<NatalChart> {
    let birth = validated(payload)?;
    info!("Natal chart for {}", birth.name);

    let chart = blocking(move || Ok(calculate_natal_chart(state.ephemeris.as_ref(), &birth)?))
        .await?;
    Ok(Json(chart))
}

/// GET /astrology/chart
///
/// Natal wheel image in the requested format (PNG by default).
pub async fn astrology_chart(
    State(state): State<AppState>,
    query: Result<Query<NatalChartQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let birth = query.birth_data();
    birth.validate()?;
    let (format, theme) = (query.format, query.theme);
    info!("Natal chart image for {} as {}", birth.name, format);

    let image = blocking(move || {
        let chart = calculate_natal_chart(state.ephemeris.as_ref(), &birth)?;
        let svg = render_natal_chart(&chart, theme);
        Ok(state.rasterizer.render(svg, format)?)
    })
    .await?;

    debug!("Natal chart image: {} bytes", image.bytes.len());
    Ok(image_response(image))
}

/// GET /astrology/transits
///
/// Current planetary positions for an observer (defaults: 0, 0, UTC).
pub async fn astrology_transits(
    State(state): State<AppState>,
    query: Result<Query<TransitQuery>, QueryRejection>,
) -> HandlerResult<Transits> {
    let Query(query) = query?;
    let now = Utc::now();

    let transits = blocking(move || {
        Ok(calculate_transits(
            state.ephemeris.as_ref(),
            now,
            query.lat,
            query.lng,
            &query.tz_str,
        )?)
    })
    .await?;
    Ok(Json(transits))
}

// =============================================================================
// Human Design
// =============================================================================

/// POST /humandesign/calculate
pub async fn calculate_humandesign(
    State(state): State<AppState>,
    payload: Result<Json<BirthData>, JsonRejection>,
) -> HandlerResult<HumanDesignChart> {
    let birth = validated(payload)?;
    info!("Human Design chart for {}", birth.name);

    let chart = blocking(move || {
        Ok(calculate_human_design(
            state.ephemeris.as_ref(),
            &state.dignities,
            &birth,
        )?)
    })
    .await?;
    Ok(Json(chart))
}

/// GET /humandesign/bodygraph
///
/// Bodygraph image with optional activation panels and summary block.
pub async fn humandesign_bodygraph(
    State(state): State<AppState>,
    query: Result<Query<BodygraphQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let birth = query.birth_data();
    birth.validate()?;
    let options = query.options();
    let format = query.format;
    info!("Bodygraph for {} as {}", birth.name, format);

    let image = blocking(move || {
        let chart = calculate_human_design(state.ephemeris.as_ref(), &state.dignities, &birth)?;
        let svg = render_bodygraph(&chart, &state.layout, &options);
        Ok(state.rasterizer.render(svg, format)?)
    })
    .await?;

    Ok(image_response(image))
}

// =============================================================================
// Synthesis
// =============================================================================

/// POST /synthesis/complete
pub async fn synthesis_complete(
    State(state): State<AppState>,
    payload: Result<Json<BirthData>, JsonRejection>,
) -> HandlerResult<Synthesis> {
    let birth = validated(payload)?;
    info!("Synthesis for {}", birth.name);

    let portrait = blocking(move || {
        Ok(synthesize(
            state.ephemeris.as_ref(),
            &state.dignities,
            &birth,
        )?)
    })
    .await?;
    Ok(Json(portrait))
}

/// POST /synthesis/charts
///
/// Natal wheel (PNG) and bodygraph (SVG), both base64 encoded.
pub async fn synthesis_charts(
    State(state): State<AppState>,
    payload: Result<Json<BirthData>, JsonRejection>,
) -> HandlerResult<ChartBundle> {
    let birth = validated(payload)?;
    info!("Chart bundle for {}", birth.name);

    let bundle = blocking(move || {
        Ok(render_both(
            state.ephemeris.as_ref(),
            &state.dignities,
            &state.layout,
            &state.rasterizer,
            &birth,
        )?)
    })
    .await?;
    Ok(Json(bundle))
}
