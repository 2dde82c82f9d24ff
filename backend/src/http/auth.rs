//! Optional shared-token authentication.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::error::AppError;
use super::state::AppState;

pub const TOKEN_HEADER: &str = "x-api-token";

/// Reject requests whose `x-api-token` does not match the configured token.
/// Passes everything through when no token is configured.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.api_token.as_deref() {
        let presented = request
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected) {
            warn!("Rejected {} {}: bad API token", request.method(), request.uri().path());
            return Err(AppError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}
