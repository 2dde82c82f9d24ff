//! HTTP error handling and response types.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::astrology::AstrologyError;
use crate::humandesign::HumanDesignError;
use crate::models::{ResolveError, ValidationError};
use crate::render::RenderError;
use crate::synthesis::SynthesisError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Missing or wrong `x-api-token`
    Unauthorized,
    /// Calculation or rendering failure
    Internal(String),
    /// Downstream failure with the kind of component that raised it
    Downstream { code: &'static str, message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", "Invalid or missing API token"),
            ),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", msg),
                )
            }
            AppError::Downstream { code, message } => {
                error!("{}: {}", code, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new(code, message),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Validation(e) => e.into(),
            ResolveError::Timezone(e) => AppError::Downstream {
                code: "TIMEZONE_ERROR",
                message: e.to_string(),
            },
        }
    }
}

impl From<AstrologyError> for AppError {
    fn from(err: AstrologyError) -> Self {
        match err {
            AstrologyError::Resolve(e) => e.into(),
            AstrologyError::Ephemeris(e) => AppError::Downstream {
                code: "EPHEMERIS_ERROR",
                message: e.to_string(),
            },
        }
    }
}

impl From<HumanDesignError> for AppError {
    fn from(err: HumanDesignError) -> Self {
        match err {
            HumanDesignError::Resolve(e) => e.into(),
            HumanDesignError::Ephemeris(e) => AppError::Downstream {
                code: "EPHEMERIS_ERROR",
                message: e.to_string(),
            },
            e @ HumanDesignError::DesignMomentNotFound { .. } => AppError::Downstream {
                code: "DESIGN_MOMENT_ERROR",
                message: e.to_string(),
            },
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Downstream {
            code: "RENDER_ERROR",
            message: err.to_string(),
        }
    }
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Astrology(e) => e.into(),
            SynthesisError::HumanDesign(e) => e.into(),
            SynthesisError::Render(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::{Body, EphemerisError};
    use crate::models::TimezoneError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: AppError = ValidationError::UnknownTimezone("Mars/Olympus".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_nonexistent_local_time_is_internal() {
        let err: AppError = AstrologyError::Resolve(ResolveError::Timezone(
            TimezoneError::NonexistentLocalTime {
                local: "2021-03-28 01:30".into(),
                tz: "Europe/London".into(),
            },
        ))
        .into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ephemeris_failure_is_internal() {
        let err: AppError =
            HumanDesignError::Ephemeris(EphemerisError::UnsupportedBody(Body::Chiron)).into();
        match &err {
            AppError::Downstream { code, .. } => assert_eq!(*code, "EPHEMERIS_ERROR"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_error_body() {
        let response = AppError::Internal("Task join error: cancelled".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["message"], "Task join error: cancelled");
    }

    #[test]
    fn test_api_error_details_are_optional() {
        let json = serde_json::to_value(ApiError::new("BAD_REQUEST", "nope")).unwrap();
        assert!(json.get("details").is_none());
        let json =
            serde_json::to_value(ApiError::new("BAD_REQUEST", "nope").with_details("x")).unwrap();
        assert_eq!(json["details"], "x");
    }
}
