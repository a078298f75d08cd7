//! Error types for the sky API
//!
//! Every failure that reaches the HTTP surface is rendered as `{"error": "..."}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::astronomy::AstronomyError;
use crate::weather::WeatherError;

/// Message shown to clients whenever the weather provider cannot be used.
pub const WEATHER_UNAVAILABLE: &str = "Weather service unavailable";

/// Message shown to clients whenever the astronomy provider fails.
pub const ASTRONOMY_FAILED: &str = "Astronomy computation failed";

// == Cache Error Enum ==
/// Failures raised by a cache store backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key longer than the store accepts
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value larger than the store accepts
    #[error("Value too large: {0} bytes")]
    ValueTooLarge(usize),

    /// Store is at capacity with nothing expired to sweep
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Backend could not be reached
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),
}

// == App Error Enum ==
/// Unified error type for the HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad query parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Weather provider failed (timeout, network, malformed body)
    #[error("weather provider failed: {0}")]
    Weather(#[from] WeatherError),

    /// Astronomy provider failed
    #[error("astronomy provider failed: {0}")]
    Astronomy(#[from] AstronomyError),

    /// Response could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Weather(err) => {
                tracing::warn!(error = %err, "weather request failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    WEATHER_UNAVAILABLE.to_string(),
                )
            }
            AppError::Astronomy(AstronomyError::InvalidLocation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Astronomy(err) => {
                tracing::error!(error = %err, "astronomy computation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ASTRONOMY_FAILED.to_string(),
                )
            }
            AppError::Serialization(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the handlers.
pub type Result<T> = std::result::Result<T, AppError>;
