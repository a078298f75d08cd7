//! API Routes
//!
//! Configures the Axum router with every sky API endpoint.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, moon_details_handler, moon_illumination_handler, sky_summary_handler,
    stats_handler, weather_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /sky-summary` - Moon, sun and planets for a location
/// - `GET /weather` - Current conditions for a location
/// - `GET /moon-details` - Moon position and upcoming phases
/// - `GET /moon-illumination` - Lit fraction of the moon
/// - `GET /cache/stats` - Cache counters
/// - `GET /health` - Health check endpoint
///
/// Location endpoints take optional `lat` and `lon` query parameters.
pub fn create_router(state: AppState) -> Router {
    // The frontend is served from elsewhere; allow everything
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sky-summary", get(sky_summary_handler))
        .route("/weather", get(weather_handler))
        .route("/moon-details", get(moon_details_handler))
        .route("/moon-illumination", get(moon_illumination_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
