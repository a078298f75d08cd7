//! API Handlers
//!
//! One handler per endpoint. Location endpoints resolve the query against the
//! configured defaults and go through the read-through cache.

use std::future::ready;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;

use crate::astronomy::{AstronomyProvider, EphemerisProvider};
use crate::cache::{CachedJson, ReadThroughCache, SharedStore};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{HealthResponse, Location, LocationQuery, StatsResponse};
use crate::sky;
use crate::weather::{OpenMeteoClient, WeatherProvider};

/// Cache namespaces, one per cached endpoint.
pub const SKY_SUMMARY: &str = "sky_summary";
pub const WEATHER: &str = "weather";
pub const MOON_DETAILS: &str = "moon_details";
pub const MOON_ILLUMINATION: &str = "moon_illumination";

/// Query extraction with the rejection kept, so bad input still gets a JSON
/// error body.
pub type LocationParams = std::result::Result<Query<LocationQuery>, QueryRejection>;

/// Application state shared across all handlers.
///
/// Built once in `main`; tests assemble one from fakes with [`AppState::new`].
#[derive(Clone)]
pub struct AppState {
    pub cache: ReadThroughCache,
    pub astronomy: Arc<dyn AstronomyProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    /// Used for whichever of lat/lon the query omits
    pub defaults: Location,
}

impl AppState {
    pub fn new(
        cache: ReadThroughCache,
        astronomy: Arc<dyn AstronomyProvider>,
        weather: Arc<dyn WeatherProvider>,
        defaults: Location,
    ) -> Self {
        Self {
            cache,
            astronomy,
            weather,
            defaults,
        }
    }

    /// Builds the astronomy and weather providers and the cache store.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let weather = OpenMeteoClient::new(
            config.weather_base_url.clone(),
            Duration::from_secs(config.weather_timeout_secs),
        )?;
        let store = SharedStore::new(config.cache_max_entries);

        Ok(Self::new(
            ReadThroughCache::new(Arc::new(store), config.cache_ttl),
            Arc::new(EphemerisProvider::new()),
            Arc::new(weather),
            Location {
                latitude: config.default_latitude,
                longitude: config.default_longitude,
            },
        ))
    }

    fn resolve(&self, query: LocationParams) -> Result<Location> {
        let Query(query) =
            query.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
        query.resolve(self.defaults)
    }
}

/// Handler for GET /sky-summary
pub async fn sky_summary_handler(
    State(state): State<AppState>,
    query: LocationParams,
) -> Result<CachedJson> {
    let location = state.resolve(query)?;
    let astronomy = state.astronomy.as_ref();

    state
        .cache
        .get_or_compute(SKY_SUMMARY, location, |location| {
            ready(sky::sky_summary(astronomy, &location, Utc::now()).map_err(AppError::from))
        })
        .await
}

/// Handler for GET /moon-details
pub async fn moon_details_handler(
    State(state): State<AppState>,
    query: LocationParams,
) -> Result<CachedJson> {
    let location = state.resolve(query)?;
    let astronomy = state.astronomy.as_ref();

    state
        .cache
        .get_or_compute(MOON_DETAILS, location, |location| {
            ready(sky::moon_details(astronomy, &location, Utc::now()).map_err(AppError::from))
        })
        .await
}

/// Handler for GET /moon-illumination
///
/// Illumination does not depend on the observer, but the location still keys
/// the cache so every endpoint shares one key scheme.
pub async fn moon_illumination_handler(
    State(state): State<AppState>,
    query: LocationParams,
) -> Result<CachedJson> {
    let location = state.resolve(query)?;
    let astronomy = state.astronomy.as_ref();

    state
        .cache
        .get_or_compute(MOON_ILLUMINATION, location, |_| {
            ready(sky::moon_illumination(astronomy, Utc::now()).map_err(AppError::from))
        })
        .await
}

/// Handler for GET /weather
pub async fn weather_handler(
    State(state): State<AppState>,
    query: LocationParams,
) -> Result<CachedJson> {
    let location = state.resolve(query)?;
    let weather = state.weather.as_ref();

    state
        .cache
        .get_or_compute(WEATHER, location, |location| async move {
            let conditions = weather.current(location).await?;
            Ok::<_, AppError>(conditions.into_report())
        })
        .await
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;

    Json(StatsResponse {
        hits: stats.hits,
        misses: stats.misses,
        evictions: stats.evictions,
        total_entries: stats.total_entries,
        hit_rate: stats.hit_rate(),
        ttl_seconds: state.cache.ttl_seconds(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
