//! Response DTOs for the sky API
//!
//! The JSON contract consumed by the frontend. Field names are part of the
//! contract and must not change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response body for `GET /sky-summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkySummary {
    pub moon: MoonSummary,
    pub sun: SunSummary,
    /// Keyed by planet display name
    pub planets: BTreeMap<String, PlanetPosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonSummary {
    /// Percent of the disk lit, 2 dp
    pub illumination: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunSummary {
    /// First sunrise of the current UTC day, ISO-8601
    pub sunrise: Option<String>,
    /// First sunset of the current UTC day, ISO-8601
    pub sunset: Option<String>,
    /// Degrees above the horizon, 1 dp
    pub current_altitude: f64,
    /// "Golden Hour", "Blue Hour" or "Standard"
    pub phase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub altitude: f64,
    pub azimuth: f64,
    pub is_visible: bool,
}

/// Response body for `GET /moon-details`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonDetails {
    pub illumination: f64,
    pub altitude: f64,
    pub azimuth: f64,
    pub milestones: Vec<PhaseMilestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMilestone {
    /// "New Moon", "First Quarter", "Full Moon" or "Last Quarter"
    pub phase: String,
    /// UTC calendar date, `YYYY-MM-DD`
    pub date: String,
}

/// Response body for `GET /moon-illumination`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonIllumination {
    pub illumination: f64,
}

/// Response body for `GET /weather`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Degrees Fahrenheit, rounded to an integer
    pub temp: i64,
    /// Miles per hour
    pub windspeed: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Surface pressure, hPa
    pub pressure: f64,
    pub visibility: f64,
    pub description: String,
    /// IANA zone resolved by the provider
    pub timezone: String,
    /// Seconds east of UTC
    pub utc_offset: i64,
    /// Provider's local timestamp for the observation
    pub local_time: String,
}

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
    pub ttl_seconds: u64,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
