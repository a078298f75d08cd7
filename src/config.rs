//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::MAX_TTL_SECONDS;

/// Fallback observer latitude (Franklin, TN).
pub const DEFAULT_LATITUDE: f64 = 35.92;

/// Fallback observer longitude (Franklin, TN).
pub const DEFAULT_LONGITUDE: f64 = -86.86;

/// Open-Meteo forecast endpoint.
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Seconds a cached handler response stays fresh
    pub cache_ttl: u64,
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// Weather forecast endpoint
    pub weather_base_url: String,
    /// Timeout for the outbound weather call, in seconds
    pub weather_timeout_secs: u64,
    /// Latitude used when a request omits `lat`
    pub default_latitude: f64,
    /// Longitude used when a request omits `lon`
    pub default_longitude: f64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 120, capped at one year)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `WEATHER_BASE_URL` - Forecast endpoint (default: Open-Meteo)
    /// - `WEATHER_TIMEOUT_SECS` - Weather request timeout (default: 5)
    /// - `DEFAULT_LAT` / `DEFAULT_LON` - Fallback location (default: 35.92 / -86.86)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_ttl: parse_var("CACHE_TTL")
                .map(bounded_ttl)
                .unwrap_or(defaults.cache_ttl),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.cache_max_entries),
            weather_base_url: env::var("WEATHER_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.weather_base_url),
            weather_timeout_secs: parse_var("WEATHER_TIMEOUT_SECS")
                .unwrap_or(defaults.weather_timeout_secs),
            default_latitude: parse_var("DEFAULT_LAT").unwrap_or(defaults.default_latitude),
            default_longitude: parse_var("DEFAULT_LON").unwrap_or(defaults.default_longitude),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            cache_ttl: 120,
            cache_max_entries: 1000,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            weather_timeout_secs: 5,
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
        }
    }
}

/// Keeps expiry instants representable on every platform.
fn bounded_ttl(ttl: u64) -> u64 {
    ttl.min(MAX_TTL_SECONDS)
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
