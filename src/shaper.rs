//! Response Shaper
//!
//! Rounding, code-to-text mapping and light-phase classification applied to
//! provider output before it is serialized.

use chrono::{DateTime, Utc};

/// Label used for weather codes we have no text for, and for a missing code.
pub const FALLBACK_DESCRIPTION: &str = "Cloudy";

/// Rounds to `places` decimals the way the value prints: from its exact
/// binary value, with exact ties going to the even digit. `0.35` (stored just
/// below) gives `0.3`, `35.25` (an exact tie) gives `35.2`.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Lit fraction (0..=1) as a percentage with two decimals.
pub fn illumination_percent(fraction: f64) -> f64 {
    round_to(fraction * 100.0, 2)
}

/// Altitude or azimuth, one decimal.
pub fn round_angle(degrees: f64) -> f64 {
    round_to(degrees, 1)
}

pub fn round_temperature(value: f64) -> i64 {
    round_to(value, 0) as i64
}

/// WMO weather interpretation code to text.
pub fn describe_weather_code(code: Option<i64>) -> &'static str {
    match code {
        Some(0) => "Clear sky",
        Some(1) => "Mainly clear",
        Some(2) => "Partly cloudy",
        Some(3) => "Overcast",
        Some(45) => "Fog",
        Some(48) => "Depositing rime fog",
        Some(51) => "Light drizzle",
        Some(53) => "Moderate drizzle",
        Some(55) => "Dense drizzle",
        Some(61) => "Slight rain",
        Some(63) => "Moderate rain",
        Some(65) => "Heavy rain",
        Some(71) => "Slight snow",
        Some(73) => "Moderate snow",
        Some(75) => "Heavy snow",
        Some(95) => "Thunderstorm",
        _ => FALLBACK_DESCRIPTION,
    }
}

/// `2024-03-20T06:02:11Z`
pub fn iso_utc(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// `2024-03-20`
pub fn iso_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

// == Light Phase ==
/// Photographer's light classification from the sun's altitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightPhase {
    GoldenHour,
    BlueHour,
    Standard,
}

impl LightPhase {
    /// Golden band is checked first so the shared -4° edge is golden.
    pub fn from_sun_altitude(altitude: f64) -> Self {
        if (-4.0..=6.0).contains(&altitude) {
            LightPhase::GoldenHour
        } else if (-6.0..-4.0).contains(&altitude) {
            LightPhase::BlueHour
        } else {
            LightPhase::Standard
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LightPhase::GoldenHour => "Golden Hour",
            LightPhase::BlueHour => "Blue Hour",
            LightPhase::Standard => "Standard",
        }
    }
}
