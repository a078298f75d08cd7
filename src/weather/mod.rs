//! Weather Module
//!
//! Current conditions from an outbound weather API, behind the
//! [`WeatherProvider`] trait so tests can count calls or simulate failures.

mod open_meteo;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Location, WeatherReport};
use crate::shaper::{describe_weather_code, round_temperature};

pub use open_meteo::OpenMeteoClient;

// == Weather Error Enum ==
/// Every way a weather lookup can fail. All of them surface to clients as
/// the same generic message.
#[derive(Error, Debug)]
pub enum WeatherError {
    /// No response within the configured timeout
    #[error("weather request timed out")]
    Timeout,

    /// Connection or transport failure
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("weather provider returned status {0}")]
    Status(u16),

    /// Body was not the JSON we expect
    #[error("failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw observation as reported by a provider. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    /// Degrees Fahrenheit
    pub temperature: Option<f64>,
    /// Miles per hour
    pub wind_speed: Option<f64>,
    /// Relative humidity, percent
    pub humidity: Option<f64>,
    /// Surface pressure, hPa
    pub pressure: Option<f64>,
    /// Metres
    pub visibility: Option<f64>,
    /// WMO interpretation code
    pub weather_code: Option<i64>,
    /// IANA zone name of the location
    pub timezone: Option<String>,
    pub utc_offset_seconds: Option<i64>,
    /// Local wall-clock time of the observation
    pub local_time: Option<String>,
}

impl CurrentConditions {
    /// Applies the null-safety defaults and rounding of the public contract.
    pub fn into_report(self) -> WeatherReport {
        WeatherReport {
            temp: round_temperature(self.temperature.unwrap_or_default()),
            windspeed: self.wind_speed.unwrap_or_default(),
            humidity: self.humidity.unwrap_or_default(),
            pressure: self.pressure.unwrap_or_default(),
            visibility: self.visibility.unwrap_or_default(),
            description: describe_weather_code(self.weather_code).to_string(),
            timezone: self.timezone.unwrap_or_default(),
            utc_offset: self.utc_offset_seconds.unwrap_or_default(),
            local_time: self.local_time.unwrap_or_default(),
        }
    }
}

// == Weather Provider ==
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, location: Location) -> Result<CurrentConditions, WeatherError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults_when_empty() {
        let report = CurrentConditions::default().into_report();

        assert_eq!(report.temp, 0);
        assert_eq!(report.windspeed, 0.0);
        assert_eq!(report.visibility, 0.0);
        assert_eq!(report.description, "Cloudy");
        assert_eq!(report.timezone, "");
        assert_eq!(report.utc_offset, 0);
        assert_eq!(report.local_time, "");
    }

    #[test]
    fn test_report_shapes_fields() {
        let conditions = CurrentConditions {
            temperature: Some(71.6),
            wind_speed: Some(4.2),
            humidity: Some(63.0),
            pressure: Some(1004.1),
            visibility: Some(24140.0),
            weather_code: Some(2),
            timezone: Some("America/Chicago".into()),
            utc_offset_seconds: Some(-18000),
            local_time: Some("2024-06-01T14:15".into()),
        };
        let report = conditions.into_report();

        assert_eq!(report.temp, 72);
        assert_eq!(report.windspeed, 4.2);
        assert_eq!(report.description, "Partly cloudy");
        assert_eq!(report.timezone, "America/Chicago");
        assert_eq!(report.utc_offset, -18000);
        assert_eq!(report.local_time, "2024-06-01T14:15");
    }
}
