//! Open-Meteo forecast client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{CurrentConditions, WeatherError, WeatherProvider};
use crate::models::Location;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,surface_pressure,visibility,weather_code,wind_speed_10m";

#[derive(Debug, Default, Deserialize)]
struct ForecastResponse {
    timezone: Option<String>,
    utc_offset_seconds: Option<i64>,
    current: Option<CurrentBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentBlock {
    time: Option<String>,
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    surface_pressure: Option<f64>,
    visibility: Option<f64>,
    weather_code: Option<i64>,
    wind_speed_10m: Option<f64>,
}

impl From<ForecastResponse> for CurrentConditions {
    fn from(response: ForecastResponse) -> Self {
        let current = response.current.unwrap_or_default();
        CurrentConditions {
            temperature: current.temperature_2m,
            wind_speed: current.wind_speed_10m,
            humidity: current.relative_humidity_2m,
            pressure: current.surface_pressure,
            visibility: current.visibility,
            weather_code: current.weather_code,
            timezone: response.timezone,
            utc_offset_seconds: response.utc_offset_seconds,
            local_time: current.time,
        }
    }
}

/// Decodes a forecast body. Absent fields are kept as `None`.
fn parse_forecast(body: &str) -> Result<CurrentConditions, WeatherError> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    Ok(response.into())
}

/// Client for the Open-Meteo `/v1/forecast` endpoint, imperial units.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    /// Builds the HTTP client once; `timeout` bounds each whole request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(concat!("skywatch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current(&self, location: Location) -> Result<CurrentConditions, WeatherError> {
        let latitude = location.latitude.to_string();
        let longitude = location.longitude.to_string();

        debug!(lat = %latitude, lon = %longitude, "requesting current weather");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("temperature_unit", "fahrenheit"),
                ("wind_speed_unit", "mph"),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(map_transport_error)?;
        parse_forecast(&body)
    }
}

fn map_transport_error(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        WeatherError::Timeout
    } else {
        WeatherError::RequestFailed(err)
    }
}
