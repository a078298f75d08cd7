//! Request DTOs for the sky API
//!
//! Query parameters shared by every location-based endpoint.

use serde::Deserialize;

use crate::error::AppError;

/// Observer position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Checks the coordinates are finite and on the globe.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::InvalidRequest(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::InvalidRequest(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }
        Ok(())
    }
}

/// Query string for `?lat=<float>&lon=<float>`, both optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationQuery {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl LocationQuery {
    /// Fills missing coordinates from `defaults` and validates the result.
    pub fn resolve(&self, defaults: Location) -> Result<Location, AppError> {
        let location = Location {
            latitude: self.lat.unwrap_or(defaults.latitude),
            longitude: self.lon.unwrap_or(defaults.longitude),
        };
        location.validate()?;
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: Location = Location {
        latitude: 35.92,
        longitude: -86.86,
    };

    #[test]
    fn test_query_deserialize_empty() {
        let query: LocationQuery = serde_json::from_str("{}").unwrap();
        assert!(query.lat.is_none());
        assert!(query.lon.is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let location = LocationQuery::default().resolve(HOME).unwrap();
        assert_eq!(location, HOME);
    }

    #[test]
    fn test_resolve_partial() {
        let query = LocationQuery {
            lat: Some(51.48),
            lon: None,
        };
        let location = query.resolve(HOME).unwrap();
        assert_eq!(location.latitude, 51.48);
        assert_eq!(location.longitude, -86.86);
    }

    #[test]
    fn test_resolve_rejects_out_of_range() {
        let query = LocationQuery {
            lat: Some(91.0),
            lon: Some(0.0),
        };
        assert!(matches!(
            query.resolve(HOME),
            Err(AppError::InvalidRequest(_))
        ));

        let query = LocationQuery {
            lat: Some(0.0),
            lon: Some(-180.5),
        };
        assert!(query.resolve(HOME).is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let location = Location {
            latitude: f64::NAN,
            longitude: 0.0,
        };
        assert!(location.validate().is_err());
    }
}
