//! Request and Response models for the sky API
//!
//! This module defines the DTOs used for query parsing and JSON responses.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{Location, LocationQuery};
pub use responses::{
    HealthResponse, MoonDetails, MoonIllumination, MoonSummary, PhaseMilestone, PlanetPosition,
    SkySummary, StatsResponse, SunSummary, WeatherReport,
};
