//! Astronomy Module
//!
//! Sun, moon and planet positions for an observer. Solar position and
//! sunrise/sunset come from `solar_positioning`; the Moon and planets from
//! the VSOP87/Meeus series in `astro`.
//!
//! Handlers only see the [`AstronomyProvider`] trait, so tests can swap in a
//! fake with call counters.

mod provider;
mod time;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::Location;

pub use provider::EphemerisProvider;

// == Astronomy Error Enum ==
#[derive(Error, Debug)]
pub enum AstronomyError {
    /// Observer coordinates outside the globe or not finite
    #[error("{0}")]
    InvalidLocation(String),

    /// The underlying library rejected the input or failed to converge
    #[error("ephemeris computation failed: {0}")]
    Computation(String),

    /// A computed instant fell outside the representable range
    #[error("time out of range: {0}")]
    TimeOutOfRange(String),
}

// == Body ==
/// Bodies the provider can place on the sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
}

impl Body {
    /// Planets reported by the sky summary, in display order.
    pub const PLANETS: [Body; 6] = [
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
    ];

    /// Name shown in API responses.
    pub fn display_name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Position relative to the local horizon, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    /// Above the horizon, -90..=90
    pub altitude: f64,
    /// Compass bearing from north through east, 0..360
    pub azimuth: f64,
}

/// First sunrise and sunset found in a search window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SunEvents {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

/// Principal lunar phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonPhase {
    NewMoon,
    FirstQuarter,
    FullMoon,
    LastQuarter,
}

impl MoonPhase {
    pub fn label(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::LastQuarter => "Last Quarter",
        }
    }
}

/// Instant at which a principal phase is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseEvent {
    pub phase: MoonPhase,
    pub at: DateTime<Utc>,
}

// == Astronomy Provider ==
/// Source of astronomical quantities. Treated as a pure function of
/// (time, location); implementations must be cheap enough to call inline.
pub trait AstronomyProvider: Send + Sync {
    /// Topocentric altitude/azimuth of `body`.
    fn horizontal(
        &self,
        body: Body,
        at: DateTime<Utc>,
        site: &Location,
    ) -> Result<Horizontal, AstronomyError>;

    /// Fraction of the lunar disk lit, 0.0..=1.0.
    fn moon_illumination(&self, at: DateTime<Utc>) -> Result<f64, AstronomyError>;

    /// First sunrise and first sunset within `[from, to)`.
    fn sun_events(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        site: &Location,
    ) -> Result<SunEvents, AstronomyError>;

    /// Principal moon phases reached within `[from, to)`, in time order.
    fn moon_phases(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PhaseEvent>, AstronomyError>;
}
