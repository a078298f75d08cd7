//! Sky Reports
//!
//! Builds the astronomy response bodies from an [`AstronomyProvider`].
//! Everything here is synchronous; callers hand the result to the cache
//! through an immediately-ready future.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::astronomy::{AstronomyError, AstronomyProvider, Body};
use crate::models::{
    Location, MoonDetails, MoonIllumination, MoonSummary, PhaseMilestone, PlanetPosition,
    SkySummary, SunSummary,
};
use crate::shaper::{illumination_percent, iso_date, iso_utc, round_angle, LightPhase};

/// How far ahead moon-phase milestones are listed.
pub const MILESTONE_WINDOW_DAYS: i64 = 31;

/// Start of the UTC calendar day containing `now`.
fn start_of_utc_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Moon, sun and planet overview for the observer at `now`.
pub fn sky_summary(
    astronomy: &dyn AstronomyProvider,
    location: &Location,
    now: DateTime<Utc>,
) -> Result<SkySummary, AstronomyError> {
    let illumination = astronomy.moon_illumination(now)?;

    let day = start_of_utc_day(now);
    let events = astronomy.sun_events(day, day + Duration::days(1), location)?;
    let sun = astronomy.horizontal(Body::Sun, now, location)?;

    let mut planets = BTreeMap::new();
    for body in Body::PLANETS {
        let position = astronomy.horizontal(body, now, location)?;
        planets.insert(
            body.display_name().to_string(),
            PlanetPosition {
                altitude: round_angle(position.altitude),
                azimuth: round_angle(position.azimuth),
                is_visible: position.altitude > 0.0,
            },
        );
    }

    Ok(SkySummary {
        moon: MoonSummary {
            illumination: illumination_percent(illumination),
        },
        sun: SunSummary {
            sunrise: events.sunrise.map(iso_utc),
            sunset: events.sunset.map(iso_utc),
            current_altitude: round_angle(sun.altitude),
            phase: LightPhase::from_sun_altitude(sun.altitude)
                .label()
                .to_string(),
        },
        planets,
    })
}

/// Moon position plus the principal phases reached in the coming month.
pub fn moon_details(
    astronomy: &dyn AstronomyProvider,
    location: &Location,
    now: DateTime<Utc>,
) -> Result<MoonDetails, AstronomyError> {
    let illumination = astronomy.moon_illumination(now)?;
    let position = astronomy.horizontal(Body::Moon, now, location)?;

    let milestones = astronomy
        .moon_phases(now, now + Duration::days(MILESTONE_WINDOW_DAYS))?
        .into_iter()
        .map(|event| PhaseMilestone {
            phase: event.phase.label().to_string(),
            date: iso_date(event.at),
        })
        .collect();

    Ok(MoonDetails {
        illumination: illumination_percent(illumination),
        altitude: round_angle(position.altitude),
        azimuth: round_angle(position.azimuth),
        milestones,
    })
}

pub fn moon_illumination(
    astronomy: &dyn AstronomyProvider,
    now: DateTime<Utc>,
) -> Result<MoonIllumination, AstronomyError> {
    Ok(MoonIllumination {
        illumination: illumination_percent(astronomy.moon_illumination(now)?),
    })
}
