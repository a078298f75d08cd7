//! Library-backed astronomy provider.

use std::f64::consts::TAU;

use astro::{angle, coords, ecliptic, lunar, planet, sun};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use solar_positioning::{spa, Horizon, RefractionCorrection, SunriseResult};

use super::time::{
    delta_t_seconds, from_julian_ephemeris_day, julian_day, julian_ephemeris_day, to_astro_date,
};
use super::{
    AstronomyError, AstronomyProvider, Body, Horizontal, MoonPhase, PhaseEvent, SunEvents,
};
use crate::models::Location;

const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.14;

/// Standard atmosphere for the refraction correction.
const PRESSURE_HPA: f64 = 1013.25;
const TEMPERATURE_C: f64 = 15.0;

/// Geocentric ecliptic direction, radians.
#[derive(Debug, Clone, Copy)]
struct Direction {
    longitude: f64,
    latitude: f64,
}

/// Stateless adapter over `solar_positioning` and `astro`. Both carry their
/// series tables compiled in, so construction is free.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemerisProvider;

impl EphemerisProvider {
    pub fn new() -> Self {
        Self
    }

    fn check_site(site: &Location) -> Result<(), AstronomyError> {
        if !site.latitude.is_finite() || !(-90.0..=90.0).contains(&site.latitude) {
            return Err(AstronomyError::InvalidLocation(format!(
                "latitude {} out of range",
                site.latitude
            )));
        }
        if !site.longitude.is_finite() || !(-180.0..=180.0).contains(&site.longitude) {
            return Err(AstronomyError::InvalidLocation(format!(
                "longitude {} out of range",
                site.longitude
            )));
        }
        Ok(())
    }

    fn sun_horizontal(at: DateTime<Utc>, site: &Location) -> Result<Horizontal, AstronomyError> {
        let position = spa::solar_position(
            at,
            site.latitude,
            site.longitude,
            0.0,
            delta_t_seconds(at)?,
            Some(
                RefractionCorrection::new(PRESSURE_HPA, TEMPERATURE_C)
                    .map_err(|e| AstronomyError::Computation(e.to_string()))?,
            ),
        )
        .map_err(|e| AstronomyError::Computation(e.to_string()))?;

        Ok(Horizontal {
            altitude: position.elevation_angle(),
            azimuth: position.azimuth(),
        })
    }

    /// Planet direction as seen from the Earth's centre.
    fn planet_direction(body: planet::Planet, jde: f64) -> Direction {
        let (l, b, r) = planet::heliocent_coords(&body, jde);
        let (l0, b0, r0) = planet::heliocent_coords(&planet::Planet::Earth, jde);

        let x = r * b.cos() * l.cos() - r0 * b0.cos() * l0.cos();
        let y = r * b.cos() * l.sin() - r0 * b0.cos() * l0.sin();
        let z = r * b.sin() - r0 * b0.sin();

        Direction {
            longitude: y.atan2(x).rem_euclid(TAU),
            latitude: z.atan2(x.hypot(y)),
        }
    }

    /// Horizontal position of a geocentric ecliptic direction. Azimuth is
    /// turned from the south-based convention `astro` uses into a compass
    /// bearing.
    fn to_horizontal(
        direction: Direction,
        at: DateTime<Utc>,
        jde: f64,
        site: &Location,
    ) -> Horizontal {
        let obliquity = ecliptic::mn_oblq_IAU(jde);
        let ra = coords::asc_frm_ecl(direction.longitude, direction.latitude, obliquity);
        let dec = coords::dec_frm_ecl(direction.longitude, direction.latitude, obliquity);

        let hour_angle = astro::time::mn_sidr(julian_day(at)) + site.longitude.to_radians() - ra;
        let observer_lat = site.latitude.to_radians();

        Horizontal {
            altitude: coords::alt_frm_eq(hour_angle, dec, observer_lat).to_degrees(),
            azimuth: (coords::az_frm_eq(hour_angle, dec, observer_lat).to_degrees() + 180.0)
                .rem_euclid(360.0),
        }
    }

    /// Sunrise and sunset of one UTC calendar date, either missing on polar
    /// days and nights.
    fn sun_events_on(
        date: NaiveDate,
        site: &Location,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), AstronomyError> {
        let midnight = date.and_time(NaiveTime::MIN).and_utc();
        let result = spa::sunrise_sunset_utc_for_horizon(
            date.year(),
            date.month(),
            date.day(),
            site.latitude,
            site.longitude,
            delta_t_seconds(midnight)?,
            Horizon::SunriseSunset,
        )
        .map_err(|e| AstronomyError::Computation(e.to_string()))?;

        let at =
            |hours: f64| midnight + Duration::milliseconds((hours * 3_600_000.0).round() as i64);

        Ok(match result {
            SunriseResult::RegularDay {
                sunrise, sunset, ..
            } => (Some(at(sunrise.hours())), Some(at(sunset.hours()))),
            SunriseResult::AllDay { .. } | SunriseResult::AllNight { .. } => (None, None),
        })
    }
}

impl AstronomyProvider for EphemerisProvider {
    fn horizontal(
        &self,
        body: Body,
        at: DateTime<Utc>,
        site: &Location,
    ) -> Result<Horizontal, AstronomyError> {
        Self::check_site(site)?;
        let jde = julian_ephemeris_day(at)?;

        let planet = match body {
            Body::Sun => return Self::sun_horizontal(at, site),
            Body::Moon => {
                let (point, distance_km) = lunar::geocent_ecl_pos(jde);
                let direction = Direction {
                    longitude: point.long,
                    latitude: point.lat,
                };
                let geocentric = Self::to_horizontal(direction, at, jde, site);

                // Topocentric altitude: lower by the horizontal parallax
                let parallax = (EARTH_EQUATORIAL_RADIUS_KM / distance_km)
                    .asin()
                    .to_degrees();
                return Ok(Horizontal {
                    altitude: geocentric.altitude
                        - parallax * geocentric.altitude.to_radians().cos(),
                    azimuth: geocentric.azimuth,
                });
            }
            Body::Mercury => planet::Planet::Mercury,
            Body::Venus => planet::Planet::Venus,
            Body::Mars => planet::Planet::Mars,
            Body::Jupiter => planet::Planet::Jupiter,
            Body::Saturn => planet::Planet::Saturn,
            Body::Uranus => planet::Planet::Uranus,
        };

        let direction = Self::planet_direction(planet, jde);
        Ok(Self::to_horizontal(direction, at, jde, site))
    }

    fn moon_illumination(&self, at: DateTime<Utc>) -> Result<f64, AstronomyError> {
        let jde = julian_ephemeris_day(at)?;
        let (moon, _) = lunar::geocent_ecl_pos(jde);
        let (sun, _) = sun::geocent_ecl_pos(jde);

        // Phase angle is close enough to 180 - elongation at lunar distances
        let elongation = angle::anglr_sepr(moon.long, moon.lat, sun.long, sun.lat);
        Ok((1.0 - elongation.cos()) / 2.0)
    }

    fn sun_events(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        site: &Location,
    ) -> Result<SunEvents, AstronomyError> {
        Self::check_site(site)?;

        // Event times are reported against the UTC date, so far from Greenwich
        // they can belong to the neighbouring dates.
        let mut events = SunEvents::default();
        let mut date = (from - Duration::days(1)).date_naive();
        let last = (to + Duration::days(1)).date_naive();

        while date <= last {
            let (sunrise, sunset) = Self::sun_events_on(date, site)?;
            let in_window = |t: &DateTime<Utc>| *t >= from && *t < to;

            if let Some(t) = sunrise.filter(in_window) {
                events.sunrise = Some(events.sunrise.map_or(t, |s| s.min(t)));
            }
            if let Some(t) = sunset.filter(in_window) {
                events.sunset = Some(events.sunset.map_or(t, |s| s.min(t)));
            }
            date = date
                .succ_opt()
                .ok_or_else(|| AstronomyError::TimeOutOfRange(format!("date after {date}")))?;
        }

        Ok(events)
    }

    fn moon_phases(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PhaseEvent>, AstronomyError> {
        let phases = [
            (lunar::Phase::New, MoonPhase::NewMoon),
            (lunar::Phase::First, MoonPhase::FirstQuarter),
            (lunar::Phase::Full, MoonPhase::FullMoon),
            (lunar::Phase::Last, MoonPhase::LastQuarter),
        ];

        // Each lookup returns the phase nearest its reference date; weekly
        // references spanning the window catch every lunation.
        let mut events: Vec<PhaseEvent> = Vec::new();
        let mut reference = from - Duration::days(35);
        while reference < to + Duration::days(35) {
            let date = to_astro_date(reference)?;
            for (lookup, phase) in &phases {
                let at = from_julian_ephemeris_day(lunar::time_of_phase(&date, lookup))?;
                let seen = events
                    .iter()
                    .any(|e| e.phase == *phase && (e.at - at).num_hours().abs() < 24);
                if at >= from && at < to && !seen {
                    events.push(PhaseEvent { phase: *phase, at });
                }
            }
            reference += Duration::days(7);
        }

        events.sort_by_key(|e| e.at);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn greenwich() -> Location {
        Location {
            latitude: 51.4769,
            longitude: 0.0,
        }
    }

    #[test]
    fn test_greenwich_equinox_sunrise_sunset() {
        let day = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let events = EphemerisProvider::new()
            .sun_events(day, day + Duration::days(1), &greenwich())
            .unwrap();

        let sunrise = events.sunrise.unwrap();
        let sunset = events.sunset.unwrap();
        let rise_expected = Utc.with_ymd_and_hms(2024, 3, 20, 6, 2, 0).unwrap();
        let set_expected = Utc.with_ymd_and_hms(2024, 3, 20, 18, 14, 0).unwrap();

        assert!(
            (sunrise - rise_expected).num_minutes().abs() <= 3,
            "sunrise {sunrise}"
        );
        assert!(
            (sunset - set_expected).num_minutes().abs() <= 3,
            "sunset {sunset}"
        );
    }

    #[test]
    fn test_events_stay_inside_window_far_east() {
        // Sunrise in Auckland falls on the previous UTC date
        let site = Location {
            latitude: -36.85,
            longitude: 174.76,
        };
        let day = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let events = EphemerisProvider::new()
            .sun_events(day, day + Duration::days(1), &site)
            .unwrap();

        for t in [events.sunrise.unwrap(), events.sunset.unwrap()] {
            assert!(t >= day && t < day + Duration::days(1), "{t}");
        }
    }

    #[test]
    fn test_polar_night_has_no_sunrise() {
        let site = Location {
            latitude: 78.22,
            longitude: 15.65,
        };
        let day = Utc.with_ymd_and_hms(2024, 12, 21, 0, 0, 0).unwrap();
        let events = EphemerisProvider::new()
            .sun_events(day, day + Duration::days(1), &site)
            .unwrap();

        assert_eq!(events, SunEvents::default());
    }

    #[test]
    fn test_january_2024_phases() {
        let from = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let phases = EphemerisProvider::new()
            .moon_phases(from, from + Duration::days(31))
            .unwrap();

        let labels: Vec<&str> = phases.iter().map(|p| p.phase.label()).collect();
        assert_eq!(
            labels,
            vec!["New Moon", "First Quarter", "Full Moon", "Last Quarter"]
        );

        let new_moon = Utc.with_ymd_and_hms(2024, 1, 11, 11, 57, 0).unwrap();
        let full_moon = Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap();
        assert!((phases[0].at - new_moon).num_minutes().abs() <= 10);
        assert!((phases[2].at - full_moon).num_minutes().abs() <= 10);
    }

    #[test]
    fn test_illumination_extremes() {
        let p = EphemerisProvider::new();
        let full = Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap();
        let new = Utc.with_ymd_and_hms(2024, 1, 11, 11, 57, 0).unwrap();

        assert!(p.moon_illumination(full).unwrap() > 0.99);
        assert!(p.moon_illumination(new).unwrap() < 0.01);
    }

    #[test]
    fn test_sun_due_south_at_solstice_noon() {
        let at = Utc.with_ymd_and_hms(2024, 6, 21, 12, 2, 0).unwrap();
        let h = EphemerisProvider::new()
            .horizontal(Body::Sun, at, &greenwich())
            .unwrap();

        // 90 - 51.48 + 23.44, plus a little refraction
        assert!((h.altitude - 61.97).abs() < 0.2, "altitude {}", h.altitude);
        assert!((h.azimuth - 180.0).abs() < 2.0, "azimuth {}", h.azimuth);
    }

    #[test]
    fn test_inferior_planets_stay_near_sun() {
        let p = EphemerisProvider::new();
        let site = greenwich();
        let mut at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        for _ in 0..24 {
            let sun = p.horizontal(Body::Sun, at, &site).unwrap();
            for (body, max_elongation) in [(Body::Mercury, 29.0), (Body::Venus, 48.5)] {
                let planet = p.horizontal(body, at, &site).unwrap();
                let separation = angle::anglr_sepr(
                    planet.azimuth.to_radians(),
                    planet.altitude.to_radians(),
                    sun.azimuth.to_radians(),
                    sun.altitude.to_radians(),
                )
                .to_degrees();
                // Refraction on the sun only shifts it by under a degree
                assert!(separation < max_elongation + 1.0, "{body} {separation}");
            }
            at += Duration::days(30);
        }
    }

    #[test]
    fn test_invalid_site_rejected() {
        let site = Location {
            latitude: 120.0,
            longitude: 0.0,
        };
        let err = EphemerisProvider::new()
            .horizontal(Body::Moon, Utc::now(), &site)
            .unwrap_err();
        assert!(matches!(err, AstronomyError::InvalidLocation(_)));
    }

    #[test]
    fn test_planet_positions_are_on_the_sphere() {
        let p = EphemerisProvider::new();
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 3, 0, 0).unwrap();
        for body in Body::PLANETS {
            let h = p.horizontal(body, now, &greenwich()).unwrap();
            assert!((-90.0..=90.0).contains(&h.altitude));
            assert!((0.0..360.0).contains(&h.azimuth));
        }
    }
}
