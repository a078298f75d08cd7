//! Time scale conversions between chrono and the ephemeris libraries.

use chrono::{DateTime, Datelike, Timelike, Utc};
use solar_positioning::time::DeltaT;

use super::AstronomyError;

/// JD of 1970-01-01 00:00 UTC
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian day of a UTC instant.
pub fn julian_day(at: DateTime<Utc>) -> f64 {
    let seconds = at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) / 1e9;
    seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD
}

/// UTC instant of a Julian day.
pub fn from_julian_day(jd: f64) -> Result<DateTime<Utc>, AstronomyError> {
    let seconds = (jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY;
    if !seconds.is_finite() {
        return Err(AstronomyError::TimeOutOfRange(format!("JD {jd}")));
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
        .ok_or_else(|| AstronomyError::TimeOutOfRange(format!("JD {jd}")))
}

/// TT - UT in seconds for the month containing `at`.
pub fn delta_t_seconds(at: DateTime<Utc>) -> Result<f64, AstronomyError> {
    DeltaT::estimate_from_date(at.year(), at.month())
        .map_err(|e| AstronomyError::Computation(e.to_string()))
}

/// Julian Ephemeris Day (TT) of a UTC instant.
pub fn julian_ephemeris_day(at: DateTime<Utc>) -> Result<f64, AstronomyError> {
    Ok(julian_day(at) + delta_t_seconds(at)? / SECONDS_PER_DAY)
}

/// UTC instant of a Julian Ephemeris Day.
pub fn from_julian_ephemeris_day(jde: f64) -> Result<DateTime<Utc>, AstronomyError> {
    let approx = from_julian_day(jde)?;
    from_julian_day(jde - delta_t_seconds(approx)? / SECONDS_PER_DAY)
}

/// Calendar date in the form `astro` takes for event searches.
pub fn to_astro_date(at: DateTime<Utc>) -> Result<astro::time::Date, AstronomyError> {
    let year = i16::try_from(at.year())
        .map_err(|_| AstronomyError::TimeOutOfRange(format!("year {}", at.year())))?;
    let day = astro::time::DayOfMonth {
        day: at.day() as u8,
        hr: at.hour() as u8,
        min: at.minute() as u8,
        sec: f64::from(at.second()),
        time_zone: 0.0,
    };

    Ok(astro::time::Date {
        year,
        month: at.month() as u8,
        decimal_day: astro::time::decimal_day(&day),
        cal_type: astro::time::CalType::Gregorian,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_julian_day_epochs() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_day(j2000) - 2_451_545.0).abs() < 1e-9);
        assert_eq!(from_julian_day(2_451_545.0).unwrap(), j2000);
    }

    #[test]
    fn test_julian_day_agrees_with_astro() {
        let at = Utc.with_ymd_and_hms(1969, 7, 20, 20, 18, 4).unwrap();
        let ours = julian_day(at);
        let theirs = astro::time::julian_day(&to_astro_date(at).unwrap());
        assert!((ours - theirs).abs() < 1e-6, "{ours} vs {theirs}");
    }

    #[test]
    fn test_ephemeris_day_roundtrip() {
        let at = Utc.with_ymd_and_hms(2024, 1, 25, 17, 54, 0).unwrap();
        let jde = julian_ephemeris_day(at).unwrap();

        // ~69 s ahead of UT in 2024
        let ahead = (jde - julian_day(at)) * SECONDS_PER_DAY;
        assert!((60.0..80.0).contains(&ahead), "delta T {ahead}");

        let back = from_julian_ephemeris_day(jde).unwrap();
        assert!((back - at).num_milliseconds().abs() < 5);
    }

    #[test]
    fn test_non_finite_day_rejected() {
        assert!(matches!(
            from_julian_day(f64::NAN),
            Err(AstronomyError::TimeOutOfRange(_))
        ));
    }
}
