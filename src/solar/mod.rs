use std::fmt;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use thiserror::Error;

mod api;
mod calculated;

pub use api::{SunriseApiClient, DEFAULT_SUNRISE_API_URL};
pub use calculated::CalculatedSolarSource;

#[derive(Debug, Error)]
pub enum SolarSourceError {
    #[error("could not get sunrise/sunset data: {0}")]
    Request(#[from] reqwest::Error),
    #[error("sunrise/sunset API answered with http status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("sunrise/sunset API response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("sunrise/sunset API status is not OK: {0}")]
    ApiStatus(String),
    #[error("sun does not rise or set at the configured location on {0}")]
    NoSunEvent(NaiveDate),
}

/// Sunrise and sunset for one calendar day at the camera location.
///
/// All instants are kept in the configured time zone so that comparisons against the
/// current time and the calendar date used for staleness agree with each other.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarTimes {
    pub date: NaiveDate,
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    pub fetched_at: DateTime<Tz>,
}

impl SolarTimes {
    /// The cached times belong to another calendar day than `now`.
    ///
    /// The day is the calendar date of `now` in its own time zone, the same date the
    /// fixer asks its source for.
    pub fn is_outdated(&self, now: &DateTime<Tz>) -> bool {
        self.date != now.date_naive()
    }

    pub fn is_day(&self, now: &DateTime<Tz>) -> bool {
        *now > self.sunrise && *now < self.sunset
    }

    pub fn is_after_sunset(&self, now: &DateTime<Tz>) -> bool {
        *now > self.sunset
    }
}

impl fmt::Display for SolarTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Date: {}], [LastFetch: {}], [Sunrise: {}], [Sunset: {}]",
            self.date, self.fetched_at, self.sunrise, self.sunset
        )
    }
}

/// Anything that can tell the sunrise and sunset for a given day.
#[allow(async_fn_in_trait)]
pub trait SolarSource {
    async fn fetch(&self, date: NaiveDate) -> Result<SolarTimes, SolarSourceError>;
}

/// The configured source of solar times.
#[derive(Debug, Clone)]
pub enum SolarProvider {
    Api(SunriseApiClient),
    Calculated(CalculatedSolarSource),
}

impl SolarSource for SolarProvider {
    async fn fetch(&self, date: NaiveDate) -> Result<SolarTimes, SolarSourceError> {
        match self {
            SolarProvider::Api(client) => client.fetch(date).await,
            SolarProvider::Calculated(source) => source.fetch(date).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use chrono_tz::{Europe::Amsterdam, UTC};

    fn times_fetched_at(fetched_at: DateTime<Tz>) -> SolarTimes {
        let date = fetched_at.date_naive();
        let tz = fetched_at.timezone();
        SolarTimes {
            date,
            sunrise: tz.from_local_datetime(&date.and_hms_opt(8, 0, 0).unwrap()).unwrap(),
            sunset: tz.from_local_datetime(&date.and_hms_opt(17, 0, 0).unwrap()).unwrap(),
            fetched_at,
        }
    }

    #[test]
    fn same_time_is_not_outdated() {
        let reference = UTC.with_ymd_and_hms(2020, 12, 22, 0, 1, 41).unwrap();
        assert!(!times_fetched_at(reference).is_outdated(&reference));
    }

    #[test]
    fn same_date_later_in_the_day_is_not_outdated() {
        let reference = UTC.with_ymd_and_hms(2020, 12, 22, 0, 1, 41).unwrap();
        let later = reference + Duration::hours(10);
        assert!(!times_fetched_at(reference).is_outdated(&later));
    }

    #[test]
    fn fetch_from_previous_date_is_outdated() {
        let reference = UTC.with_ymd_and_hms(2020, 12, 22, 0, 1, 41).unwrap();
        let yesterday = reference - Duration::days(1);
        assert!(times_fetched_at(yesterday).is_outdated(&reference));
    }

    #[test]
    fn day_boundary_is_the_calendar_date_of_now() {
        let fetched = Amsterdam.with_ymd_and_hms(2020, 12, 22, 12, 0, 0).unwrap();
        let times = times_fetched_at(fetched);

        let late_utc = UTC.with_ymd_and_hms(2020, 12, 22, 23, 30, 0).unwrap();
        assert!(!times.is_outdated(&late_utc));

        let after_midnight = Amsterdam.with_ymd_and_hms(2020, 12, 23, 0, 30, 0).unwrap();
        assert!(times.is_outdated(&after_midnight));
    }

    #[test]
    fn day_window_is_strict() {
        let times = times_fetched_at(UTC.with_ymd_and_hms(2020, 12, 22, 0, 0, 0).unwrap());

        assert!(!times.is_day(&times.sunrise));
        assert!(times.is_day(&(times.sunrise + Duration::seconds(1))));
        assert!(!times.is_day(&times.sunset));
        assert!(!times.is_after_sunset(&times.sunset));
        assert!(times.is_after_sunset(&(times.sunset + Duration::seconds(1))));
    }

    #[test]
    fn display_lists_all_fields() {
        let times = times_fetched_at(UTC.with_ymd_and_hms(2020, 12, 22, 0, 1, 41).unwrap());
        let text = times.to_string();
        assert!(text.starts_with("[Date: 2020-12-22], [LastFetch: 2020-12-22 00:01:41"));
        assert!(text.contains("[Sunrise: 2020-12-22 08:00:00"));
        assert!(text.contains("[Sunset: 2020-12-22 17:00:00"));
    }
}
