use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use sun::SunPhase;

use super::{SolarSource, SolarSourceError, SolarTimes};

/// Computes sunrise and sunset locally instead of asking a web service.
#[derive(Debug, Clone)]
pub struct CalculatedSolarSource {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    timezone: Tz,
}

impl CalculatedSolarSource {
    pub fn new(latitude: f64, longitude: f64, elevation: f64, timezone: Tz) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            timezone,
        }
    }

    pub fn calculate(&self, date: NaiveDate) -> Result<SolarTimes, SolarSourceError> {
        // evaluate at local noon so the solar cycle picked is the one of `date`
        let noon = self
            .timezone
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).ok_or(SolarSourceError::NoSunEvent(date))?)
            .earliest()
            .ok_or(SolarSourceError::NoSunEvent(date))?;

        let sunrise = self.time_at_phase(&noon, SunPhase::Sunrise, date)?;
        let sunset = self.time_at_phase(&noon, SunPhase::Sunset, date)?;
        if sunrise >= sunset {
            return Err(SolarSourceError::NoSunEvent(date));
        }

        Ok(SolarTimes {
            date,
            sunrise,
            sunset,
            fetched_at: Utc::now().with_timezone(&self.timezone),
        })
    }

    fn time_at_phase(
        &self,
        noon: &DateTime<Tz>,
        phase: SunPhase,
        date: NaiveDate,
    ) -> Result<DateTime<Tz>, SolarSourceError> {
        let event_ms = sun::time_at_phase(
            noon.timestamp_millis(),
            phase,
            self.latitude,
            self.longitude,
            self.elevation,
        );
        let event = Utc
            .timestamp_millis_opt(event_ms)
            .single()
            .ok_or(SolarSourceError::NoSunEvent(date))?
            .with_timezone(&self.timezone);

        // polar day or night yields a meaningless instant far from the requested day
        if (event - *noon).abs() > Duration::hours(24) {
            return Err(SolarSourceError::NoSunEvent(date));
        }
        Ok(event)
    }
}

impl SolarSource for CalculatedSolarSource {
    async fn fetch(&self, date: NaiveDate) -> Result<SolarTimes, SolarSourceError> {
        self.calculate(date)
    }
}
