use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use reqwest::{Client, Request};
use serde::Deserialize;

use super::{SolarSource, SolarSourceError, SolarTimes};

pub const DEFAULT_SUNRISE_API_URL: &str = "https://api.sunrise-sunset.org/json";

#[derive(Debug, Deserialize)]
struct SunriseSunsetResponse {
    // a bare string instead of an object when the status is not OK
    #[serde(default)]
    results: serde_json::Value,
    status: String,
}

#[derive(Debug, Deserialize)]
struct SunriseSunsetResults {
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
}

/// Client for the sunrise-sunset.org JSON API.
#[derive(Debug, Clone)]
pub struct SunriseApiClient {
    client: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
    timezone: Tz,
}

impl SunriseApiClient {
    pub fn new(
        base_url: impl Into<String>,
        latitude: f64,
        longitude: f64,
        timezone: Tz,
        timeout: Duration,
    ) -> Result<Self, SolarSourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            latitude,
            longitude,
            timezone,
        })
    }

    pub fn build_request(&self, date: NaiveDate) -> Result<Request, SolarSourceError> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", format!("{:.6}", self.latitude)),
                ("lng", format!("{:.6}", self.longitude)),
                ("date", date.format("%Y-%m-%d").to_string()),
                ("formatted", "0".to_string()),
            ])
            .build()?;
        Ok(request)
    }

    /// Turns a raw API body into solar times for `date`.
    pub fn parse_response(&self, date: NaiveDate, body: &str) -> Result<SolarTimes, SolarSourceError> {
        let response: SunriseSunsetResponse = serde_json::from_str(body)?;
        if response.status != "OK" {
            return Err(SolarSourceError::ApiStatus(response.status));
        }
        let results: SunriseSunsetResults = serde_json::from_value(response.results)?;

        Ok(SolarTimes {
            date,
            sunrise: results.sunrise.with_timezone(&self.timezone),
            sunset: results.sunset.with_timezone(&self.timezone),
            fetched_at: Utc::now().with_timezone(&self.timezone),
        })
    }
}

impl SolarSource for SunriseApiClient {
    async fn fetch(&self, date: NaiveDate) -> Result<SolarTimes, SolarSourceError> {
        let request = self.build_request(date)?;
        log::debug!("Requesting sunrise/sunset data: {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SolarSourceError::HttpStatus(status));
        }

        let body = response.text().await?;
        self.parse_response(date, &body)
    }
}
