use chrono_tz::Tz;
use once_cell::sync::Lazy;
use std::{env, fmt, str::FromStr, time::Duration};
use thiserror::Error;

use crate::{
    camera::{CameraProfile, DEFAULT_APPLY_PATH},
    solar::{CalculatedSolarSource, SolarProvider, SolarSourceError, SunriseApiClient, DEFAULT_SUNRISE_API_URL},
};

pub static ENV_PREFIX: Lazy<String> = Lazy::new(|| "IPCAM".to_string());

pub fn env_name(name: &str) -> String {
    format!("{}_{}", *ENV_PREFIX, name)
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{0} env variable is not set")]
    Missing(String),
    #[error("{name} env variable is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

#[derive(Debug)]
pub struct Settings {
    pub camera: CameraSettings,
    pub app: AppSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            camera: CameraSettings::from_env()?,
            app: AppSettings::from_env()?,
        })
    }
}

pub struct CameraSettings {
    pub address: String,
    pub username: String,
    pub password: String,
    pub apply_path: String,
    pub day_profile: CameraProfile,
    pub night_profile: CameraProfile,
}

impl fmt::Debug for CameraSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraSettings")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("apply_path", &self.apply_path)
            .field("day_profile", &self.day_profile)
            .field("night_profile", &self.night_profile)
            .finish()
    }
}

impl CameraSettings {
    fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            address: required_setting("CAMERA_ADDRESS")?,
            username: string_setting("CAMERA_USERNAME", String::default()),
            password: string_setting("CAMERA_PASSWORD", String::default()),
            apply_path: string_setting("CAMERA_APPLY_PATH", DEFAULT_APPLY_PATH),
            day_profile: generic_setting("DAY_PROFILE", CameraProfile::day())?,
            night_profile: generic_setting("NIGHT_PROFILE", CameraProfile::night())?,
        })
    }
}

#[derive(Debug)]
pub struct AppSettings {
    pub location: LocationConfig,
    pub timezone: Tz,
    pub solar_source: SolarSourceKind,
    pub sunrise_api_url: String,
    pub http_timeout: Duration,
    pub tick_interval: Duration,
}

impl AppSettings {
    fn from_env() -> Result<Self, SettingsError> {
        let tick_interval = Duration::from_millis(parsed_setting("TICK_INTERVAL", 1000u64)?);
        if tick_interval.is_zero() {
            return Err(SettingsError::Invalid {
                name: env_name("TICK_INTERVAL"),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            location: required_setting("LOCATION")?,
            timezone: parsed_setting("TIMEZONE", Tz::UTC)?,
            solar_source: parsed_setting("SOLAR_SOURCE", SolarSourceKind::Api)?,
            sunrise_api_url: string_setting("SUNRISE_API_URL", DEFAULT_SUNRISE_API_URL),
            http_timeout: Duration::from_secs(parsed_setting("HTTP_TIMEOUT", 10u64)?),
            tick_interval,
        })
    }

    /// Builds the configured source of solar times.
    pub fn solar_provider(&self) -> Result<SolarProvider, SolarSourceError> {
        let provider = match self.solar_source {
            SolarSourceKind::Api => SolarProvider::Api(SunriseApiClient::new(
                self.sunrise_api_url.clone(),
                self.location.latitude,
                self.location.longitude,
                self.timezone,
                self.http_timeout,
            )?),
            SolarSourceKind::Calculated => SolarProvider::Calculated(CalculatedSolarSource::new(
                self.location.latitude,
                self.location.longitude,
                self.location.elevation,
                self.timezone,
            )),
        };
        Ok(provider)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarSourceKind {
    Api,
    Calculated,
}

impl FromStr for SolarSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "api" => Ok(SolarSourceKind::Api),
            "calculated" => Ok(SolarSourceKind::Calculated),
            _ => Err("Unknown solar source. Use 'api' or 'calculated'".to_string()),
        }
    }
}

/// - `latitude`: Latitude of the camera.
/// - `longitude`: Longitude of the camera.
/// - `elevation`: Observer height in meters above sea level, only used for calculated times.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl TryFrom<String> for LocationConfig {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        const FORMAT: &str = "Invalid format. Use '<latitude>,<longitude>[,<elevation>]'";

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(FORMAT.to_string());
        }
        let number = |part: &str| part.parse::<f64>().map_err(|e| format!("{}: {}", FORMAT, e));

        let latitude = number(parts[0])?;
        let longitude = number(parts[1])?;
        let elevation = parts.get(2).map(|p| number(*p)).transpose()?.unwrap_or(0f64);

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err("Latitude must be within [-90, 90] and longitude within [-180, 180]".to_string());
        }
        Ok(LocationConfig {
            latitude,
            longitude,
            elevation,
        })
    }
}

fn string_setting(name: &str, default: impl Into<String>) -> String {
    env::var(env_name(name)).ok().unwrap_or(default.into())
}

fn required_setting<T>(name: &str) -> Result<T, SettingsError>
where
    T: TryFrom<String>,
    T::Error: fmt::Display,
{
    let value = env::var(env_name(name))
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SettingsError::Missing(env_name(name)))?;
    value.try_into().map_err(|e: T::Error| SettingsError::Invalid {
        name: env_name(name),
        reason: e.to_string(),
    })
}

fn parsed_setting<T>(name: &str, default: T) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    env::var(env_name(name))
        .ok()
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| SettingsError::Invalid {
                name: env_name(name),
                reason: e.to_string(),
            })
        })
        .unwrap_or(Ok(default))
}

fn generic_setting<T>(name: &str, default: T) -> Result<T, SettingsError>
where
    T: TryFrom<String>,
    T::Error: fmt::Display,
{
    env::var(env_name(name))
        .ok()
        .map(|value| {
            value.try_into().map_err(|e: T::Error| SettingsError::Invalid {
                name: env_name(name),
                reason: e.to_string(),
            })
        })
        .unwrap_or(Ok(default))
}
