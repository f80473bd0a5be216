use std::{fmt, str::FromStr, time::Duration};

use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    Client, Request, StatusCode,
};
use thiserror::Error;

pub const DEFAULT_APPLY_PATH: &str = "/form/nvctlApply";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("could not change camera settings: {0}")]
    Request(#[from] reqwest::Error),
    #[error("camera rejected the settings change with status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Day,
    Night,
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraMode::Day => write!(f, "day"),
            CameraMode::Night => write!(f, "night"),
        }
    }
}

/// The form parameters posted to the camera for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraProfile(Vec<(String, String)>);

impl CameraProfile {
    pub fn day() -> Self {
        Self::all("off")
    }

    pub fn night() -> Self {
        Self::all("on")
    }

    fn all(value: &str) -> Self {
        Self(
            ["BWMODE", "IRCUT", "IRLED", "MLMODE"]
                .iter()
                .map(|key| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.0
    }
}

impl FromStr for CameraProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let params = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
                _ => Err(format!("Invalid camera parameter [{}]. Use 'KEY=value[,KEY=value...]'", part)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if params.is_empty() {
            return Err("Camera profile must contain at least one 'KEY=value' parameter".to_string());
        }
        Ok(Self(params))
    }
}

impl TryFrom<String> for CameraProfile {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Something that can switch the camera between its day and night settings.
#[allow(async_fn_in_trait)]
pub trait CameraControl {
    async fn apply(&self, mode: CameraMode) -> Result<(), CameraError>;
}

#[derive(Clone)]
pub struct CameraClient {
    client: Client,
    url: String,
    username: String,
    password: String,
    day: CameraProfile,
    night: CameraProfile,
}

impl fmt::Debug for CameraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraClient")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("day", &self.day)
            .field("night", &self.night)
            .finish_non_exhaustive()
    }
}

impl CameraClient {
    pub fn new(
        address: &str,
        apply_path: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CameraError> {
        // the camera lives on the local network, never route it through a system proxy
        let client = Client::builder().timeout(timeout).no_proxy().build()?;
        Ok(Self {
            client,
            url: format!("http://{}{}", address, apply_path),
            username: username.into(),
            password: password.into(),
            day: CameraProfile::day(),
            night: CameraProfile::night(),
        })
    }

    pub fn with_profiles(mut self, day: CameraProfile, night: CameraProfile) -> Self {
        self.day = day;
        self.night = night;
        self
    }

    pub fn profile(&self, mode: CameraMode) -> &CameraProfile {
        match mode {
            CameraMode::Day => &self.day,
            CameraMode::Night => &self.night,
        }
    }

    pub fn build_request(&self, mode: CameraMode) -> Result<Request, CameraError> {
        let mut builder = self.client.post(&self.url).form(self.profile(mode).params());
        if !self.username.is_empty() {
            builder = builder.basic_auth(&self.username, Some(&self.password));
        }
        let mut request = builder.build()?;
        request
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        Ok(request)
    }
}

impl CameraControl for CameraClient {
    async fn apply(&self, mode: CameraMode) -> Result<(), CameraError> {
        log::info!("Changing camera settings for {}..", mode);
        let request = self.build_request(mode)?;

        let response = self.client.execute(request).await?;
        let status = response.status();
        log::info!("Camera response status: {}", status);

        if !status.is_success() {
            return Err(CameraError::Status(status));
        }
        Ok(())
    }
}
