use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::mpsc::Sender;

use crate::{camera::CameraClient, fixer::CameraFixer, solar::SolarProvider};

pub type Fixer = CameraFixer<SolarProvider, CameraClient>;

#[derive(Debug)]
pub enum AppEvent {
    Exit,
}

pub struct AppState {
    pub fixer: Fixer,
    pub timezone: Tz,
    pub tick_interval: Duration,
    // keeps the app event channel open for the lifetime of the event loop
    pub app_event_sender: Sender<AppEvent>,
    pub should_exit: bool,
}

impl AppState {
    /// Current instant in the configured time zone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.timezone)
    }
}
