//! Day/night switching state machine.
//!
//! The fixer keeps the solar times of the current day and two flags recording whether the
//! day and the night settings were already applied successfully for that day. Each tick
//! performs at most one step: refresh the solar times, switch to day, or switch to night.
//! A failing step leaves the state untouched so it is simply retried on the next tick.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::{
    camera::{CameraControl, CameraError, CameraMode},
    solar::{SolarSource, SolarSourceError, SolarTimes},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    RefreshSolarTimes,
    SwitchTo(CameraMode),
    Wait,
}

#[derive(Debug)]
pub enum TickOutcome {
    Refreshed,
    RefreshFailed(SolarSourceError),
    Switched(CameraMode),
    SwitchFailed(CameraMode, CameraError),
    Idle,
}

pub struct CameraFixer<S, C> {
    solar_source: S,
    camera: C,
    solar_times: Option<SolarTimes>,
    day_change_done: bool,
    night_change_done: bool,
}

impl<S, C> CameraFixer<S, C>
where
    S: SolarSource,
    C: CameraControl,
{
    pub fn new(solar_source: S, camera: C) -> Self {
        Self {
            solar_source,
            camera,
            solar_times: None,
            day_change_done: false,
            night_change_done: false,
        }
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn solar_times(&self) -> Option<&SolarTimes> {
        self.solar_times.as_ref()
    }

    pub fn day_change_done(&self) -> bool {
        self.day_change_done
    }

    pub fn night_change_done(&self) -> bool {
        self.night_change_done
    }

    pub fn next_action(&self, now: &DateTime<Tz>) -> PendingAction {
        let Some(times) = self.solar_times.as_ref().filter(|times| !times.is_outdated(now)) else {
            return PendingAction::RefreshSolarTimes;
        };

        if !self.day_change_done && times.is_day(now) {
            PendingAction::SwitchTo(CameraMode::Day)
        } else if !self.night_change_done && times.is_after_sunset(now) {
            PendingAction::SwitchTo(CameraMode::Night)
        } else {
            PendingAction::Wait
        }
    }

    pub async fn tick(&mut self, now: &DateTime<Tz>) -> TickOutcome {
        match self.next_action(now) {
            PendingAction::RefreshSolarTimes => self.refresh(now).await,
            PendingAction::SwitchTo(mode) => self.switch_to(mode).await,
            PendingAction::Wait => TickOutcome::Idle,
        }
    }

    async fn refresh(&mut self, now: &DateTime<Tz>) -> TickOutcome {
        // must be the same day `SolarTimes::is_outdated` compares against
        match self.solar_source.fetch(now.date_naive()).await {
            Ok(times) => {
                log::info!("Sunset/sunrise times fetched: {}", times);
                self.solar_times = Some(times);
                self.day_change_done = false;
                self.night_change_done = false;
                TickOutcome::Refreshed
            }
            Err(err) => {
                log::error!("{}", err);
                TickOutcome::RefreshFailed(err)
            }
        }
    }

    async fn switch_to(&mut self, mode: CameraMode) -> TickOutcome {
        match self.camera.apply(mode).await {
            Ok(()) => {
                match mode {
                    CameraMode::Day => self.day_change_done = true,
                    CameraMode::Night => self.night_change_done = true,
                }
                log::debug!("Camera switched to {} mode", mode);
                TickOutcome::Switched(mode)
            }
            Err(err) => {
                log::error!("{}", err);
                TickOutcome::SwitchFailed(mode, err)
            }
        }
    }
}
