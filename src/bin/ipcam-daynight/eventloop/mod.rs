use color_eyre::eyre::Result;
use ipcam_daynight::app_state::{AppEvent, AppState};
use tokio::{
    sync::mpsc::Receiver,
    time::{self, MissedTickBehavior},
};

mod app;
mod tick;

pub use app::handle_app_event;
pub use tick::handle_tick;

#[derive(Debug)]
pub enum Event {
    App(AppEvent),
    Tick,
}

pub async fn run_event_loop(app_events: &mut Receiver<AppEvent>, state: &mut AppState) -> Result<()> {
    let mut ticker = time::interval(state.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let event = tokio::select! {
            Some(app_event) = app_events.recv() => Event::App(app_event),
            _ = ticker.tick() => Event::Tick,
        };

        let exit = match event {
            Event::App(app_event) => handle_app_event(app_event, state).await?,
            Event::Tick => handle_tick(state).await?,
        };

        if exit {
            break;
        }
    }
    log::debug!("Exiting application event loop");
    Ok(())
}
