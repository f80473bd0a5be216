use color_eyre::eyre::Result;
use ipcam_daynight::app_state::{AppEvent, AppState};

pub async fn handle_app_event(event: AppEvent, state: &mut AppState) -> Result<bool> {
    match event {
        AppEvent::Exit => {
            state.should_exit = true;
        }
    }
    Ok(state.should_exit)
}
