use color_eyre::eyre::Result;
use ipcam_daynight::{app_state::AppState, fixer::TickOutcome};

pub async fn handle_tick(state: &mut AppState) -> Result<bool> {
    let now = state.now();
    match state.fixer.tick(&now).await {
        TickOutcome::Refreshed => log::debug!("Next action: {:?}", state.fixer.next_action(&now)),
        TickOutcome::Switched(mode) => log::info!("Camera is now in {} mode", mode),
        TickOutcome::RefreshFailed(_) | TickOutcome::SwitchFailed(..) => {
            log::debug!("Will try again in {:?}", state.tick_interval)
        }
        TickOutcome::Idle => {}
    }
    Ok(state.should_exit)
}
