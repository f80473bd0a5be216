use app::{deinitialize_app, initialize_app};
use app_env::{initialize_logging, initialize_panic_handler, LogConfig};
use color_eyre::eyre::Result;
use eventloop::run_event_loop;
use ipcam_daynight::settings::Settings;
mod app;
mod app_env;
mod eventloop;

async fn run_application() -> Result<()> {
    initialize_logging(&LogConfig::from_env())?;
    initialize_panic_handler()?;

    let settings = Settings::from_env()?;
    log::info!("Starting {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    log::debug!("Settings: {:#?}", settings);

    let (mut app_events, signal_handle, mut state) = initialize_app(&settings)?;

    run_event_loop(&mut app_events, &mut state).await?;

    deinitialize_app(signal_handle).await?;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = run_application().await {
        eprintln!("{} fatal error: {:?}", env!("CARGO_PKG_NAME"), e);
        Err(e)
    } else {
        Ok(())
    }
}
