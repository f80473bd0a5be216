use color_eyre::eyre::Result;
use ipcam_daynight::{
    app_state::{AppEvent, AppState},
    camera::CameraClient,
    fixer::CameraFixer,
    settings::Settings,
};
use tokio::{
    sync::mpsc::{self, Receiver, Sender},
    task::JoinHandle,
};

const APP_EVENT_CHANNEL_CAPACITY: usize = 16;

pub fn initialize_app(settings: &Settings) -> Result<(Receiver<AppEvent>, JoinHandle<()>, AppState)> {
    let (app_event_sender, app_event_receiver) = mpsc::channel::<AppEvent>(APP_EVENT_CHANNEL_CAPACITY);

    // Setup solar times source
    // =====================================================
    let solar_provider = settings.app.solar_provider()?;
    log::debug!("Using solar source: {:?}", settings.app.solar_source);

    // Setup camera client
    // =====================================================
    let camera = CameraClient::new(
        &settings.camera.address,
        &settings.camera.apply_path,
        &settings.camera.username,
        &settings.camera.password,
        settings.app.http_timeout,
    )?
    .with_profiles(settings.camera.day_profile.clone(), settings.camera.night_profile.clone());
    log::debug!("Camera: {:?}", camera);

    let signal_handle = spawn_exit_signal_handler(app_event_sender.clone());

    Ok((
        app_event_receiver,
        signal_handle,
        AppState {
            fixer: CameraFixer::new(solar_provider, camera),
            timezone: settings.app.timezone,
            tick_interval: settings.app.tick_interval,
            app_event_sender,
            should_exit: false,
        },
    ))
}

pub async fn deinitialize_app(signal_handle: JoinHandle<()>) -> Result<()> {
    signal_handle.abort();
    log::debug!("Deinitialized app...");
    Ok(())
}

/// Sends [`AppEvent::Exit`] on Ctrl-C or, on unix, SIGTERM.
fn spawn_exit_signal_handler(sender: Sender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = wait_for_exit_signal().await {
            log::error!("Fatal Error: Cannot listen for exit signals: {:#?}", err);
            return;
        }
        log::info!("Exit signal received, shutting down...");
        if let Err(err) = sender.send(AppEvent::Exit).await {
            log::error!("Error during application shutdown: {}", err);
        }
    })
}

#[cfg(unix)]
async fn wait_for_exit_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_exit_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
