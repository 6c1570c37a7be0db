use color_eyre::{eyre::eyre, Result};
use std::str::FromStr;
use teleop::config::TeleopConfig;
use teleop::input::{gamepad, window};
use teleop::{ControlSnapshot, Session, SessionEnd};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config_path = TeleopConfig::default_path();
    info!("Loading config from {}", config_path.display());
    let config = TeleopConfig::load_or_create(&config_path).await?;

    // Bindings and control points are cross-checked before anything starts
    let session = Session::new(config.translator()?, config.control_points()?)?;

    let shutdown = CancellationToken::new();
    let (event_tx, event_rx) = mpsc::channel(config.session.event_buffer.max(1));
    let (snapshot_tx, snapshot_rx) = watch::channel(ControlSnapshot::default());

    let gamepad_handle = if config.gamepad.enabled {
        match gamepad::spawn(config.gamepad.clone(), event_tx.clone(), shutdown.clone()) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Continuing without gamepad input: {}", e);
                None
            }
        }
    } else {
        info!("Gamepad input disabled");
        None
    };

    let session_handle = tokio::spawn(session.run(
        event_rx,
        snapshot_tx,
        shutdown.clone(),
        config.session.cycle_interval(),
    ));

    info!("Opening input window");
    let window_result = window::run(
        config.bindings.viewport,
        event_tx,
        snapshot_rx,
        shutdown.clone(),
    );
    shutdown.cancel();

    match session_handle.await {
        Ok(Ok(SessionEnd::Quit)) => info!("Session ended by quit"),
        Ok(Ok(SessionEnd::Cancelled)) => info!("Session ended with the window"),
        Ok(Err(e)) => warn!("Session ended: {}", e),
        Err(e) => error!("Session task panicked: {}", e),
    }

    if let Some(handle) = gamepad_handle {
        if let Err(e) = handle.await {
            error!("Gamepad task panicked: {}", e);
        }
    }

    window_result.map_err(|e| eyre!("Input window failed: {}", e))
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| Level::from_str(value.trim()).ok())
        .unwrap_or(Level::INFO);

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
