//! Stand Reminder - a desktop reminder to stand up
//!
//! This is the main entry point for the stand-reminder application.

use std::sync::Arc;

use tokio::{net::TcpListener, sync::mpsc};
use tracing::{info, warn};

use stand_reminder::{
    api::create_router,
    bridge::Tray,
    config::Config,
    controller::{ReminderController, UpdateCoordinator},
    services::{DesktopNotifier, FeedUpdateService},
    state::{AppState, ReminderConfig},
    tasks::{notification_click_task, tray_sync_task, ui_projection_task, Dispatcher},
    utils::{shutdown_signal, Lifecycle},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "stand_reminder={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting stand-reminder v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, interval={}min, dev={}",
        config.host, config.port, config.interval, config.dev
    );

    let lifecycle = Lifecycle::default();

    // A missing icon only costs us the tray.
    let tray = match Tray::load(&config.tray_icon) {
        Ok(tray) => Some(tray),
        Err(e) => {
            warn!("{}, continuing without a tray icon", e);
            None
        }
    };

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (service_tx, service_rx) = mpsc::unbounded_channel();
    let (click_tx, click_rx) = mpsc::unbounded_channel();

    let update_service = FeedUpdateService::new(
        config.update_feed.clone(),
        service_tx,
        lifecycle.clone(),
    );
    let reminder = ReminderController::new(
        ReminderConfig::from_minutes(config.interval),
        Arc::new(DesktopNotifier::new().with_click_events(click_tx)),
    );
    let updates = UpdateCoordinator::new(Arc::new(update_service));

    let (dispatcher, links) =
        Dispatcher::new(reminder, updates, command_rx, service_rx, lifecycle.clone());
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        command_tx,
        links,
        tray,
        lifecycle.clone(),
    ));

    // UI-side followers subscribe before the dispatch loop publishes anything.
    tokio::spawn(ui_projection_task(
        Arc::clone(&state.bridge),
        state.events.subscribe(),
    ));
    if let Some(tray) = &state.tray {
        tokio::spawn(tray_sync_task(Arc::clone(tray), state.reminder_rx.clone()));
    }
    tokio::spawn(notification_click_task(state.events.clone(), click_rx));

    let dispatcher_handle = tokio::spawn(
        dispatcher
            .with_auto_check(config.auto_check_updates())
            .run(),
    );

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control API running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /interval          - Set reminder interval (1-180 minutes)");
    info!("  POST /notify            - Show a reminder now");
    info!("  POST /pause, /resume    - Pause or resume reminders");
    info!("  POST /updates/check     - Check for updates");
    info!("  GET  /status            - Current state");
    info!("  GET  /events            - Event stream");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        _ = lifecycle.quit_requested() => {
            info!("Quit requested");
        }
    }

    // Stop the dispatch loop so the reminder timer is torn down.
    lifecycle.request_quit();
    if let Err(e) = dispatcher_handle.await {
        warn!("Dispatch loop ended abnormally: {}", e);
    }

    info!("Shutdown complete");
    Ok(())
}
