//! Kitchen Timer - A state-managed HTTP server for named countdown timers
//!
//! This is the main entry point for the kitchen-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use kitchen_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    storage::{Storage, StorageError},
    tasks::countdown_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("kitchen_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting kitchen-timer server v1.1.0");
    info!("Configuration: host={}, port={}, data_file={}",
          config.host, config.port, config.data_file().display());

    // Create application state backed by the persisted record
    let storage = Storage::new(config.data_file());
    let state = Arc::new(AppState::new(config.port, config.host.clone(), storage));

    // Rehydrate from the persisted record; any load failure means starting
    // with an empty collection rather than refusing to start.
    match state.storage().load() {
        Ok(timers) => {
            info!("Loaded {} timers from {}", timers.len(), state.storage().path().display());
            if let Err(e) = state.replace_all(timers) {
                warn!("Failed to restore saved timers: {}", e);
            }
        }
        Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No saved timers found, starting with an empty collection");
        }
        Err(e) => {
            warn!("Could not read saved timers ({}), starting with an empty collection", e);
        }
    }

    // Start the countdown tick background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers             - List all timers");
    info!("  POST   /timers             - Add a timer");
    info!("  PUT    /timers/:id         - Edit a timer");
    info!("  DELETE /timers/:id         - Delete a timer");
    info!("  POST   /timers/:id/toggle  - Start or pause a timer");
    info!("  POST   /timers/:id/restart - Reset a timer");
    info!("  GET    /status             - Check current status");
    info!("  GET    /health             - Health check");

    // Setup graceful shutdown
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
    }

    info!("Server shutdown complete");
    Ok(())
}
