//! Countdown tick background task

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tracing::{error, info};

use crate::state::AppState;

/// Background task that drives all running timers, one tick per second.
///
/// Each firing enumerates the currently running timers and advances every one
/// of them by exactly one second. There is no wall-clock comparison: a
/// delayed firing makes countdowns run slow rather than catch up. Exactly one
/// of these tasks runs per process, spawned from `main` and cancelled with
/// the runtime at shutdown.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut interval = interval(Duration::from_secs(1));

    loop {
        interval.tick().await;

        let running = match state.running_timer_ids() {
            Ok(ids) => ids,
            Err(e) => {
                error!("Failed to read running timers: {}", e);
                continue;
            }
        };

        for id in running {
            if let Err(e) = state.tick_timer(&id) {
                error!("Failed to tick timer {}: {}", id, e);
            }
        }
    }
}
