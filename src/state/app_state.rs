//! Main application state management

use std::{
    sync::Mutex,
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::storage::Storage;
use super::{NewTimer, Timer, TimerUpdate};

/// Application state owning the timer collection.
///
/// Every mutation goes through this struct, which serializes access with a
/// single lock and writes the whole collection through to storage before the
/// mutation is considered complete.
#[derive(Debug)]
pub struct AppState {
    /// The ordered timer collection; insertion order is display order.
    timers: Mutex<Vec<Timer>>,
    /// Durable record backing the collection.
    storage: Storage,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel publishing post-mutation snapshots to watchers
    timer_update_tx: watch::Sender<Vec<Timer>>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<Vec<Timer>>,
}

impl AppState {
    /// Create a new AppState with an empty timer collection.
    pub fn new(port: u16, host: String, storage: Storage) -> Self {
        let (timer_update_tx, timer_update_rx) = watch::channel(Vec::new());

        Self {
            timers: Mutex::new(Vec::new()),
            storage,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply a mutation to the collection and, if it changed anything,
    /// write the new collection through to storage and notify watchers.
    ///
    /// The mutator returns the affected timer, or `None` for a no-op
    /// (unknown id, tick on a stopped timer). No-ops skip persistence and
    /// notification entirely.
    fn mutate<F>(&self, action: &str, mutator: F) -> Result<Option<Timer>, String>
    where
        F: FnOnce(&mut Vec<Timer>) -> Option<Timer>,
    {
        let mut timers = self.timers.lock()
            .map_err(|e| format!("Failed to lock timer collection: {}", e))?;

        let changed = mutator(&mut *timers);
        if changed.is_none() {
            return Ok(None);
        }

        let snapshot = timers.clone();
        drop(timers); // Release the lock before touching storage

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        // Write-through: a failed write is logged and the in-memory state
        // stays authoritative for the rest of the session.
        if let Err(e) = self.storage.save(&snapshot) {
            warn!("Failed to persist timers after {}: {}", action, e);
        }

        // Notify timer watchers
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }

        Ok(changed)
    }

    /// Add a new timer to the end of the collection.
    ///
    /// The input has already been validated by the caller; construction
    /// cannot fail. Returns the created timer.
    pub fn add_timer(&self, input: NewTimer) -> Result<Timer, String> {
        let timer = Timer::new(input);
        let created = timer.clone();
        info!("Adding timer '{}' ({}s)", created.title, created.duration);

        self.mutate("add", move |timers| {
            let added = timer.clone();
            timers.push(timer);
            Some(added)
        })?;

        Ok(created)
    }

    /// Remove the timer with the given id. Unknown ids are a harmless no-op.
    pub fn delete_timer(&self, id: &str) -> Result<Option<Timer>, String> {
        self.mutate("delete", |timers| {
            let index = timers.iter().position(|t| t.id == id)?;
            let removed = timers.remove(index);
            info!("Deleted timer '{}'", removed.title);
            Some(removed)
        })
    }

    /// Flip the running state of the timer with the given id.
    ///
    /// A finished timer can be toggled back to running; the next tick stops
    /// it again at zero. Callers that want a fresh countdown restart first.
    pub fn toggle_timer(&self, id: &str) -> Result<Option<Timer>, String> {
        self.mutate("toggle", |timers| {
            let timer = timers.iter_mut().find(|t| t.id == id)?;
            timer.is_running = !timer.is_running;
            info!("Timer '{}' is now {}", timer.title,
                  if timer.is_running { "running" } else { "paused" });
            Some(timer.clone())
        })
    }

    /// Advance the timer with the given id by one elapsed second.
    ///
    /// Only running timers change; stopped or unknown timers are a no-op
    /// that triggers no storage write.
    pub fn tick_timer(&self, id: &str) -> Result<Option<Timer>, String> {
        self.mutate("tick", |timers| {
            let timer = timers.iter_mut().find(|t| t.id == id)?;
            if !timer.tick() {
                return None;
            }
            if timer.is_finished() {
                info!("Timer '{}' finished", timer.title);
            }
            Some(timer.clone())
        })
    }

    /// Reset the timer with the given id to its full duration, stopped.
    pub fn restart_timer(&self, id: &str) -> Result<Option<Timer>, String> {
        self.mutate("restart", |timers| {
            let timer = timers.iter_mut().find(|t| t.id == id)?;
            timer.restart();
            info!("Timer '{}' restarted", timer.title);
            Some(timer.clone())
        })
    }

    /// Apply a partial update to the timer with the given id.
    pub fn edit_timer(&self, id: &str, update: TimerUpdate) -> Result<Option<Timer>, String> {
        self.mutate("edit", move |timers| {
            let timer = timers.iter_mut().find(|t| t.id == id)?;
            timer.apply_update(update);
            info!("Timer '{}' edited", timer.title);
            Some(timer.clone())
        })
    }

    /// Replace the whole collection, used once at startup to rehydrate from
    /// storage. The durable copy is trusted as-is: no validation and no
    /// write-back until the next mutation.
    pub fn replace_all(&self, timers: Vec<Timer>) -> Result<(), String> {
        let mut current = self.timers.lock()
            .map_err(|e| format!("Failed to lock timer collection: {}", e))?;

        *current = timers;
        let snapshot = current.clone();
        drop(current);

        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }

        Ok(())
    }

    /// Get an ordered snapshot of the current collection.
    pub fn timers(&self) -> Result<Vec<Timer>, String> {
        self.timers.lock()
            .map(|timers| timers.clone())
            .map_err(|e| format!("Failed to lock timer collection: {}", e))
    }

    /// Ids of all currently running timers, in display order.
    pub fn running_timer_ids(&self) -> Result<Vec<String>, String> {
        self.timers.lock()
            .map(|timers| {
                timers.iter()
                    .filter(|t| t.is_running)
                    .map(|t| t.id.clone())
                    .collect()
            })
            .map_err(|e| format!("Failed to lock timer collection: {}", e))
    }

    /// Subscribe to post-mutation collection snapshots.
    pub fn subscribe_timers(&self) -> watch::Receiver<Vec<Timer>> {
        self.timer_update_tx.subscribe()
    }

    /// The storage handle backing this state.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
