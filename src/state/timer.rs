//! Timer entity and its in-place state transitions

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single named countdown timer.
///
/// Field names serialize in camelCase because that is the shape of the
/// persisted record this server reads and writes (see `storage`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Total countdown length in whole seconds, always > 0.
    pub duration: u64,
    /// Seconds left; kept within 0..=duration.
    pub remaining_time: u64,
    pub is_running: bool,
    /// Creation time as epoch milliseconds, used only for ordering/display.
    pub created_at: i64,
}

/// Creation payload for a timer, already validated by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTimer {
    pub title: String,
    pub description: Option<String>,
    pub duration: u64,
}

/// Partial update applied by the edit operation. Absent fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimerUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u64>,
}

impl Timer {
    /// Create a fresh timer: full remaining time, not running, new unique id.
    pub fn new(input: NewTimer) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            duration: input.duration,
            remaining_time: input.duration,
            is_running: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Advance a running timer by one elapsed second.
    ///
    /// The decrement and the stop-at-zero transition happen together, so the
    /// timer is never observed running with zero seconds left after a tick.
    /// Returns true if the timer state changed.
    pub fn tick(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.remaining_time = self.remaining_time.saturating_sub(1);
        self.is_running = self.remaining_time > 0;
        true
    }

    /// Reset to the full duration and stop. Identity fields are untouched.
    pub fn restart(&mut self) {
        self.remaining_time = self.duration;
        self.is_running = false;
    }

    /// Apply a partial update. Editing always stops the countdown; a new
    /// duration resets the remaining time, while a title/description-only
    /// edit keeps the elapsed progress.
    pub fn apply_update(&mut self, update: TimerUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
            self.remaining_time = duration;
        }
        self.is_running = false;
    }

    /// Check whether the countdown has run out.
    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }
}
