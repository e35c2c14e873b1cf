//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::Timer;

/// Creation payload supplied by the input-collection layer.
///
/// Duration arrives as clock fields; the handler derives total seconds after
/// validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimerRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hours: u64,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

/// Partial edit payload; absent fields leave the timer untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTimerRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<u64>,
}

/// API response structure for mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timers: Vec<Timer>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timers: Vec<Timer>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timers,
        }
    }

    /// Create a success response
    pub fn ok(message: String, timers: Vec<Timer>) -> Self {
        Self::new("ok".to_string(), message, timers)
    }

    /// Create an error response
    pub fn error(message: String, timers: Vec<Timer>) -> Self {
        Self::new("error".to_string(), message, timers)
    }
}

/// Read projection of the timer collection; same envelope shape as the
/// persisted record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerListResponse {
    pub timers: Vec<Timer>,
}

/// Enhanced status response with collection information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub total_timers: usize,
    pub running_timers: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub data_file: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "1.1.0".to_string(),
        }
    }
}
