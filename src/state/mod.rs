//! State management module
//!
//! This module contains the timer entity, the input validation predicates,
//! and the application state that owns the timer collection.

pub mod timer;
pub mod app_state;
pub mod validation;

// Re-export main types
pub use timer::{NewTimer, Timer, TimerUpdate};
pub use app_state::AppState;
