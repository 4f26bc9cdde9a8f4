//! Dispatch module for turning hotkey presses into commands
//!
//! The dispatcher is stateless across events: each key-down is checked
//! against the live key-state table and produces at most one stdout line.

mod dispatcher;

pub use dispatcher::{EventProcessingError, HotkeyDispatcher};
