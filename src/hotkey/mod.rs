//! Hotkey module for global keyboard event listening
//!
//! - macOS: CGEventTap session tap
//! - Linux/Windows: rdev global listener
//! - Scripted: replays a fixed event list in place of the OS hook

mod keys;
mod listener;
mod scripted;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(target_os = "macos"))]
mod rdev_hook;

pub use keys::{names, KeyEvent, KeyEventType, KeyStateError, KeyStateQuery, ModifierState, PressedKeys};
pub use listener::{EventCallback, EventSource, HotkeyError, HotkeyListener, ListenerExit};
pub use scripted::ScriptedSource;

#[cfg(target_os = "macos")]
pub use macos::EventTapSource;
#[cfg(not(target_os = "macos"))]
pub use rdev_hook::RdevSource;

/// The OS keyboard hook for the current platform
#[cfg(target_os = "macos")]
pub fn system_source() -> EventTapSource {
    EventTapSource::new()
}

/// The OS keyboard hook for the current platform
#[cfg(not(target_os = "macos"))]
pub fn system_source() -> RdevSource {
    RdevSource::new()
}
