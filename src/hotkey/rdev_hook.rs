//! Keyboard hook using rdev (Linux X11, Windows)
//!
//! `rdev::listen` blocks the listener thread for the rest of the process
//! and cannot be interrupted; after `stop()` its events are dropped.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rdev::{Event, EventType, Key};
use tracing::info;

use super::keys::{names, KeyEvent};
use super::listener::{EventCallback, EventSource, HotkeyError};

/// Map an rdev key to its semantic key name
fn key_name(key: Key) -> String {
    match key {
        Key::ControlLeft => names::CTRL_LEFT.to_string(),
        Key::ControlRight => names::CTRL_RIGHT.to_string(),
        Key::KeyE => names::E.to_string(),
        Key::LeftArrow => names::LEFT.to_string(),
        Key::RightArrow => names::RIGHT.to_string(),
        Key::UpArrow => names::UP.to_string(),
        Key::DownArrow => names::DOWN.to_string(),
        other => format!("{:?}", other).to_lowercase(),
    }
}

/// Translate an rdev event into a key event; mouse and wheel events are skipped
fn translate(event: &Event) -> Option<KeyEvent> {
    match event.event_type {
        EventType::KeyPress(key) => Some(KeyEvent::down(key_name(key))),
        EventType::KeyRelease(key) => Some(KeyEvent::up(key_name(key))),
        _ => None,
    }
}

/// Event source backed by the rdev global listener
#[derive(Debug, Default)]
pub struct RdevSource;

impl RdevSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for RdevSource {
    fn name(&self) -> &'static str {
        "rdev"
    }

    fn run(
        self: Box<Self>,
        _running: Arc<AtomicBool>,
        mut on_event: EventCallback,
    ) -> Result<(), HotkeyError> {
        info!("registering rdev keyboard hook");

        rdev::listen(move |event| {
            if let Some(key_event) = translate(&event) {
                on_event(key_event);
            }
        })
        .map_err(|e| HotkeyError::Listen(format!("{:?}", e)))
    }
}
