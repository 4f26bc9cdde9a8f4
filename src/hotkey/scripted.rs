//! Scripted event source
//!
//! Replays a fixed sequence of key events instead of hooking the keyboard.
//! Used to drive the listener and dispatcher without an OS hook.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::keys::KeyEvent;
use super::listener::{EventCallback, EventSource, HotkeyError};

/// How often a held-open source checks whether it was stopped
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Event source that delivers a predefined list of events
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    events: Vec<KeyEvent>,
    hold_open: bool,
}

impl ScriptedSource {
    pub fn new(events: Vec<KeyEvent>) -> Self {
        Self {
            events,
            hold_open: false,
        }
    }

    /// Load a script from a JSON array of `{"name", "event_type"}` objects
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Keep running after the last event until the listener is stopped
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }
}

impl EventSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn run(
        self: Box<Self>,
        running: Arc<AtomicBool>,
        mut on_event: EventCallback,
    ) -> Result<(), HotkeyError> {
        let ScriptedSource { events, hold_open } = *self;

        for event in events {
            if !running.load(Ordering::SeqCst) {
                return Ok(());
            }
            on_event(event);
        }

        while hold_open && running.load(Ordering::SeqCst) {
            thread::sleep(POLL_INTERVAL);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::hotkey::names;

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"name": "ctrl", "event_type": "down"},
            {"name": "right", "event_type": "up"}
        ]"#;
        let source = ScriptedSource::from_json(json).unwrap();
        assert_eq!(
            source.events,
            vec![KeyEvent::down(names::CTRL), KeyEvent::up(names::RIGHT)]
        );
    }

    #[test]
    fn test_rejects_unknown_event_type() {
        let json = r#"[{"name": "ctrl", "event_type": "pressed"}]"#;
        assert!(ScriptedSource::from_json(json).is_err());
    }

    #[test]
    fn test_stops_when_not_running() {
        let delivered = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&delivered);
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let source = Box::new(ScriptedSource::new(vec![
            KeyEvent::down("a"),
            KeyEvent::down("b"),
            KeyEvent::down("c"),
        ]));
        source
            .run(
                running,
                Box::new(move |_| {
                    *counter.lock().unwrap() += 1;
                    flag.store(false, Ordering::SeqCst);
                }),
            )
            .unwrap();

        assert_eq!(*delivered.lock().unwrap(), 1);
    }
}
