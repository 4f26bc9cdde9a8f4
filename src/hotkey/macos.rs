//! Keyboard hook using macOS CGEventTap
//!
//! Listens at session level for key down/up and modifier flag changes.
//! Runs a CFRunLoop on the listener thread, polling the running flag
//! between short run-loop slices.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use core_foundation::runloop::{kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop};
use core_graphics::event::{
    CGEvent, CGEventFlags, CGEventTap, CGEventTapLocation, CGEventTapOptions,
    CGEventTapPlacement, CGEventTapProxy, CGEventType, EventField,
};
use tracing::{debug, error, info, warn};

use super::keys::{names, KeyEvent};
use super::listener::{EventCallback, EventSource, HotkeyError};

/// macOS virtual keycodes (HIToolbox `kVK_*`)
mod keycodes {
    pub const ANSI_E: i64 = 0x0E;
    pub const LEFT_ARROW: i64 = 0x7B;
    pub const RIGHT_ARROW: i64 = 0x7C;
    pub const DOWN_ARROW: i64 = 0x7D;
    pub const UP_ARROW: i64 = 0x7E;
}

/// Run-loop slice between checks of the running flag
const RUN_LOOP_SLICE: Duration = Duration::from_millis(100);

/// What the tap callback forwards to the run loop
#[derive(Debug, Clone, Copy)]
enum TapEvent {
    Key { keycode: i64, down: bool },
    Flags(CGEventFlags),
    Disabled,
}

/// Map a virtual keycode to its semantic key name
fn key_name(keycode: i64) -> String {
    match keycode {
        keycodes::ANSI_E => names::E.to_string(),
        keycodes::LEFT_ARROW => names::LEFT.to_string(),
        keycodes::RIGHT_ARROW => names::RIGHT.to_string(),
        keycodes::DOWN_ARROW => names::DOWN.to_string(),
        keycodes::UP_ARROW => names::UP.to_string(),
        other => format!("keycode:{}", other),
    }
}

/// Key event for a change of the Control flag, if any
fn control_transition(previous: CGEventFlags, current: CGEventFlags) -> Option<KeyEvent> {
    let was_held = previous.contains(CGEventFlags::CGEventFlagControl);
    let is_held = current.contains(CGEventFlags::CGEventFlagControl);

    match (was_held, is_held) {
        (false, true) => Some(KeyEvent::down(names::CTRL)),
        (true, false) => Some(KeyEvent::up(names::CTRL)),
        _ => None,
    }
}

/// Event source backed by a listen-only CGEventTap
#[derive(Debug, Default)]
pub struct EventTapSource;

impl EventTapSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for EventTapSource {
    fn name(&self) -> &'static str {
        "cg-event-tap"
    }

    fn run(
        self: Box<Self>,
        running: Arc<AtomicBool>,
        mut on_event: EventCallback,
    ) -> Result<(), HotkeyError> {
        let mut last_flags = CGEventFlags::CGEventFlagNull;

        let (callback_tx, callback_rx) = mpsc::channel::<TapEvent>();

        // CGEventTap callback - must be fast and non-blocking
        let callback = move |_proxy: CGEventTapProxy,
                             event_type: CGEventType,
                             event: &CGEvent|
                             -> Option<CGEvent> {
            let forwarded = match event_type {
                CGEventType::KeyDown | CGEventType::KeyUp => Some(TapEvent::Key {
                    keycode: event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE),
                    down: matches!(event_type, CGEventType::KeyDown),
                }),
                CGEventType::FlagsChanged => Some(TapEvent::Flags(event.get_flags())),
                CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
                    Some(TapEvent::Disabled)
                }
                _ => None,
            };
            if let Some(forwarded) = forwarded {
                let _ = callback_tx.send(forwarded);
            }
            Some(event.clone())
        };

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::ListenOnly,
            vec![
                CGEventType::KeyDown,
                CGEventType::KeyUp,
                CGEventType::FlagsChanged,
            ],
            callback,
        )
        .map_err(|_| {
            error!("failed to create event tap - is Accessibility permission granted?");
            HotkeyError::EventTapCreation
        })?;

        tap.enable();

        let run_loop_source = tap
            .mach_port
            .create_runloop_source(0)
            .map_err(|_| HotkeyError::EventTapCreation)?;
        let run_loop = CFRunLoop::get_current();

        unsafe {
            run_loop.add_source(&run_loop_source, kCFRunLoopCommonModes);
        }

        info!("event tap created and enabled");

        while running.load(Ordering::SeqCst) {
            unsafe {
                CFRunLoop::run_in_mode(kCFRunLoopDefaultMode, RUN_LOOP_SLICE, true);
            }

            while let Ok(tap_event) = callback_rx.try_recv() {
                match tap_event {
                    TapEvent::Key { keycode, down } => {
                        let name = key_name(keycode);
                        on_event(if down {
                            KeyEvent::down(name)
                        } else {
                            KeyEvent::up(name)
                        });
                    }
                    TapEvent::Flags(flags) => {
                        if let Some(event) = control_transition(last_flags, flags) {
                            debug!(?event, "control state changed");
                            on_event(event);
                        }
                        last_flags = flags;
                    }
                    TapEvent::Disabled => {
                        warn!("event tap disabled by macOS, re-enabling");
                        tap.enable();
                    }
                }
            }
        }

        // Tap is removed when it goes out of scope
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(0x7B), "left");
        assert_eq!(key_name(0x7C), "right");
        assert_eq!(key_name(0x0E), "e");
        assert_eq!(key_name(0x00), "keycode:0");
    }

    #[test]
    fn test_control_transition() {
        let none = CGEventFlags::CGEventFlagNull;
        let ctrl = CGEventFlags::CGEventFlagControl;
        let ctrl_shift = ctrl | CGEventFlags::CGEventFlagShift;

        assert_eq!(control_transition(none, ctrl), Some(KeyEvent::down("ctrl")));
        assert_eq!(control_transition(ctrl, none), Some(KeyEvent::up("ctrl")));
        assert_eq!(control_transition(ctrl, ctrl_shift), None);
        assert_eq!(control_transition(none, CGEventFlags::CGEventFlagShift), None);
    }
}
