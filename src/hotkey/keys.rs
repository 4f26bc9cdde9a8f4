//! Key event definitions and key-state tracking
//!
//! Provides the semantic key names the dispatcher cares about, the
//! transient `KeyEvent` delivered by every event source, and the shared
//! table of currently pressed keys that answers "is this key held?".

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use serde::Deserialize;

/// Semantic key names produced by the event sources
pub mod names {
    /// Either Control key
    pub const CTRL: &str = "ctrl";
    /// Left Control, when the hook tells the two apart
    pub const CTRL_LEFT: &str = "ctrl_left";
    /// Right Control, when the hook tells the two apart
    pub const CTRL_RIGHT: &str = "ctrl_right";
    /// The `E` key, second half of the hotkey combination
    pub const E: &str = "e";
    /// Left arrow
    pub const LEFT: &str = "left";
    /// Right arrow
    pub const RIGHT: &str = "right";
    /// Up arrow
    pub const UP: &str = "up";
    /// Down arrow
    pub const DOWN: &str = "down";
}

/// Physical keys that also answer to a generic name
const ALIASES: &[(&str, &[&str])] = &[(names::CTRL, &[names::CTRL_LEFT, names::CTRL_RIGHT])];

fn aliases_of(name: &str) -> &'static [&'static str] {
    ALIASES
        .iter()
        .find(|(generic, _)| *generic == name)
        .map(|(_, physical)| *physical)
        .unwrap_or(&[])
}

/// Direction of a physical key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEventType {
    /// Key was pressed (or auto-repeated)
    Down,
    /// Key was released
    Up,
}

impl std::fmt::Display for KeyEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyEventType::Down => write!(f, "down"),
            KeyEventType::Up => write!(f, "up"),
        }
    }
}

/// A single key transition reported by the hook
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyEvent {
    /// Semantic key identifier, e.g. "left", "ctrl", "e"
    pub name: String,
    /// Whether the key went down or up
    pub event_type: KeyEventType,
}

impl KeyEvent {
    /// Create a key-down event
    pub fn down(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event_type: KeyEventType::Down,
        }
    }

    /// Create a key-up event
    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            event_type: KeyEventType::Up,
        }
    }

    pub fn is_down(&self) -> bool {
        self.event_type == KeyEventType::Down
    }
}

/// Errors from looking up instantaneous key state
#[derive(Debug, thiserror::Error)]
pub enum KeyStateError {
    #[error("key state table is poisoned")]
    Poisoned,

    #[error("key state unavailable for '{0}'")]
    Unavailable(String),
}

/// Read-only access to the current press status of keys
pub trait KeyStateQuery {
    /// Is the named key held down right now?
    fn is_pressed(&self, name: &str) -> Result<bool, KeyStateError>;
}

/// Table of keys the hook currently sees as held
///
/// Cloning yields another handle to the same table. The listener applies
/// every event here before the dispatcher sees it. Left and right
/// variants are stored separately; asking for `ctrl` matches either.
#[derive(Debug, Clone, Default)]
pub struct PressedKeys {
    inner: Arc<RwLock<HashSet<String>>>,
}

impl PressedKeys {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition
    pub fn apply(&self, event: &KeyEvent) -> Result<(), KeyStateError> {
        let mut pressed = self.inner.write().map_err(|_| KeyStateError::Poisoned)?;
        match event.event_type {
            KeyEventType::Down => {
                pressed.insert(event.name.clone());
            }
            KeyEventType::Up => {
                pressed.remove(&event.name);
            }
        }
        Ok(())
    }
}

impl KeyStateQuery for PressedKeys {
    fn is_pressed(&self, name: &str) -> Result<bool, KeyStateError> {
        let pressed = self.inner.read().map_err(|_| KeyStateError::Poisoned)?;
        Ok(pressed.contains(name) || aliases_of(name).iter().any(|alias| pressed.contains(*alias)))
    }
}

/// Press status of the hotkey combination keys at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    /// Control key is held
    pub ctrl: bool,
    /// E key is held
    pub e: bool,
}

impl ModifierState {
    /// Sample the combination keys from the key-state table
    ///
    /// The two lookups are independent: a key released between them is
    /// observed as released, so a fast release can race the check.
    pub fn query<Q: KeyStateQuery + ?Sized>(keys: &Q) -> Result<Self, KeyStateError> {
        let ctrl = keys.is_pressed(names::CTRL)?;
        let e = keys.is_pressed(names::E)?;
        Ok(Self { ctrl, e })
    }

    /// Check if ctrl + e are both held
    pub fn is_active(&self) -> bool {
        self.ctrl && self.e
    }
}

impl std::fmt::Display for ModifierState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ctrl={} e={}", self.ctrl, self.e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let keys = PressedKeys::new();
        assert!(!keys.is_pressed(names::CTRL).unwrap());
        assert!(!ModifierState::query(&keys).unwrap().is_active());
    }

    #[test]
    fn test_down_then_up() {
        let keys = PressedKeys::new();
        keys.apply(&KeyEvent::down(names::CTRL)).unwrap();
        assert!(keys.is_pressed(names::CTRL).unwrap());

        keys.apply(&KeyEvent::up(names::CTRL)).unwrap();
        assert!(!keys.is_pressed(names::CTRL).unwrap());
    }

    #[test]
    fn test_clones_share_state() {
        let keys = PressedKeys::new();
        let other = keys.clone();
        keys.apply(&KeyEvent::down(names::E)).unwrap();
        assert!(other.is_pressed(names::E).unwrap());

        other.apply(&KeyEvent::up(names::E)).unwrap();
        assert!(!keys.is_pressed(names::E).unwrap());
    }

    #[test]
    fn test_either_control_counts_as_ctrl() {
        let keys = PressedKeys::new();
        keys.apply(&KeyEvent::down(names::CTRL_LEFT)).unwrap();
        keys.apply(&KeyEvent::down(names::CTRL_RIGHT)).unwrap();
        keys.apply(&KeyEvent::up(names::CTRL_RIGHT)).unwrap();
        assert!(keys.is_pressed(names::CTRL).unwrap());
        assert!(!keys.is_pressed(names::CTRL_RIGHT).unwrap());

        keys.apply(&KeyEvent::up(names::CTRL_LEFT)).unwrap();
        assert!(!keys.is_pressed(names::CTRL).unwrap());
    }

    #[test]
    fn test_ctrl_only() {
        let state = ModifierState {
            ctrl: true,
            e: false,
        };
        assert!(!state.is_active());
    }

    #[test]
    fn test_ctrl_e() {
        let keys = PressedKeys::new();
        keys.apply(&KeyEvent::down(names::CTRL)).unwrap();
        keys.apply(&KeyEvent::down(names::E)).unwrap();

        let state = ModifierState::query(&keys).unwrap();
        assert_eq!(state, ModifierState { ctrl: true, e: true });
        assert!(state.is_active());
        assert_eq!(state.to_string(), "ctrl=true e=true");
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"name":"right","event_type":"down"}"#;
        let event: KeyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, KeyEvent::down(names::RIGHT));
        assert!(event.is_down());
    }
}
