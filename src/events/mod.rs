//! Events describing what happened to each key event
//!
//! `TraceEvent` is the vocabulary of the debug trace file; `DispatchOutcome`
//! is what the callback boundary reports back for every key event.

use crate::hotkey::{KeyEvent, ModifierState};
use crate::protocol::Command;

/// Target that routes records into the debug trace file
pub const TRACE_TARGET: &str = "hotkey_nav::trace";

/// Steps recorded in the debug trace while handling one key event
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    /// A key event arrived from the hook
    EventReceived(&'a KeyEvent),
    /// Modifier keys were sampled for a down event
    ModifierState(ModifierState),
    /// ctrl + e + arrow detected
    CombinationMatched(Command),
    /// Command line written and flushed
    CommandSent(Command),
    /// Processing the event failed
    Error(&'a str),
}

impl TraceEvent<'_> {
    /// Append this step to the debug trace
    pub fn record(&self) {
        tracing::debug!(target: TRACE_TARGET, "{}", self);
    }
}

impl std::fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEvent::EventReceived(event) => {
                write!(f, "Key event: {} ({})", event.name, event.event_type)
            }
            TraceEvent::ModifierState(state) => write!(f, "Modifier state: {}", state),
            TraceEvent::CombinationMatched(command) => {
                write!(f, "Ctrl+E+{} detected", command.direction())
            }
            TraceEvent::CommandSent(command) => write!(f, "Sent {}", command),
            TraceEvent::Error(message) => write!(f, "Error processing key event: {}", message),
        }
    }
}

/// Result of handing one key event to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing to do for this event
    Ignored,
    /// A command line was written
    Sent(Command),
    /// Processing failed and an error line was reported
    Failed(String),
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Ignored => write!(f, "IGNORED"),
            DispatchOutcome::Sent(command) => write!(f, "SENT ({})", command),
            DispatchOutcome::Failed(message) => write!(f, "FAILED ({})", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_messages() {
        let event = KeyEvent::down("right");
        assert_eq!(
            TraceEvent::EventReceived(&event).to_string(),
            "Key event: right (down)"
        );
        assert_eq!(
            TraceEvent::ModifierState(ModifierState { ctrl: true, e: false }).to_string(),
            "Modifier state: ctrl=true e=false"
        );
        assert_eq!(
            TraceEvent::CombinationMatched(Command::Left).to_string(),
            "Ctrl+E+left detected"
        );
        assert_eq!(
            TraceEvent::CommandSent(Command::Right).to_string(),
            "Sent COMMAND:right"
        );
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(DispatchOutcome::Sent(Command::Left).to_string(), "SENT (COMMAND:left)");
        assert_eq!(DispatchOutcome::Ignored.to_string(), "IGNORED");
    }
}
