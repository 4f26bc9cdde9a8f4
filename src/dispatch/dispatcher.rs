//! Hotkey detection and command dispatch
//!
//! For every key-down event, samples ctrl and e from the key-state table
//! and writes `COMMAND:left` / `COMMAND:right` when an arrow key is pressed
//! while both are held.

use std::io::{self, Write};

use tracing::{debug, error, warn};

use crate::events::{DispatchOutcome, TraceEvent};
use crate::hotkey::{KeyEvent, KeyStateError, KeyStateQuery, ModifierState};
use crate::protocol::{Command, CommandWriter};

/// Failure while handling a single key event
#[derive(Debug, thiserror::Error)]
pub enum EventProcessingError {
    #[error(transparent)]
    KeyState(#[from] KeyStateError),

    #[error("failed to write command: {0}")]
    Output(#[from] io::Error),
}

/// Turns key events into command lines
///
/// Holds no state between events: each call checks the live key table and
/// the event's own fields.
pub struct HotkeyDispatcher<K, W> {
    keys: K,
    output: CommandWriter<W>,
}

impl<K: KeyStateQuery, W: Write> HotkeyDispatcher<K, W> {
    /// Create a dispatcher reading key state from `keys` and writing to `output`
    pub fn new(keys: K, output: CommandWriter<W>) -> Self {
        Self { keys, output }
    }

    /// Handle one key event, returning the command written if any
    pub fn dispatch(&mut self, event: &KeyEvent) -> Result<Option<Command>, EventProcessingError> {
        TraceEvent::EventReceived(event).record();

        if !event.is_down() {
            return Ok(None);
        }

        let modifiers = ModifierState::query(&self.keys)?;
        TraceEvent::ModifierState(modifiers).record();

        if !modifiers.is_active() {
            return Ok(None);
        }

        let Some(command) = Command::for_key(&event.name) else {
            return Ok(None);
        };
        TraceEvent::CombinationMatched(command).record();

        self.output.send(command)?;
        TraceEvent::CommandSent(command).record();
        debug!(%command, "command sent");

        Ok(Some(command))
    }

    /// Hook callback entry point
    ///
    /// Never fails: errors are reported as an `ERROR:` line and the
    /// listener carries on with the next event.
    pub fn on_key_event(&mut self, event: &KeyEvent) -> DispatchOutcome {
        match self.dispatch(event) {
            Ok(Some(command)) => DispatchOutcome::Sent(command),
            Ok(None) => DispatchOutcome::Ignored,
            Err(e) => {
                let message = e.to_string();
                error!(error = %message, key = %event.name, "failed to process key event");
                TraceEvent::Error(&message).record();

                if let Err(write_err) = self.output.send_error(&message) {
                    warn!(?write_err, "failed to report error on stdout");
                }

                DispatchOutcome::Failed(message)
            }
        }
    }
}
