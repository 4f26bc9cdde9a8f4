//! Global hotkey listener
//!
//! Owns the keyboard hook for the lifetime of the process. The event source
//! runs on a dedicated thread; each event is applied to the key-state table
//! and handed to the callback on that same thread, one at a time.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread;

use tokio::sync::oneshot;
use tracing::{error, info, warn};

use super::keys::{KeyEvent, PressedKeys};

/// Callback a source invokes for every key transition it observes
pub type EventCallback = Box<dyn FnMut(KeyEvent) + Send + 'static>;

/// A producer of key events: the OS hook or a synthetic stand-in
pub trait EventSource: Send + 'static {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Deliver events until the source is exhausted or `running` is cleared
    fn run(self: Box<Self>, running: Arc<AtomicBool>, on_event: EventCallback)
        -> Result<(), HotkeyError>;
}

/// Errors that can occur in the hotkey listener
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("hotkey listener is already running")]
    AlreadyRunning,

    #[error("failed to create event tap - check Accessibility permissions")]
    EventTapCreation,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),

    #[error("keyboard hook failed: {0}")]
    Listen(String),

    #[error("listener thread exited without reporting")]
    Disconnected,
}

/// Resolves when the listener thread finishes
pub struct ListenerExit {
    rx: oneshot::Receiver<Result<(), HotkeyError>>,
}

impl Future for ListenerExit {
    type Output = Result<(), HotkeyError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(Err(HotkeyError::Disconnected)))
    }
}

/// Global hotkey listener that feeds key events to a callback
pub struct HotkeyListener {
    keys: PressedKeys,
    running: Arc<AtomicBool>,
}

impl HotkeyListener {
    /// Create a listener that keeps `keys` in sync with the hook
    pub fn new(keys: PressedKeys) -> Self {
        Self {
            keys,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the hotkey listener
    ///
    /// Spawns the `hotkey-listener` thread running `source`. Events are
    /// dropped once `stop()` has been called.
    pub fn start<S, H>(&self, source: S, mut handler: H) -> Result<ListenerExit, HotkeyError>
    where
        S: EventSource,
        H: FnMut(&KeyEvent) + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(HotkeyError::AlreadyRunning);
        }

        let keys = self.keys.clone();
        let running = Arc::clone(&self.running);
        let (exit_tx, exit_rx) = oneshot::channel();

        let callback_running = Arc::clone(&running);
        let on_event: EventCallback = Box::new(move |event: KeyEvent| {
            if !callback_running.load(Ordering::SeqCst) {
                return;
            }
            if let Err(e) = keys.apply(&event) {
                warn!(?e, key = %event.name, "failed to update key state");
            }
            handler(&event);
        });

        let source: Box<dyn EventSource> = Box::new(source);
        let source_name = source.name();

        let spawned = thread::Builder::new()
            .name("hotkey-listener".to_string())
            .spawn(move || {
                info!(source = source_name, "hotkey listener thread started");

                let result = source.run(Arc::clone(&running), on_event);
                if let Err(e) = &result {
                    error!(?e, "hotkey listener error");
                }

                running.store(false, Ordering::SeqCst);
                info!("hotkey listener thread stopped");
                let _ = exit_tx.send(result);
            });

        if let Err(e) = spawned {
            self.running.store(false, Ordering::SeqCst);
            return Err(HotkeyError::ThreadSpawn(e.to_string()));
        }

        Ok(ListenerExit { rx: exit_rx })
    }

    /// Stop the hotkey listener
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the listener is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
