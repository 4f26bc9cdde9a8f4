//! hotkey-nav: background hotkey listener for editor navigation
//!
//! Spawned by the editor extension, which reads our stdout:
//! - Global key hook (CGEventTap on macOS, rdev elsewhere)
//! - ctrl + e + Left/Right emits `COMMAND:left` / `COMMAND:right`
//! - Failed events emit `ERROR: <message>` and listening continues

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use hotkey_nav::config::Config;
use hotkey_nav::dispatch::HotkeyDispatcher;
use hotkey_nav::hotkey::{self, HotkeyListener, PressedKeys};
use hotkey_nav::lifecycle::ShutdownSignal;
use hotkey_nav::logging;
use hotkey_nav::protocol::CommandWriter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let _log_guard = logging::init(&config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        trace = config.trace_enabled,
        "hotkey-nav starting"
    );

    // Key-state table shared by the hook (writer) and dispatcher (reader)
    let keys = PressedKeys::new();

    let mut output = CommandWriter::stdout();
    if config.trace_enabled {
        output.send_banner().context("failed to write startup banner")?;
    }

    let mut dispatcher = HotkeyDispatcher::new(keys.clone(), output);
    let listener = HotkeyListener::new(keys);

    // Hook registration failure is fatal: without it there is nothing to do
    let exited = listener
        .start(hotkey::system_source(), move |event| {
            let outcome = dispatcher.on_key_event(event);
            debug!(%outcome, key = %event.name, "key event handled");
        })
        .context("failed to start hotkey listener")?;
    info!("hotkey listener started");

    let shutdown = ShutdownSignal::new();

    tokio::select! {
        result = exited => {
            match result {
                Ok(()) => warn!("hotkey listener exited"),
                Err(e) => {
                    error!(?e, "hotkey listener failed");
                    return Err(e).context("keyboard hook stopped");
                }
            }
        }

        _ = wait_for_shutdown(&shutdown) => {
            info!("shutdown signal received");
        }
    }

    info!("shutting down...");
    listener.stop();
    info!("hotkey-nav stopped");

    Ok(())
}

/// Resolve on SIGTERM/SIGINT; without signal handlers, only process kill ends us
async fn wait_for_shutdown(shutdown: &ShutdownSignal) {
    if let Err(e) = shutdown.wait().await {
        warn!(?e, "failed to register signal handlers");
        std::future::pending::<()>().await;
    }
}
