//! Logging configuration using the tracing ecosystem.
//!
//! Two outputs:
//! - Diagnostics on stderr, filtered by `RUST_LOG` (default `info`). Stdout
//!   is reserved for the command protocol.
//! - The optional debug trace: records on the trace target appended to a
//!   single file as `[YYYY-MM-DD HH:MM:SS.ffffff] <message>` lines, through a
//!   non-blocking writer so a slow or failing disk never stalls dispatch.

use std::fmt;
use std::path::Path;

use chrono::Local;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::filter::{EnvFilter, Targets};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt as fmt_layer, prelude::*, Layer, Registry};

use crate::config::Config;
use crate::events::TRACE_TARGET;

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors opening the debug trace file
#[derive(Debug, thiserror::Error)]
pub enum TraceLogError {
    #[error("trace log path has no file name: {0}")]
    InvalidPath(String),

    #[error("failed to open trace log: {0}")]
    Open(#[from] InitError),
}

/// Layer writing the debug trace file
pub type TraceLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the trace writer alive; dropping it flushes pending lines.
pub struct LogGuard {
    _trace: Option<WorkerGuard>,
}

/// Local-time timestamp with microsecond precision, in brackets
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceTimestamp;

impl FormatTime for TraceTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "[{}]", Local::now().format("%Y-%m-%d %H:%M:%S%.6f"))
    }
}

/// Initialize the logging system.
///
/// A trace file that cannot be opened is reported on stderr and skipped;
/// it never prevents the daemon from starting.
pub fn init(config: &Config) -> anyhow::Result<LogGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stderr_layer = fmt_layer::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let mut trace_error = None;
    let (trace_layer, trace_guard) = if config.trace_enabled {
        match config.ensure_dirs().map_err(|e| e.to_string()).and_then(|()| {
            trace_file_layer(&config.trace_log_path).map_err(|e| e.to_string())
        }) {
            Ok((layer, guard)) => (Some(layer), Some(guard)),
            Err(e) => {
                trace_error = Some(e);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(trace_layer)
        .with(stderr_layer)
        .try_init()?;

    if let Some(e) = trace_error {
        tracing::warn!(error = %e, "debug trace disabled");
    } else if config.trace_enabled {
        tracing::info!(path = %config.trace_log_path.display(), "debug trace enabled");
    }

    Ok(LogGuard {
        _trace: trace_guard,
    })
}

/// Build the layer that appends trace-target records to `path`.
pub fn trace_file_layer(path: &Path) -> Result<(TraceLayer, WorkerGuard), TraceLogError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TraceLogError::InvalidPath(path.display().to_string()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt_layer::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_level(false)
        .with_target(false)
        .with_timer(TraceTimestamp)
        .with_filter(Targets::new().with_target(TRACE_TARGET, Level::TRACE))
        .boxed();

    Ok((layer, guard))
}
