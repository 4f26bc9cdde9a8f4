//! Configuration loading and management

use std::path::PathBuf;

use anyhow::{Context, Result};

/// File name of the debug trace inside the data directory
pub const TRACE_LOG_FILE: &str = "hotkey-nav-debug.log";

/// Environment variable enabling the debug trace
pub const TRACE_ENV: &str = "HOTKEY_NAV_TRACE";

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Append-only debug trace file
    pub trace_log_path: PathBuf,

    /// Whether the debug trace (and startup banner) are enabled
    pub trace_enabled: bool,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = lookup("HOME")
            .or_else(|| lookup("USERPROFILE"))
            .context("neither HOME nor USERPROFILE is set")?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("hotkey-nav");

        let trace_log_path = data_dir.join(TRACE_LOG_FILE);
        let trace_enabled = lookup(TRACE_ENV).map(|v| is_truthy(&v)).unwrap_or(false);

        Ok(Self {
            data_dir,
            trace_log_path,
            trace_enabled,
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create {}", self.data_dir.display()))?;
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "off" | "no"
    )
}
