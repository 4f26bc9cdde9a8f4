//! hotkey-nav: global ctrl+e+arrow listener
//!
//! Watches system-wide keyboard events and, while Control and E are held,
//! turns Left/Right arrow presses into `COMMAND:left` / `COMMAND:right`
//! lines on stdout for an editor extension to consume.
//!
//! - `hotkey`: key events, key-state table, OS hooks and the listener thread
//! - `dispatch`: the per-event hotkey check
//! - `protocol`: stdout line format for producers and consumers
//! - `events`: debug trace messages and per-event outcomes
//! - `logging`: stderr diagnostics and the optional debug trace file
//! - `config`: data directory and trace settings from the environment
//! - `lifecycle`: shutdown signal handling

pub mod config;
pub mod dispatch;
pub mod events;
pub mod hotkey;
pub mod lifecycle;
pub mod logging;
pub mod protocol;
