//! Stdout protocol between the daemon and its consumer

mod command;
mod writer;

pub use command::{Command, OutputLine, BANNER, COMMAND_PREFIX, ERROR_PREFIX};
pub use writer::CommandWriter;
