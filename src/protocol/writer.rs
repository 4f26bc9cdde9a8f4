//! Line writer for the stdout protocol
//!
//! Each line is written in one call and flushed immediately so a reading
//! process sees it without delay.

use std::io::{self, Write};

use super::command::{Command, BANNER, ERROR_PREFIX};

/// Writes protocol lines to an output stream, flushing after each one
pub struct CommandWriter<W> {
    inner: W,
}

impl CommandWriter<io::Stdout> {
    /// Writer bound to the process's standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CommandWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write a command token line
    pub fn send(&mut self, command: Command) -> io::Result<()> {
        self.write_line(command.token())
    }

    /// Write an `ERROR: <message>` line
    pub fn send_error(&mut self, message: &str) -> io::Result<()> {
        // Keep the error on a single line so it cannot be mistaken for a command.
        let message = message.replace(['\r', '\n'], " ");
        self.write_line(&format!("{ERROR_PREFIX}{message}"))
    }

    /// Write the startup banner
    pub fn send_banner(&mut self) -> io::Result<()> {
        self.write_line(BANNER)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        self.inner.write_all(buf.as_bytes())?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records whether every written line was followed by a flush
    #[derive(Default)]
    struct FlushRecorder {
        data: Vec<u8>,
        unflushed: usize,
        flushed_lines: Vec<String>,
    }

    impl Write for FlushRecorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data.extend_from_slice(buf);
            self.unflushed += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            let start = self.data.len() - self.unflushed;
            let chunk = String::from_utf8_lossy(&self.data[start..]).into_owned();
            self.flushed_lines.push(chunk);
            self.unflushed = 0;
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "consumer went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_each_line_flushed() {
        let mut writer = CommandWriter::new(FlushRecorder::default());
        writer.send(Command::Right).unwrap();
        writer.send(Command::Left).unwrap();

        let recorder = writer.get_ref();
        assert_eq!(recorder.unflushed, 0);
        assert_eq!(
            recorder.flushed_lines,
            vec!["COMMAND:right\n".to_string(), "COMMAND:left\n".to_string()]
        );
    }

    #[test]
    fn test_error_line() {
        let mut writer = CommandWriter::new(Vec::new());
        writer.send_error("bad\nthing").unwrap();
        assert_eq!(writer.get_ref().as_slice(), b"ERROR: bad thing\n");
    }

    #[test]
    fn test_banner_line() {
        let mut writer = CommandWriter::new(Vec::new());
        writer.send_banner().unwrap();
        assert_eq!(writer.get_ref().as_slice(), b"hotkey-nav started\n");
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut writer = CommandWriter::new(BrokenPipe);
        let err = writer.send(Command::Right).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
