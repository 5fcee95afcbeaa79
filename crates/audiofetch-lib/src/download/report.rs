use crate::error::FetchError;
use std::io::Write;

pub fn downloading_line(filename: &str) -> String {
    format!("Downloading {filename}...")
}

pub fn success_line(filename: &str, size: u64) -> String {
    format!("Success: {filename} ({size} bytes)")
}

pub fn error_line(filename: &str, error: &FetchError) -> String {
    format!("Error downloading {filename}: {error}")
}

/// Writes the per-entry console lines. Every line is flushed immediately so the
/// "Downloading" line is visible while the transfer is still running.
pub struct StatusReporter<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> StatusReporter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    pub fn downloading(&mut self, filename: &str) {
        self.emit(downloading_line(filename));
    }

    pub fn success(&mut self, filename: &str, size: u64) {
        self.emit(success_line(filename, size));
    }

    pub fn error(&mut self, filename: &str, error: &FetchError) {
        self.emit(error_line(filename, error));
    }

    fn emit(&mut self, line: String) {
        // A closed stdout must not abort the remaining downloads.
        if let Err(err) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            tracing::warn!(line = %line, "Failed to write status line: {}", err);
        }
    }
}
