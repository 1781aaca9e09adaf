//! Diagnostic console adapters.
//!
//! [`SerialConsole`] is the host stand-in for the serial terminal the
//! firmware reports to; [`RecordingConsole`] captures output for test
//! assertions. Both are fire-and-forget per the port contract.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::hal::Console;

/// Writes diagnostic text to stdout, line-buffered like a serial link.
#[derive(Debug, Default)]
pub struct SerialConsole;

impl SerialConsole {
    pub fn new() -> Self {
        Self
    }
}

impl Console for SerialConsole {
    fn write_str(&mut self, text: &str) {
        print!("{text}");
        // Fire-and-forget: a failed flush is dropped, never propagated.
        let _ = std::io::stdout().flush();
    }

    fn write_line(&mut self, text: &str) {
        println!("{text}");
    }

    fn write_number(&mut self, value: u32) {
        self.write_str(&value.to_string());
    }
}

/// Captures console output for assertions. Clones share the transcript.
#[derive(Debug, Clone, Default)]
pub struct RecordingConsole {
    lines: Rc<RefCell<Vec<String>>>,
    partial: Rc<RefCell<String>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any completed line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }

    /// Number of completed lines.
    pub fn line_count(&self) -> usize {
        self.lines.borrow().len()
    }

    /// Snapshot of the completed lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl Console for RecordingConsole {
    fn write_str(&mut self, text: &str) {
        self.partial.borrow_mut().push_str(text);
    }

    fn write_line(&mut self, text: &str) {
        let mut line = self.partial.borrow_mut();
        line.push_str(text);
        self.lines.borrow_mut().push(std::mem::take(&mut *line));
    }

    fn write_number(&mut self, value: u32) {
        self.partial.borrow_mut().push_str(&value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_console_assembles_partial_writes() {
        let mut c = RecordingConsole::new();
        c.write_str("Number of timeouts: ");
        c.write_number(3);
        c.write_line("");
        c.write_line("System lockdown!");

        assert_eq!(c.line_count(), 2);
        assert!(c.contains("Number of timeouts: 3"));
        assert!(c.contains("System lockdown!"));
        assert_eq!(c.lines()[0], "Number of timeouts: 3");
    }
}
