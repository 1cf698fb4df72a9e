//! Output destination for the `print` capability.
//!
//! - Stdout: the default
//! - Buffer: captures output for hosts that show it elsewhere, and for tests
//! - Silent: discards output

use std::sync::Arc;

use parking_lot::Mutex;

/// Where `print` writes.
#[derive(Debug)]
pub enum PrintHandler {
    Stdout,
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandler {
    pub fn buffer() -> Self {
        PrintHandler::Buffer(Mutex::new(String::new()))
    }

    /// Write `text` exactly (callers append the line ending).
    pub fn write(&self, text: &str) {
        match self {
            PrintHandler::Stdout => print!("{text}"),
            PrintHandler::Buffer(buffer) => buffer.lock().push_str(text),
            PrintHandler::Silent => {}
        }
    }

    /// Captured output; empty for handlers that do not capture.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buffer) => buffer.lock().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let PrintHandler::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

/// Print handler shared between the bindings and the host.
pub type SharedPrintHandler = Arc<PrintHandler>;

/// Create a handler that captures output.
pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::buffer())
}

/// Create the default stdout handler.
pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_in_order() {
        let handler = PrintHandler::buffer();
        handler.write("a ");
        handler.write("b\n");
        assert_eq!(handler.output(), "a b\n");
        handler.clear();
        assert_eq!(handler.output(), "");
    }

    #[test]
    fn silent_and_stdout_capture_nothing() {
        PrintHandler::Silent.write("ignored");
        assert_eq!(PrintHandler::Silent.output(), "");
        assert_eq!(PrintHandler::Stdout.output(), "");
    }
}
