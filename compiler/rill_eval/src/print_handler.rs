//! Where `log`, `debug`, and `print` send their output.

use std::sync::Arc;

use parking_lot::Mutex;

pub trait PrintHandler {
    fn emit(&self, line: &str);
}

pub type SharedPrintHandler = Arc<dyn PrintHandler>;

/// Writes lines to stdout. The default for `rill run`.
pub struct StdoutPrinter;

impl PrintHandler for StdoutPrinter {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Collects lines in memory, for tests and tooling.
#[derive(Default)]
pub struct BufferPrinter {
    lines: Mutex<Vec<String>>,
}

impl BufferPrinter {
    pub fn new() -> Arc<Self> {
        Arc::new(BufferPrinter::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl PrintHandler for BufferPrinter {
    fn emit(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// Discards everything.
pub struct SilentPrinter;

impl PrintHandler for SilentPrinter {
    fn emit(&self, _line: &str) {}
}
