//! Output plumbing: where report lines go, and where test output is swallowed.
//!
//! Report lines go through an [`OutputSink`]. Output produced by test code
//! goes into a [`CaptureBuffer`] that a [`CaptureScope`] empties when the
//! unit finishes, however it finishes. While a scope is open the process
//! stdout is gagged as well, so plain `println!` calls in test code are
//! discarded too.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use gag::Gag;
use tracing::debug;

// ============================================================================
// REPORT SINKS
// ============================================================================

/// Destination for the harness's own report lines.
pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// Collects report lines into a String for tests or programmatic capture.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    pub buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }
}

/// Writes report lines to stdout.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// A sink shared between the runner and every suite it drives.
#[derive(Clone)]
pub struct SharedSink(pub Rc<RefCell<dyn OutputSink>>);

impl SharedSink {
    pub fn stdout() -> Self {
        SharedSink(Rc::new(RefCell::new(StdoutSink)))
    }

    /// Wraps a buffer and hands back a second handle to read it later.
    pub fn buffer() -> (Self, Rc<RefCell<OutputBuffer>>) {
        let buffer = Rc::new(RefCell::new(OutputBuffer::new()));
        (SharedSink(buffer.clone()), buffer)
    }

    pub fn emit(&self, text: &str) {
        self.0.borrow_mut().emit(text);
    }
}

// ============================================================================
// TEST OUTPUT CAPTURE
// ============================================================================

/// Byte buffer that test code writes into instead of stdout.
#[derive(Clone, Default)]
pub struct CaptureBuffer(Rc<RefCell<Vec<u8>>>);

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    fn discard(&self) {
        self.0.borrow_mut().clear();
    }

    /// Opens a scope; everything written to the buffer or to stdout before
    /// the scope is dropped is thrown away.
    pub fn scope(&self) -> CaptureScope {
        self.discard();
        // Pending report text must not end up behind the gag.
        let _ = io::stdout().flush();
        let stdout = match Gag::stdout() {
            Ok(gag) => Some(gag),
            Err(err) => {
                // An enclosing scope already holds the redirect.
                debug!(error = %err, "stdout not gagged for this scope");
                None
            }
        };
        CaptureScope {
            buffer: self.clone(),
            _stdout: stdout,
        }
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Guard that empties its [`CaptureBuffer`] and restores stdout on drop.
pub struct CaptureScope {
    buffer: CaptureBuffer,
    _stdout: Option<Gag>,
}

impl Drop for CaptureScope {
    fn drop(&mut self) {
        // Flush while the gag is still held so buffered test text is dropped.
        let _ = io::stdout().flush();
        self.buffer.discard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_collects_lines() {
        let (sink, buffer) = SharedSink::buffer();
        sink.emit("one");
        sink.emit("two");
        assert_eq!(buffer.borrow().as_str(), "one\ntwo\n");
    }

    #[test]
    fn scope_discards_on_drop() {
        let capture = CaptureBuffer::new();
        {
            let _scope = capture.scope();
            let mut writer = capture.clone();
            write!(writer, "noise").unwrap();
            assert_eq!(capture.contents(), "noise");
        }
        assert!(capture.is_empty());
    }

    #[test]
    fn scope_discards_during_unwind() {
        let capture = CaptureBuffer::new();
        let inner = capture.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _scope = inner.scope();
            let mut writer = inner.clone();
            writer.write_all(b"before panic").unwrap();
            panic!("test body blew up");
        }));
        assert!(result.is_err());
        assert_eq!(capture.len(), 0);
    }
}
