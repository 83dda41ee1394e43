//! Terminal output for the gate.
//!
//! Progress and countdown lines redraw in place (`\r`, no newline); notices
//! end with a newline. Write failures are logged and swallowed so a closed
//! pipe never aborts a wait.

use std::io::Write;

pub struct Console {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Console {
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self { out, err }
    }

    /// Console bound to the process stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    /// Write `text` without a newline and flush, so the next redraw
    /// overwrites it.
    pub fn redraw(&mut self, text: &str) {
        if let Err(e) = write_flush(&mut self.out, text) {
            tracing::warn!(error = %e, "Failed to write progress line");
        }
    }

    /// Write `text` followed by a newline.
    pub fn line(&mut self, text: &str) {
        if let Err(e) = write_flush(&mut self.out, &format!("{text}\n")) {
            tracing::warn!(error = %e, "Failed to write console line");
        }
    }

    /// Write `text` followed by a newline to the error stream.
    pub fn warn(&mut self, text: &str) {
        if let Err(e) = write_flush(&mut self.err, &format!("{text}\n")) {
            tracing::warn!(error = %e, "Failed to write warning line");
        }
    }
}

fn write_flush(sink: &mut dyn Write, text: &str) -> std::io::Result<()> {
    sink.write_all(text.as_bytes())?;
    sink.flush()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn redraw_has_no_newline_and_warn_goes_to_stderr() {
        let (out, err) = (Buffer::default(), Buffer::default());
        let mut console = Console::new(Box::new(out.clone()), Box::new(err.clone()));

        console.redraw("\rone");
        console.redraw("\rtwo");
        console.line("done");
        console.warn("oops");

        assert_eq!(out.text(), "\rone\rtwodone\n");
        assert_eq!(err.text(), "oops\n");
    }

    #[test]
    fn broken_sink_does_not_panic() {
        let mut console = Console::new(Box::new(Broken), Box::new(Broken));
        console.redraw("x");
        console.line("y");
        console.warn("z");
    }
}
