//! Stream-based logging handler implementation.
//!
//! `StreamHandler` formats each record and writes it synchronously to an
//! `io::Write` stream. Write failures are reported through `handle_error`
//! rather than returned to the logger.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use log::warn;
use parking_lot::Mutex;

use crate::diagnostics::DiagnosticSink;
use crate::filters::{Filterable, Filterer};
use crate::formatter::{DefaultFormatter, Formatter, SharedFormatter};
use crate::handler::{Handler, HandlerError, Leveled};
use crate::level::Level;
use crate::log_record::LogRecord;

/// Handler that writes formatted log records to an `io::Write` stream.
pub struct StreamHandler {
    writer: Mutex<Box<dyn Write + Send>>,
    formatter: SharedFormatter,
    level: AtomicI32,
    filters: Filterer,
    error_sink: Option<Arc<dyn DiagnosticSink>>,
}

impl StreamHandler {
    /// Create a new handler writing to `stdout` with a `DefaultFormatter`.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), DefaultFormatter)
    }

    /// Create a new handler writing to `stderr` with a `DefaultFormatter`.
    pub fn stderr() -> Self {
        Self::new(io::stderr(), DefaultFormatter)
    }

    /// Create a new handler from an arbitrary writer and formatter.
    pub fn new<W, F>(writer: W, formatter: F) -> Self
    where
        W: Write + Send + 'static,
        F: Formatter + 'static,
    {
        Self {
            writer: Mutex::new(Box::new(writer)),
            formatter: SharedFormatter::new(formatter),
            level: AtomicI32::new(Level::NOTSET.value()),
            filters: Filterer::new(),
            error_sink: None,
        }
    }

    /// Set the minimum level this handler accepts.
    pub fn set_level(&self, level: Level) {
        self.level.store(level.value(), Ordering::Relaxed);
    }

    /// Builder-style variant of [`set_level`](Self::set_level).
    pub fn with_level(self, level: Level) -> Self {
        self.set_level(level);
        self
    }

    /// Send write failures to `sink` instead of the `log` facade.
    ///
    /// Use this when the `log` bridge routes into a registry: the bridge
    /// ignores records from this crate's own targets, so the default
    /// `log::warn!` report never reaches a handler.
    pub fn with_error_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// Report a write failure without interrupting the logging call.
    fn handle_error(&self, record: &LogRecord, err: &io::Error) {
        let message = format!(
            "StreamHandler: failed to write record from logger '{}': {err}",
            record.logger
        );
        match &self.error_sink {
            Some(sink) => sink.write_diagnostic(&message),
            None => warn!("{message}"),
        }
    }
}

impl Leveled for StreamHandler {
    fn level(&self) -> Level {
        Level::new(self.level.load(Ordering::Relaxed))
    }
}

impl Filterable for StreamHandler {
    fn filterer(&self) -> &Filterer {
        &self.filters
    }
}

impl Handler for StreamHandler {
    fn handle(&self, record: &LogRecord) -> Result<(), HandlerError> {
        let accepted = self
            .passes_filters(record)
            .map_err(|e| HandlerError::Failed(e.to_string()))?;
        if !accepted {
            return Ok(());
        }
        let msg = self.formatter.format(record);
        let mut writer = self.writer.lock();
        if let Err(err) = writeln!(writer, "{msg}").and_then(|_| writer.flush()) {
            drop(writer);
            self.handle_error(record, &err);
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), HandlerError> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSink;
use crate::filters::{FilterBuilderTrait, NameFilter, NameFilterBuilder};
    use std::sync::Arc;
    use crate::test_utils::CollectingSink;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).expect("utf-8 output")
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(name: &str, message: &str) -> LogRecord {
        LogRecord::new(name, Level::INFO, "INFO", message)
    }

    #[test]
    fn writes_formatted_lines() {
        let buf = SharedBuf::default();
        let handler = StreamHandler::new(buf.clone(), DefaultFormatter);
        handler.handle(&record("core", "one")).expect("write");
        handler.handle(&record("core", "two")).expect("write");
        assert_eq!(buf.contents(), "core [INFO] one\ncore [INFO] two\n");
    }

    #[test]
    fn write_errors_are_handled_locally() {
        let handler = StreamHandler::new(FailingWriter, DefaultFormatter);
        assert!(handler.handle(&record("core", "lost")).is_ok());
    }

    #[test]
    fn write_errors_go_to_the_error_sink() {
        let sink = Arc::new(CollectingSink::new());
        let handler = StreamHandler::new(FailingWriter, DefaultFormatter)
            .with_error_sink(Arc::clone(&sink) as Arc<dyn DiagnosticSink>);
        handler.handle(&record("net", "lost")).expect("reported locally");
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("'net'"));
        assert!(messages[0].contains("closed"));
    }

    #[test]
    fn handler_filters_apply() {
        let buf = SharedBuf::default();
        let handler = StreamHandler::new(buf.clone(), DefaultFormatter);
        let filter: NameFilter = NameFilterBuilder::new()
            .with_prefix("keep")
            .build_inner()
            .expect("prefix set");
        handler.filterer().add(Arc::new(filter));
        handler.handle(&record("drop", "no")).expect("write");
        handler.handle(&record("keep", "yes")).expect("write");
        assert_eq!(buf.contents(), "keep [INFO] yes\n");
    }

    #[test]
    fn level_defaults_to_notset() {
        let handler = StreamHandler::new(SharedBuf::default(), DefaultFormatter);
        assert_eq!(handler.level(), Level::NOTSET);
        assert_eq!(handler.with_level(Level::ERROR).level(), Level::ERROR);
    }
}
