//! Handlers, sinks and factories that record what they were given.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::diagnostics::DiagnosticSink;
use crate::handler::{Handler, HandlerError, Leveled};
use crate::level::Level;
use crate::log_record::{DefaultRecordFactory, LogRecord, RecordError, RecordFactory, RecordRequest};

/// Ordered log of `(tag, message)` pairs written by several handlers.
pub type Journal = Arc<Mutex<Vec<(String, String)>>>;

/// Handler that stores every record it receives for later inspection.
#[derive(Default)]
pub struct CollectingHandler {
    level: AtomicI32,
    records: Mutex<Vec<LogRecord>>,
    journal: Option<(String, Journal)>,
}

impl CollectingHandler {
    /// Create a new empty handler accepting every level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that also appends `(tag, message)` to `journal`.
    pub fn tagged(tag: impl Into<String>, journal: &Journal) -> Self {
        Self {
            journal: Some((tag.into(), Arc::clone(journal))),
            ..Self::default()
        }
    }

    pub fn with_level(self, level: Level) -> Self {
        self.level.store(level.value(), Ordering::Relaxed);
        self
    }

    /// Return a snapshot of all records received so far.
    pub fn collected(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Rendered messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(LogRecord::rendered_message)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Leveled for CollectingHandler {
    fn level(&self) -> Level {
        Level::new(self.level.load(Ordering::Relaxed))
    }
}

impl Handler for CollectingHandler {
    fn handle(&self, record: &LogRecord) -> Result<(), HandlerError> {
        if let Some((tag, journal)) = &self.journal {
            journal
                .lock()
                .push((tag.clone(), record.rendered_message()));
        }
        self.records.lock().push(record.clone());
        Ok(())
    }
}

/// Handler whose `handle` always fails.
#[derive(Debug, Default)]
pub struct FailingHandler {
    calls: AtomicUsize,
}

impl FailingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Leveled for FailingHandler {
    fn level(&self) -> Level {
        Level::NOTSET
    }
}

impl Handler for FailingHandler {
    fn handle(&self, _record: &LogRecord) -> Result<(), HandlerError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(HandlerError::Failed("induced failure".into()))
    }
}

/// Diagnostic sink that keeps every message.
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn write_diagnostic(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}

/// Record factory that counts calls and can be told to fail.
#[derive(Debug, Default)]
pub struct CountingRecordFactory {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingRecordFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose every call returns [`RecordError::Factory`].
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl RecordFactory for CountingRecordFactory {
    fn create_record(&self, request: RecordRequest<'_>) -> Result<LogRecord, RecordError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(RecordError::Factory("induced failure".into()));
        }
        DefaultRecordFactory.create_record(request)
    }
}
