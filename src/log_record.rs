//! Log record representation and the factory that builds records.
//!
//! Loggers never construct records themselves: once a call passes the level
//! check the logger hands a [`RecordRequest`] to the registry's
//! [`RecordFactory`]. [`DefaultRecordFactory`] captures the timestamp and
//! thread details from the calling context.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::thread::{self, ThreadId};
use std::time::SystemTime;

use thiserror::Error;

use crate::level::Level;

/// Errors raised by a [`RecordFactory`].
#[derive(Debug, Error)]
pub enum RecordError {
    /// The factory refused to build a record.
    #[error("record factory failed: {0}")]
    Factory(String),
}

/// Where a log call was made.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceLocation {
    /// Rust module path, when known (macros supply it).
    pub module_path: Option<String>,
    /// Source file name for the log call.
    pub filename: String,
    /// Line number in the source file.
    pub line_number: u32,
    /// Column in the source file, `0` when unknown.
    pub column: u32,
}

impl SourceLocation {
    /// Build a location from the values of `module_path!`, `file!` and `line!`.
    pub fn new(module_path: &str, filename: &str, line_number: u32) -> Self {
        Self {
            module_path: Some(module_path.to_owned()),
            filename: filename.to_owned(),
            line_number,
            column: 0,
        }
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self {
            module_path: None,
            filename: location.file().to_owned(),
            line_number: location.line(),
            column: location.column(),
        }
    }
}

/// Rendered details of an error attached to a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionInfo {
    /// `Display` output of the error itself.
    pub message: String,
    /// `Display` output of each error in the `source()` chain.
    pub causes: Vec<String>,
}

impl ExceptionInfo {
    /// Capture an error and its source chain.
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            causes,
        }
    }
}

/// Additional context associated with a log record.
#[derive(Clone, Debug)]
pub struct RecordMetadata {
    /// Call-site location.
    pub location: SourceLocation,
    /// Time the record was created.
    pub timestamp: SystemTime,
    /// ID of the thread that created the record.
    pub thread_id: ThreadId,
    /// Name of the thread that created the record (if any).
    pub thread_name: Option<String>,
    /// Structured key-value pairs attached to the record.
    pub key_values: BTreeMap<String, String>,
}

impl RecordMetadata {
    /// Capture timestamp and thread info from the current execution context.
    fn capture_runtime() -> (SystemTime, ThreadId, Option<String>) {
        let current = thread::current();
        (
            SystemTime::now(),
            current.id(),
            current.name().map(ToString::to_string),
        )
    }
}

impl Default for RecordMetadata {
    fn default() -> Self {
        let (timestamp, thread_id, thread_name) = Self::capture_runtime();
        Self {
            location: SourceLocation::default(),
            timestamp,
            thread_id,
            thread_name,
            key_values: BTreeMap::new(),
        }
    }
}

/// A single log event, produced by a [`RecordFactory`].
#[derive(Clone, Debug)]
pub struct LogRecord {
    /// Identity of the logger that created this record.
    pub logger: String,
    /// Numeric severity.
    pub levelno: Level,
    /// Display name of `levelno` at creation time.
    pub level_name: String,
    /// The message template as passed by the caller.
    pub message: String,
    /// Positional arguments, already rendered with `Display`.
    pub args: Vec<String>,
    /// Error attached via `exception`-style calls.
    pub exception: Option<ExceptionInfo>,
    /// Contextual metadata for the record.
    pub metadata: RecordMetadata,
}

impl LogRecord {
    /// Construct a record with fresh runtime metadata and no arguments.
    pub fn new(logger: &str, levelno: Level, level_name: &str, message: &str) -> Self {
        Self {
            logger: logger.to_owned(),
            levelno,
            level_name: level_name.to_owned(),
            message: message.to_owned(),
            args: Vec::new(),
            exception: None,
            metadata: RecordMetadata::default(),
        }
    }

    /// Return the message with each `{}` replaced by the next argument.
    ///
    /// Placeholders without a matching argument are left as written and
    /// surplus arguments are ignored.
    pub fn rendered_message(&self) -> String {
        if self.args.is_empty() {
            return self.message.clone();
        }
        let mut out = String::with_capacity(self.message.len());
        let mut args = self.args.iter();
        let mut rest = self.message.as_str();
        while let Some(pos) = rest.find("{}") {
            out.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => out.push_str(arg),
                None => out.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level_name, self.rendered_message())
    }
}

/// Everything a logger knows about a call that passed its level check.
pub struct RecordRequest<'a> {
    /// Identity the record is attributed to.
    pub identity: &'a str,
    pub level: Level,
    pub level_name: String,
    pub location: SourceLocation,
    pub message: &'a str,
    pub args: &'a [&'a dyn fmt::Display],
    pub exception: Option<&'a (dyn StdError + 'static)>,
}

/// Produces records for loggers.
pub trait RecordFactory: Send + Sync {
    /// Build a record from a log call.
    fn create_record(&self, request: RecordRequest<'_>) -> Result<LogRecord, RecordError>;
}

/// Factory used when a registry is not given a custom one.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRecordFactory;

impl RecordFactory for DefaultRecordFactory {
    fn create_record(&self, request: RecordRequest<'_>) -> Result<LogRecord, RecordError> {
        let metadata = RecordMetadata {
            location: request.location,
            ..RecordMetadata::default()
        };
        Ok(LogRecord {
            logger: request.identity.to_owned(),
            levelno: request.level,
            level_name: request.level_name,
            message: request.message.to_owned(),
            args: request.args.iter().map(ToString::to_string).collect(),
            exception: request.exception.map(ExceptionInfo::from_error),
            metadata,
        })
    }
}
