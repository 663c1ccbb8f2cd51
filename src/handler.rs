//! Handler capability traits.
//!
//! Loggers consult [`Leveled::level`] before calling [`Handler::handle`], so
//! a handler only sees records at or above its own threshold.

use std::io;

use thiserror::Error;

use crate::level::Level;
use crate::log_record::LogRecord;

/// Errors a handler may return from [`Handler::handle`].
///
/// They propagate unchanged to the caller of `log`.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("handler failed: {0}")]
    Failed(String),
}

/// Objects carrying a minimum level.
pub trait Leveled {
    fn level(&self) -> Level;
}

/// Trait implemented by all log handlers.
///
/// Handlers are invoked synchronously on the logging thread, in the order
/// they were attached.
pub trait Handler: Leveled + Send + Sync {
    /// Dispatch a log record for handling.
    fn handle(&self, record: &LogRecord) -> Result<(), HandlerError>;

    /// Flush any buffered output.
    fn flush(&self) -> Result<(), HandlerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Minimal;

    impl Leveled for Minimal {
        fn level(&self) -> Level {
            Level::INFO
        }
    }

    impl Handler for Minimal {
        fn handle(&self, _record: &LogRecord) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    #[test]
    fn handle_is_the_only_required_method() {
        let handler: &dyn Handler = &Minimal;
        let record = LogRecord::new("core", Level::INFO, "INFO", "msg");
        assert!(handler.handle(&record).is_ok());
        assert!(handler.flush().is_ok());
        assert_eq!(handler.level(), Level::INFO);
    }
}
