//! Record formatting used by the bundled stream handler.

use std::{fmt, sync::Arc};

use crate::log_record::LogRecord;

/// Trait for formatting log records into strings.
///
/// Implementors must be thread-safe (`Send + Sync`) so formatters can be
/// shared across handlers.
pub trait Formatter: Send + Sync {
    /// Format a log record into a string representation.
    fn format(&self, record: &LogRecord) -> String;
}

/// Shared formatter trait object used across handlers.
#[derive(Clone)]
pub struct SharedFormatter {
    inner: Arc<dyn Formatter>,
}

impl SharedFormatter {
    /// Create a shared formatter from an owned formatter implementation.
    pub fn new<F>(formatter: F) -> Self
    where
        F: Formatter + 'static,
    {
        Self {
            inner: Arc::new(formatter),
        }
    }

    /// Format a log record using the wrapped formatter instance.
    pub fn format(&self, record: &LogRecord) -> String {
        self.inner.format(record)
    }
}

impl fmt::Debug for SharedFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedFormatter(<dyn Formatter>)")
    }
}

/// Renders `name [LEVEL] message`, followed by one line per attached error.
#[derive(Copy, Clone, Debug)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let mut output = format!(
            "{} [{}] {}",
            record.logger,
            record.level_name,
            record.rendered_message()
        );
        if let Some(exc) = &record.exception {
            output.push_str("\nerror: ");
            output.push_str(&exc.message);
            for cause in &exc.causes {
                output.push_str("\ncaused by: ");
                output.push_str(cause);
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::log_record::ExceptionInfo;
    use rstest::rstest;
    use static_assertions::assert_impl_all;

    #[test]
    fn shared_formatter_is_send_sync() {
        assert_impl_all!(SharedFormatter: Send, Sync);
    }

    #[rstest]
    #[case("core", "INFO", "hello", "core [INFO] hello")]
    #[case("sys", "ERROR", "fail", "sys [ERROR] fail")]
    #[case("i18n", "INFO", "こんにちは世界", "i18n [INFO] こんにちは世界")]
    fn default_formatter_layout(
        #[case] name: &str,
        #[case] level: &str,
        #[case] message: &str,
        #[case] expected: &str,
    ) {
        let record = LogRecord::new(name, Level::INFO, level, message);
        assert_eq!(SharedFormatter::new(DefaultFormatter).format(&record), expected);
    }

    #[test]
    fn appends_error_chain() {
        let mut record = LogRecord::new("db", Level::ERROR, "ERROR", "query failed");
        record.exception = Some(ExceptionInfo {
            message: "timeout".into(),
            causes: vec!["socket closed".into()],
        });
        assert_eq!(
            DefaultFormatter.format(&record),
            "db [ERROR] query failed\nerror: timeout\ncaused by: socket closed"
        );
    }
}
