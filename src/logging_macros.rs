//! Logging macros that capture source location.
//!
//! Each macro records `module_path!()`, `file!()` and `line!()` at the call
//! site and forwards to [`Logger::log_at`](crate::Logger::log_at). They
//! return the same `Result<bool, LogError>` as the method.
//!
//! The macros are prefixed with `hive_` to avoid collision with the `log`
//! crate's identically named macros.
//!
//! # Examples
//!
//! ```rust,ignore
//! let logger = registry.get_logger("server");
//! hive_info!(logger, "listening on port {}", 8080)?;
//! hive_error!(logger, "connection failed")?;
//! ```

/// Log at `DEBUG`. Accepts a plain message or `format!`-style arguments.
#[macro_export]
macro_rules! hive_debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__hive_log_impl!($logger, $crate::Level::DEBUG, $($rest)+)
    };
}

/// Log at `INFO`. Accepts a plain message or `format!`-style arguments.
#[macro_export]
macro_rules! hive_info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__hive_log_impl!($logger, $crate::Level::INFO, $($rest)+)
    };
}

/// Log at `WARNING`. Accepts a plain message or `format!`-style arguments.
#[macro_export]
macro_rules! hive_warning {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__hive_log_impl!($logger, $crate::Level::WARNING, $($rest)+)
    };
}

/// Log at `ERROR`. Accepts a plain message or `format!`-style arguments.
#[macro_export]
macro_rules! hive_error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__hive_log_impl!($logger, $crate::Level::ERROR, $($rest)+)
    };
}

/// Log at `CRITICAL`. Accepts a plain message or `format!`-style arguments.
#[macro_export]
macro_rules! hive_critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::__hive_log_impl!($logger, $crate::Level::CRITICAL, $($rest)+)
    };
}

/// Internal implementation macro; not part of the public API.
///
/// The first arm takes a ready message, the second `format!` arguments.
#[doc(hidden)]
#[macro_export]
macro_rules! __hive_log_impl {
    ($logger:expr, $level:expr, $message:expr) => {{
        let location = $crate::SourceLocation::new(
            ::std::module_path!(),
            ::std::file!(),
            ::std::line!(),
        );
        $logger.log_at($level, $message, location)
    }};
    ($logger:expr, $level:expr, $fmt:expr, $($arg:tt)+) => {{
        let location = $crate::SourceLocation::new(
            ::std::module_path!(),
            ::std::file!(),
            ::std::line!(),
        );
        $logger.log_at($level, &::std::format!($fmt, $($arg)+), location)
    }};
}

#[cfg(test)]
mod tests {
    //! Unit tests for the logging macros.

    use crate::level::Level;
    use crate::logger::Logger;
    use crate::registry::Registry;
    use crate::test_utils::CollectingHandler;
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    /// A DEBUG-level logger with a collecting handler attached.
    #[fixture]
    fn logger_with_handler() -> (Registry, Logger, Arc<CollectingHandler>) {
        let registry = Registry::new();
        let logger = registry.get_logger("macro.test");
        logger.set_level(Level::DEBUG).expect("valid level");
        let handler = Arc::new(CollectingHandler::new());
        logger.add_handler(handler.clone());
        (registry, logger, handler)
    }

    #[rstest]
    #[case::debug(Level::DEBUG, "DEBUG")]
    #[case::info(Level::INFO, "INFO")]
    #[case::warning(Level::WARNING, "WARNING")]
    #[case::error(Level::ERROR, "ERROR")]
    #[case::critical(Level::CRITICAL, "CRITICAL")]
    fn macro_dispatches_at_level(
        logger_with_handler: (Registry, Logger, Arc<CollectingHandler>),
        #[case] level: Level,
        #[case] expected_name: &str,
    ) {
        let (_registry, logger, handler) = logger_with_handler;
        let message = "macro message";
        let result = match level {
            Level::DEBUG => hive_debug!(logger, message),
            Level::INFO => hive_info!(logger, message),
            Level::WARNING => hive_warning!(logger, message),
            Level::ERROR => hive_error!(logger, message),
            _ => hive_critical!(logger, message),
        };
        assert!(result.expect("dispatch succeeds"));
        let records = handler.collected();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level_name, expected_name);
        assert_eq!(records[0].message, message);
    }

    #[rstest]
    fn macro_captures_source_location(
        logger_with_handler: (Registry, Logger, Arc<CollectingHandler>),
    ) {
        let (_registry, logger, handler) = logger_with_handler;
        hive_info!(logger, "located").expect("dispatch succeeds");

        let records = handler.collected();
        let location = &records[0].metadata.location;
        assert!(
            location.filename.contains("logging_macros.rs"),
            "filename should contain this file: got {:?}",
            location.filename
        );
        assert!(location.line_number > 0);
        assert!(
            location
                .module_path
                .as_deref()
                .is_some_and(|path| path.contains("logging_macros")),
            "module_path should contain this module: got {:?}",
            location.module_path
        );
    }

    #[rstest]
    fn format_args_are_interpolated(
        logger_with_handler: (Registry, Logger, Arc<CollectingHandler>),
    ) {
        let (_registry, logger, handler) = logger_with_handler;
        let port = 8080;
        hive_info!(logger, "listening on port {}", port).expect("dispatch succeeds");
        assert_eq!(handler.messages(), vec!["listening on port 8080".to_owned()]);
    }

    #[test]
    fn below_threshold_returns_false() {
        let registry = Registry::new();
        let logger = registry.get_logger("macro.quiet");
        let handler = Arc::new(CollectingHandler::new());
        logger.add_handler(handler.clone());

        let result = hive_debug!(logger, "should be filtered");
        assert!(!result.expect("no error"));
        assert!(handler.is_empty());
    }
}
