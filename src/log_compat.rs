//! Compatibility bridge for the Rust `log` crate.
//!
//! [`LogAdapter`] implements `log::Log` and forwards records emitted through
//! the `log` macros into a [`Registry`]. Targets such as `app::db` are
//! normalised to logger names by replacing `::` with the registry's
//! separator. Records whose target belongs to this crate are dropped so the
//! hierarchy's own diagnostics never feed back into it.

use log::{Metadata, Record};

use crate::bridge::{is_own_target, normalise_target, register_trace_name};
use crate::error::LogError;
use crate::level::Level;
use crate::log_record::SourceLocation;
use crate::registry::Registry;

/// Adapter implementing the Rust `log::Log` trait.
pub struct LogAdapter<'r> {
    registry: &'r Registry,
}

impl<'r> LogAdapter<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }
}

/// Map a `log` crate level onto the hierarchy's numeric levels.
pub fn map_log_level(level: log::Level) -> Level {
    match level {
        log::Level::Trace => Level::TRACE,
        log::Level::Debug => Level::DEBUG,
        log::Level::Info => Level::INFO,
        log::Level::Warn => Level::WARNING,
        log::Level::Error => Level::ERROR,
    }
}

impl log::Log for LogAdapter<'_> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        if is_own_target(metadata.target()) {
            return false;
        }
        let name = normalise_target(metadata.target(), self.registry.separator());
        self.registry
            .get_logger(&name)
            .is_enabled_for(map_log_level(metadata.level()))
            .unwrap_or(false)
    }

    fn log(&self, record: &Record<'_>) {
        if is_own_target(record.target()) {
            return;
        }
        let name = normalise_target(record.target(), self.registry.separator());
        let logger = self.registry.get_logger(&name);
        let location = SourceLocation {
            module_path: record.module_path().map(ToOwned::to_owned),
            filename: record.file().unwrap_or_default().to_owned(),
            line_number: record.line().unwrap_or(0),
            column: 0,
        };
        let message = record.args().to_string();
        if let Err(err) = logger.log_at(map_log_level(record.level()), &message, location) {
            self.registry
                .report(&format!("failed to forward log record for {name:?}: {err}"));
        }
    }

    fn flush(&self) {
        if let Err(err) = self.registry.flush_all() {
            self.registry.report(&format!("failed to flush handlers: {err}"));
        }
    }
}

/// Install an adapter for `registry` as the global `log` logger.
///
/// Registers the `TRACE` level name and raises the `log` max level to
/// `Trace` so filtering is left to the hierarchy. Fails with
/// [`LogError::LoggerInstall`] when another logger is already installed.
pub fn install(registry: &'static Registry) -> Result<(), LogError> {
    let adapter: &'static LogAdapter<'static> = Box::leak(Box::new(LogAdapter::new(registry)));
    log::set_logger(adapter).map_err(|err| LogError::LoggerInstall(err.to_string()))?;
    register_trace_name(registry);
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for the `log` crate bridge.

    use super::*;
    use crate::test_utils::{CollectingHandler, CollectingSink};
    use log::Log;
    use rstest::rstest;
    use std::sync::Arc;

    #[rstest]
    #[case(log::Level::Trace, Level::TRACE)]
    #[case(log::Level::Debug, Level::DEBUG)]
    #[case(log::Level::Info, Level::INFO)]
    #[case(log::Level::Warn, Level::WARNING)]
    #[case(log::Level::Error, Level::ERROR)]
    fn level_mapping_is_direct(#[case] level: log::Level, #[case] expected: Level) {
        assert_eq!(map_log_level(level), expected);
    }

    #[test]
    fn adapter_dispatches_records_to_target_logger() {
        let registry = Registry::new();
        let handler = Arc::new(CollectingHandler::new());
        registry.get_logger("bridge.test").add_handler(handler.clone());
        registry.root().set_level(Level::DEBUG).expect("valid level");

        let record = log::Record::builder()
            .args(format_args!("hello"))
            .level(log::Level::Info)
            .target("bridge::test")
            .module_path(Some("bridge::test"))
            .file(Some("lib.rs"))
            .line(Some(42))
            .build();
        LogAdapter::new(&registry).log(&record);

        let records = handler.collected();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.logger, "bridge.test");
        assert_eq!(rec.level_name, "INFO");
        assert_eq!(rec.message, "hello");
        assert_eq!(rec.metadata.location.module_path.as_deref(), Some("bridge::test"));
        assert_eq!(rec.metadata.location.filename, "lib.rs");
        assert_eq!(rec.metadata.location.line_number, 42);
    }

    #[test]
    fn log_respects_logger_threshold() {
        let registry = Registry::new();
        let logger = registry.get_logger("bridge.level");
        let handler = Arc::new(CollectingHandler::new());
        logger.add_handler(handler.clone());
        logger.set_level(Level::WARNING).expect("valid level");
        let adapter = LogAdapter::new(&registry);

        for (level, text) in [(log::Level::Info, "info"), (log::Level::Warn, "warn")] {
            adapter.log(
                &log::Record::builder()
                    .args(format_args!("{text}"))
                    .level(level)
                    .target("bridge.level")
                    .build(),
            );
        }
        assert!(!adapter.enabled(
            &log::Metadata::builder()
                .level(log::Level::Info)
                .target("bridge.level")
                .build()
        ));
        assert_eq!(handler.messages(), vec!["warn".to_owned()]);
    }

    #[test]
    fn own_records_are_ignored() {
        let sink = Arc::new(CollectingSink::new());
        let registry = Registry::builder().with_diagnostic_sink(sink.clone()).build();
        let handler = Arc::new(CollectingHandler::new());
        registry.root().add_handler(handler.clone());
        LogAdapter::new(&registry).log(
            &log::Record::builder()
                .args(format_args!("internal"))
                .level(log::Level::Error)
                .target(concat!(env!("CARGO_CRATE_NAME"), "::manager"))
                .build(),
        );
        assert!(handler.is_empty());
        assert!(sink.messages().is_empty());
    }
}
