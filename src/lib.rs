//! Hierarchical named loggers.
//!
//! Loggers are identified by separator-delimited names (`app.db.pool`) and
//! arranged in a tree rooted at an unnamed root logger. Loggers may be
//! created in any order: a name seen only as the ancestor of another logger
//! is held by a placeholder until it is created itself, at which point the
//! waiting descendants are re-parented beneath it.
//!
//! A [`Registry`] owns one tree. [`Logger`] handles taken from it set levels,
//! attach [`Handler`]s and [`Filter`]s, and log. A record is delivered to the
//! handlers of its logger and then of each ancestor, stopping after the
//! first logger whose `propagate` flag is off.
//!
//! ```rust,ignore
//! let registry = Registry::new();
//! registry.root().add_handler(Arc::new(StreamHandler::stderr()));
//! let db = registry.get_logger("app.db");
//! db.set_level("INFO")?;
//! hive_info!(db, "connected to {}", host)?;
//! ```

mod bridge;
mod build_context;
pub mod config;
mod diagnostics;
mod error;
pub mod filters;
pub mod formatter;
pub mod handler;
pub mod handlers;
mod level;
#[cfg(feature = "log-compat")]
pub mod log_compat;
pub mod log_record;
mod logger;
mod logging_macros;
mod manager;
mod registry;
pub mod stream_handler;
#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;
#[cfg(feature = "tracing-compat")]
pub mod tracing_compat;

pub use build_context::BuildContext;
pub use config::{ConfigBuilder, ConfigError, LoggerConfigBuilder};
pub use diagnostics::{DiagnosticSink, NoHandlerPolicy, StderrSink};
pub use error::LogError;
pub use filters::{Filter, FilterBuilder, FilterError, Filterable, Filterer};
pub use formatter::{DefaultFormatter, Formatter, SharedFormatter};
pub use handler::{Handler, HandlerError, Leveled};
pub use handlers::{
    HandlerBuilder, NullHandler, NullHandlerBuilder, StreamHandlerBuilder, StreamTarget,
};
pub use level::{Level, LevelNames, LevelSpec};
pub use log_record::{
    DefaultRecordFactory, ExceptionInfo, LogRecord, RecordError, RecordFactory, RecordMetadata,
    RecordRequest, SourceLocation,
};
pub use logger::{Logger, ROOT_IDENTITY};
pub use manager::NodeId;
pub use registry::{Registry, RegistryBuilder};
pub use stream_handler::StreamHandler;
