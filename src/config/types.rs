//! Type definitions and builder structs for hierarchy configuration.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::error::LogError;
use crate::filters::{FilterBuildError, FilterBuilder};
use crate::handlers::{HandlerBuildError, HandlerBuilder};
use crate::level::LevelSpec;

/// Errors that may occur while building or applying a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The provided configuration schema version is unsupported.
    #[error("unsupported configuration version: {0}")]
    UnsupportedVersion(u8),
    /// No root logger configuration was provided.
    #[error("missing root logger configuration")]
    MissingRootLogger,
    /// Loggers referenced handler or filter identifiers that were not defined.
    #[error("unknown ids: {0:?}")]
    UnknownIds(Vec<String>),
    /// A logger listed the same handler more than once.
    #[error("duplicate handler ids: {0:?}")]
    DuplicateHandlerIds(Vec<String>),
    /// A logger listed the same filter more than once.
    #[error("duplicate filter ids: {0:?}")]
    DuplicateFilterIds(Vec<String>),
    /// Building a filter failed.
    #[error("failed to build filter {id}: {source}")]
    FilterBuild {
        id: String,
        #[source]
        source: FilterBuildError,
    },
    /// Building a handler failed.
    #[error("failed to build handler {id}: {source}")]
    HandlerBuild {
        id: String,
        #[source]
        source: HandlerBuildError,
    },
    /// A configured level could not be resolved.
    #[error("invalid level for logger {logger:?}: {source}")]
    Level {
        logger: String,
        #[source]
        source: LogError,
    },
    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Builder for one logger's configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfigBuilder {
    pub(crate) level: Option<LevelSpec>,
    pub(crate) propagate: Option<bool>,
    pub(crate) filters: Vec<String>,
    pub(crate) handlers: Vec<String>,
}

impl LoggerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logger level, by value or registered name.
    pub fn with_level(mut self, level: impl Into<LevelSpec>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_propagate(mut self, propagate: bool) -> Self {
        self.propagate = Some(propagate);
        self
    }

    /// Set filters by identifier, replacing any existing filters.
    ///
    /// Order is kept; filters run in the order listed.
    pub fn with_filters<I, S>(mut self, filter_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = filter_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set handlers by identifier, replacing any existing handlers.
    ///
    /// Order is kept; handlers are called in the order listed.
    pub fn with_handlers<I, S>(mut self, handler_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handlers = handler_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn level_opt(&self) -> Option<&LevelSpec> {
        self.level.as_ref()
    }

    pub fn propagate_opt(&self) -> Option<bool> {
        self.propagate
    }

    pub fn filter_ids(&self) -> &[String] {
        &self.filters
    }

    pub fn handler_ids(&self) -> &[String] {
        &self.handlers
    }
}

fn default_version() -> u8 {
    1
}

/// Builder for the overall configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigBuilder {
    #[serde(default = "default_version")]
    pub(crate) version: u8,
    #[serde(default)]
    pub(crate) disable_existing_loggers: bool,
    #[serde(default)]
    pub(crate) default_level: Option<LevelSpec>,
    #[serde(default)]
    pub(crate) filters: BTreeMap<String, FilterBuilder>,
    /// Registered handler builders keyed by identifier.
    #[serde(default)]
    pub(crate) handlers: BTreeMap<String, HandlerBuilder>,
    #[serde(default)]
    pub(crate) loggers: BTreeMap<String, LoggerConfigBuilder>,
    #[serde(default, rename = "root")]
    pub(crate) root_logger: Option<LoggerConfigBuilder>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            version: default_version(),
            disable_existing_loggers: false,
            default_level: None,
            filters: BTreeMap::new(),
            handlers: BTreeMap::new(),
            loggers: BTreeMap::new(),
            root_logger: None,
        }
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON document.
    ///
    /// The document uses the field names of this builder, with the root
    /// logger under `"root"` and builders tagged by `"kind"`.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Set the schema version. Only version 1 is accepted.
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Disable loggers that exist when the configuration is applied but are
    /// not named by it.
    pub fn with_disable_existing_loggers(mut self, disable: bool) -> Self {
        self.disable_existing_loggers = disable;
        self
    }

    /// Level applied to configured loggers that do not set their own.
    pub fn with_default_level(mut self, level: impl Into<LevelSpec>) -> Self {
        self.default_level = Some(level.into());
        self
    }

    /// Adds a filter configuration by its unique ID, replacing any existing entry.
    pub fn with_filter(mut self, id: impl Into<String>, builder: impl Into<FilterBuilder>) -> Self {
        self.filters.insert(id.into(), builder.into());
        self
    }

    /// Add a handler builder by identifier, replacing any existing handler with the same id.
    pub fn with_handler<B>(mut self, id: impl Into<String>, builder: B) -> Self
    where
        B: Into<HandlerBuilder>,
    {
        self.handlers.insert(id.into(), builder.into());
        self
    }

    /// Add a logger by name, replacing any existing logger with the same name.
    pub fn with_logger(mut self, name: impl Into<String>, builder: LoggerConfigBuilder) -> Self {
        self.loggers.insert(name.into(), builder);
        self
    }

    /// Set the root logger configuration, replacing any previous configuration.
    pub fn with_root_logger(mut self, builder: LoggerConfigBuilder) -> Self {
        self.root_logger = Some(builder);
        self
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn disable_existing_loggers(&self) -> bool {
        self.disable_existing_loggers
    }

    pub fn default_level(&self) -> Option<&LevelSpec> {
        self.default_level.as_ref()
    }

    pub fn root_logger(&self) -> Option<&LoggerConfigBuilder> {
        self.root_logger.as_ref()
    }

    pub fn logger_builders(&self) -> &BTreeMap<String, LoggerConfigBuilder> {
        &self.loggers
    }

    pub fn handler_builders(&self) -> &BTreeMap<String, HandlerBuilder> {
        &self.handlers
    }

    pub fn filter_builders(&self) -> &BTreeMap<String, FilterBuilder> {
        &self.filters
    }
}
