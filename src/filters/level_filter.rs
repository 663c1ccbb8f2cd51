//! Builder and implementation for a level-based filter.

use serde::Deserialize;

use crate::{
    build_context::BuildContext,
    filters::{Filter, FilterError},
    level::{Level, LevelSpec},
    log_record::LogRecord,
};

/// Passes records whose level is at most `max_level`.
#[derive(Debug)]
pub struct LevelFilter {
    max_level: Level,
}

impl LevelFilter {
    pub fn new(max_level: Level) -> Self {
        Self { max_level }
    }
}

impl Filter for LevelFilter {
    fn filter(&self, record: &LogRecord) -> Result<bool, FilterError> {
        Ok(record.levelno <= self.max_level)
    }
}

/// Builder for [`LevelFilter`].
///
/// Level names resolve against the registry being configured.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LevelFilterBuilder {
    max_level: Option<LevelSpec>,
}

impl LevelFilterBuilder {
    /// Create a new `LevelFilterBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum level allowed.
    pub fn with_max_level(mut self, level: impl Into<LevelSpec>) -> Self {
        self.max_level = Some(level.into());
        self
    }
}

impl super::FilterBuilderTrait for LevelFilterBuilder {
    type Filter = LevelFilter;

    fn build_inner_with(
        &self,
        ctx: &BuildContext,
    ) -> Result<Self::Filter, super::FilterBuildError> {
        let spec = self.max_level.as_ref().ok_or_else(|| {
            super::FilterBuildError::InvalidConfig("max_level is required".into())
        })?;
        let level = ctx
            .resolve_level(spec)
            .map_err(|e| super::FilterBuildError::InvalidConfig(e.to_string()))?;
        Ok(LevelFilter::new(level))
    }
}
