//! Builder and implementation for a name-based filter.

use serde::Deserialize;

use crate::{
    build_context::BuildContext,
    filters::{Filter, FilterError},
    log_record::LogRecord,
};

/// Passes records from the named logger and its descendants.
///
/// An empty name passes everything.
#[derive(Debug)]
pub struct NameFilter {
    prefix: String,
    separator: char,
}

impl NameFilter {
    pub fn new(prefix: impl Into<String>, separator: char) -> Self {
        Self {
            prefix: prefix.into(),
            separator,
        }
    }
}

impl Filter for NameFilter {
    fn filter(&self, record: &LogRecord) -> Result<bool, FilterError> {
        if self.prefix.is_empty() {
            return Ok(true);
        }
        Ok(match record.logger.strip_prefix(&self.prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with(self.separator),
            None => false,
        })
    }
}

/// Builder for [`NameFilter`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NameFilterBuilder {
    prefix: Option<String>,
    separator: Option<char>,
}

impl NameFilterBuilder {
    /// Create a new `NameFilterBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the logger name whose subtree is accepted.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the name separator; defaults to the separator of the registry
    /// being configured.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = Some(separator);
        self
    }
}

impl super::FilterBuilderTrait for NameFilterBuilder {
    type Filter = NameFilter;

    fn build_inner_with(
        &self,
        ctx: &BuildContext,
    ) -> Result<Self::Filter, super::FilterBuildError> {
        let prefix = self
            .prefix
            .clone()
            .ok_or_else(|| super::FilterBuildError::InvalidConfig("prefix is required".into()))?;
        Ok(NameFilter::new(
            prefix,
            self.separator.unwrap_or(ctx.separator()),
        ))
    }
}
