//! Filtering components for log records.
//!
//! Provides the [`Filter`] trait, the ordered [`Filterer`] chain used by
//! loggers and handlers, and concrete filter builders.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use thiserror::Error;

use crate::build_context::BuildContext;
use crate::log_record::LogRecord;

/// Trait implemented by all log filters.
///
/// Filters are `Send + Sync` so they can be shared across threads.
pub trait Filter: Send + Sync {
    /// Return `Ok(true)` if `record` should be processed.
    fn filter(&self, record: &LogRecord) -> Result<bool, FilterError>;
}

pub mod level_filter;
pub mod name_filter;

pub use level_filter::{LevelFilter, LevelFilterBuilder};
pub use name_filter::{NameFilter, NameFilterBuilder};

/// Errors raised by a filter while evaluating a record.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter failed: {0}")]
    Failed(String),
}

/// Errors that may occur while building a filter.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid filter configuration: {0}")]
    InvalidConfig(String),
}

/// Ordered set of filters combined with logical AND.
///
/// An empty chain accepts every record. Evaluation stops at the first
/// rejection or error.
#[derive(Default)]
pub struct Filterer {
    filters: RwLock<Vec<Arc<dyn Filter>>>,
}

impl Filterer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter unless the same instance is already present.
    pub fn add(&self, filter: Arc<dyn Filter>) {
        let mut filters = self.filters.write();
        if !filters.iter().any(|f| Arc::ptr_eq(f, &filter)) {
            filters.push(filter);
        }
    }

    /// Remove a filter by pointer identity.
    pub fn remove(&self, filter: &Arc<dyn Filter>) -> bool {
        let mut filters = self.filters.write();
        if let Some(pos) = filters.iter().position(|f| Arc::ptr_eq(f, filter)) {
            filters.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn clear(&self) {
        self.filters.write().clear();
    }

    pub fn len(&self) -> usize {
        self.filters.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.read().is_empty()
    }

    /// Evaluate the chain against `record`.
    pub fn filter(&self, record: &LogRecord) -> Result<bool, FilterError> {
        // Snapshot so filters may touch this chain without deadlocking.
        let filters = self.filters.read().clone();
        for f in &filters {
            if !f.filter(record)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Capability of objects that own a [`Filterer`].
pub trait Filterable {
    fn filterer(&self) -> &Filterer;

    /// Run the owned filter chain.
    fn passes_filters(&self, record: &LogRecord) -> Result<bool, FilterError> {
        self.filterer().filter(record)
    }
}

/// Trait implemented by all filter builders.
pub trait FilterBuilderTrait: Send + Sync {
    type Filter: Filter + 'static;

    /// Build the filter, resolving level names and the separator through
    /// `ctx`.
    fn build_inner_with(&self, ctx: &BuildContext) -> Result<Self::Filter, FilterBuildError>;

    fn build_inner(&self) -> Result<Self::Filter, FilterBuildError> {
        self.build_inner_with(&BuildContext::default())
    }

    fn build_with(&self, ctx: &BuildContext) -> Result<Arc<dyn Filter>, FilterBuildError> {
        Ok(Arc::new(self.build_inner_with(ctx)?))
    }

    fn build(&self) -> Result<Arc<dyn Filter>, FilterBuildError> {
        self.build_with(&BuildContext::default())
    }
}

/// Concrete filter builder variants.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum FilterBuilder {
    /// Build a [`LevelFilter`].
    Level(LevelFilterBuilder),
    /// Build a [`NameFilter`].
    Name(NameFilterBuilder),
}

impl FilterBuilder {
    /// Build with the default level table and `.` separator.
    pub fn build(&self) -> Result<Arc<dyn Filter>, FilterBuildError> {
        self.build_with(&BuildContext::default())
    }

    /// Build against a registry's level names and separator.
    pub fn build_with(&self, ctx: &BuildContext) -> Result<Arc<dyn Filter>, FilterBuildError> {
        match self {
            Self::Level(b) => <LevelFilterBuilder as FilterBuilderTrait>::build_with(b, ctx),
            Self::Name(b) => <NameFilterBuilder as FilterBuilderTrait>::build_with(b, ctx),
        }
    }
}

impl From<LevelFilterBuilder> for FilterBuilder {
    fn from(value: LevelFilterBuilder) -> Self {
        Self::Level(value)
    }
}

impl From<NameFilterBuilder> for FilterBuilder {
    fn from(value: NameFilterBuilder) -> Self {
        Self::Name(value)
    }
}
