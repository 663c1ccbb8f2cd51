//! Error types surfaced by the logger hierarchy.

use thiserror::Error;

use crate::filters::FilterError;
use crate::handler::HandlerError;
use crate::log_record::RecordError;

/// Errors returned by registry and logger operations.
///
/// Collaborator failures (filters, handlers, the record factory) are wrapped
/// unchanged so callers of `log` can see exactly what went wrong.
#[derive(Debug, Error)]
pub enum LogError {
    /// A level name was not registered.
    #[error("invalid level: {0}")]
    InvalidLevel(String),
    /// The registry is a singleton and cannot be duplicated.
    #[error("the logger registry cannot be cloned")]
    CloneForbidden,
    /// The process-wide registry was already created.
    #[error("the global logger registry is already initialised")]
    AlreadyInitialised,
    /// Installing a bridge into another logging facade failed.
    #[error("failed to install logging bridge: {0}")]
    LoggerInstall(String),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error(transparent)]
    Record(#[from] RecordError),
}
