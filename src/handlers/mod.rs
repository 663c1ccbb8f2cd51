//! Bundled handlers and the builders that construct them.
//!
//! Each builder implements [`HandlerBuilderTrait`] and returns a shared
//! [`Handler`] ready for attachment to a logger. [`HandlerBuilder`] collects
//! the concrete builders so configurations can be cloned and deserialised.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::build_context::BuildContext;
use crate::handler::Handler;

pub mod null;
pub mod stream_builder;

pub use null::{NullHandler, NullHandlerBuilder};
pub use stream_builder::{StreamHandlerBuilder, StreamTarget};

/// Errors that may occur while building a handler.
#[derive(Debug, Error)]
pub enum HandlerBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid handler configuration: {0}")]
    InvalidConfig(String),
}

/// Trait implemented by all handler builders.
pub trait HandlerBuilderTrait: Send + Sync {
    type Handler: Handler + 'static;

    /// Build the handler, resolving level names through `ctx`.
    fn build_inner_with(&self, ctx: &BuildContext) -> Result<Self::Handler, HandlerBuildError>;

    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError> {
        self.build_inner_with(&BuildContext::default())
    }

    fn build_with(&self, ctx: &BuildContext) -> Result<Arc<dyn Handler>, HandlerBuildError> {
        Ok(Arc::new(self.build_inner_with(ctx)?))
    }

    fn build(&self) -> Result<Arc<dyn Handler>, HandlerBuildError> {
        self.build_with(&BuildContext::default())
    }
}

/// Concrete handler builder variants.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum HandlerBuilder {
    /// Build a [`StreamHandler`](crate::StreamHandler).
    Stream(StreamHandlerBuilder),
    /// Build a [`NullHandler`].
    Null(NullHandlerBuilder),
    /// Reuse an already constructed handler. Not available from serialised
    /// configurations.
    #[serde(skip)]
    Shared(SharedHandler),
}

/// A prebuilt handler carried through a configuration.
#[derive(Clone)]
pub struct SharedHandler(pub Arc<dyn Handler>);

impl fmt::Debug for SharedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedHandler(<dyn Handler>)")
    }
}

impl HandlerBuilder {
    /// Build against the default level table.
    pub fn build(&self) -> Result<Arc<dyn Handler>, HandlerBuildError> {
        self.build_with(&BuildContext::default())
    }

    /// Build against a registry's level names.
    pub fn build_with(&self, ctx: &BuildContext) -> Result<Arc<dyn Handler>, HandlerBuildError> {
        match self {
            Self::Stream(b) => <StreamHandlerBuilder as HandlerBuilderTrait>::build_with(b, ctx),
            Self::Null(b) => <NullHandlerBuilder as HandlerBuilderTrait>::build_with(b, ctx),
            Self::Shared(h) => Ok(Arc::clone(&h.0)),
        }
    }
}

impl From<StreamHandlerBuilder> for HandlerBuilder {
    fn from(value: StreamHandlerBuilder) -> Self {
        Self::Stream(value)
    }
}

impl From<NullHandlerBuilder> for HandlerBuilder {
    fn from(value: NullHandlerBuilder) -> Self {
        Self::Null(value)
    }
}

impl From<Arc<dyn Handler>> for HandlerBuilder {
    fn from(value: Arc<dyn Handler>) -> Self {
        Self::Shared(SharedHandler(value))
    }
}
