//! Declarative configuration for a logger hierarchy.
//!
//! A [`ConfigBuilder`] names handler and filter definitions by identifier and
//! lists, per logger, which of them to attach. It can be assembled in code or
//! deserialised from JSON, then applied to a [`Registry`](crate::Registry)
//! with [`ConfigBuilder::build_and_init`].

mod build;
mod types;

pub use types::{ConfigBuilder, ConfigError, LoggerConfigBuilder};
