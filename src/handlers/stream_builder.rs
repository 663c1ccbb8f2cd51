//! Builder for [`StreamHandler`].
//!
//! Configures stream handlers writing to `stdout` or `stderr`. The default
//! target is `stderr`, mirroring the usual console handler.

use serde::Deserialize;

use super::{HandlerBuildError, HandlerBuilderTrait};
use crate::build_context::BuildContext;
use crate::level::LevelSpec;
use crate::stream_handler::StreamHandler;

/// Standard stream a [`StreamHandler`] writes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Builder for constructing [`StreamHandler`] instances.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StreamHandlerBuilder {
    #[serde(default)]
    target: StreamTarget,
    level: Option<LevelSpec>,
}

impl StreamHandlerBuilder {
    /// Create a builder targeting `stdout`.
    pub fn stdout() -> Self {
        Self {
            target: StreamTarget::Stdout,
            level: None,
        }
    }

    /// Create a builder targeting `stderr`.
    pub fn stderr() -> Self {
        Self {
            target: StreamTarget::Stderr,
            level: None,
        }
    }

    /// Set the handler's minimum level. Names resolve against the level
    /// table of the registry being configured.
    pub fn with_level(mut self, level: impl Into<LevelSpec>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn target(&self) -> StreamTarget {
        self.target
    }
}

impl HandlerBuilderTrait for StreamHandlerBuilder {
    type Handler = StreamHandler;

    fn build_inner_with(&self, ctx: &BuildContext) -> Result<Self::Handler, HandlerBuildError> {
        let handler = match self.target {
            StreamTarget::Stdout => StreamHandler::stdout(),
            StreamTarget::Stderr => StreamHandler::stderr(),
        };
        if let Some(spec) = &self.level {
            let level = ctx
                .resolve_level(spec)
                .map_err(|e| HandlerBuildError::InvalidConfig(e.to_string()))?;
            handler.set_level(level);
        }
        Ok(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Leveled;
    use crate::level::Level;

    #[test]
    fn applies_level() {
        let handler = StreamHandlerBuilder::stdout()
            .with_level("ERROR")
            .build_inner()
            .expect("valid level");
        assert_eq!(handler.level(), Level::ERROR);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(StreamHandlerBuilder::stderr().with_level("LOUD").build().is_err());
    }

    #[test]
    fn resolves_names_through_the_context() {
        let mut levels = crate::level::LevelNames::new();
        levels.add(Level::new(15), "VERBOSE");
        let ctx = BuildContext::new(levels, '.');
        let handler = StreamHandlerBuilder::stderr()
            .with_level("VERBOSE")
            .build_inner_with(&ctx)
            .expect("registered name");
        assert_eq!(handler.level(), Level::new(15));
        assert!(StreamHandlerBuilder::stderr().with_level("VERBOSE").build().is_err());
    }

    #[test]
    fn deserialises_with_default_target() {
        let builder: StreamHandlerBuilder =
            serde_json::from_str(r#"{"level": 30}"#).expect("valid json");
        assert_eq!(builder.target(), StreamTarget::Stderr);
    }
}
