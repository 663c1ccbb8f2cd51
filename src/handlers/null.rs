//! A handler that discards every record.
//!
//! Attaching one to a library's top-level logger marks the subtree as
//! handled, which suppresses the "no handlers" diagnostic.

use serde::Deserialize;

use crate::build_context::BuildContext;
use crate::handler::{Handler, HandlerError, Leveled};
use crate::level::Level;
use crate::log_record::LogRecord;

#[derive(Clone, Copy, Debug, Default)]
pub struct NullHandler;

impl Leveled for NullHandler {
    fn level(&self) -> Level {
        Level::NOTSET
    }
}

impl Handler for NullHandler {
    fn handle(&self, _record: &LogRecord) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Builder for [`NullHandler`]; it has no options.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NullHandlerBuilder {}

impl NullHandlerBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl super::HandlerBuilderTrait for NullHandlerBuilder {
    type Handler = NullHandler;

    fn build_inner_with(
        &self,
        _ctx: &BuildContext,
    ) -> Result<Self::Handler, super::HandlerBuildError> {
        Ok(NullHandler)
    }
}
