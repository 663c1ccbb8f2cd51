//! Fixed-level shorthands for [`Logger::log`].
//!
//! Each method captures the caller's location like `log` does and takes a
//! message without positional arguments; use `log` directly for those.

use std::error::Error as StdError;

use crate::error::LogError;
use crate::level::Level;

use super::Logger;

impl Logger {
    #[track_caller]
    pub fn debug(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::DEBUG, message, &[], None)
    }

    #[track_caller]
    pub fn info(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::INFO, message, &[], None)
    }

    #[track_caller]
    pub fn warning(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::WARNING, message, &[], None)
    }

    #[track_caller]
    pub fn error(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::ERROR, message, &[], None)
    }

    #[track_caller]
    pub fn critical(&self, message: &str) -> Result<bool, LogError> {
        self.log(Level::CRITICAL, message, &[], None)
    }

    /// Log at `ERROR` with `err` and its source chain attached to the record.
    #[track_caller]
    pub fn exception(
        &self,
        message: &str,
        err: &(dyn StdError + 'static),
    ) -> Result<bool, LogError> {
        self.log(Level::ERROR, message, &[], Some(err))
    }
}
