//! Helpers shared by unit tests, integration tests and benches.
//!
//! Compiled for unit tests and, through the `test-util` feature, for
//! anything outside the crate that needs to observe dispatch.

pub mod collecting_handler;

pub use collecting_handler::{
    CollectingHandler, CollectingSink, CountingRecordFactory, FailingHandler, Journal,
};
