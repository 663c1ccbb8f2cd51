//! Diagnostic output for conditions that are reported but never raised.
//!
//! The only such condition in the dispatcher is a record that found no
//! handler anywhere on its path to the root.

use std::collections::HashSet;
use std::io::{self, Write};

use parking_lot::Mutex;
use serde::Deserialize;

use crate::manager::NodeId;

/// Destination for one-off diagnostic messages.
pub trait DiagnosticSink: Send + Sync {
    fn write_diagnostic(&self, message: &str);
}

/// Writes diagnostics to the process's standard error stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn write_diagnostic(&self, message: &str) {
        // Nothing sensible can be done if stderr itself is gone.
        let _ = writeln!(io::stderr(), "{message}");
    }
}

/// How often the "no handlers" diagnostic is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoHandlerPolicy {
    /// Once for each logger that dispatched without reaching a handler.
    #[default]
    OncePerLogger,
    /// Once for the whole registry.
    OncePerRegistry,
    /// Never.
    Silent,
}

/// Tracks which loggers have already produced the "no handlers" warning.
#[derive(Debug, Default)]
pub(crate) struct NoHandlerWarnings {
    policy: NoHandlerPolicy,
    warned: Mutex<HashSet<NodeId>>,
}

impl NoHandlerWarnings {
    pub(crate) fn new(policy: NoHandlerPolicy) -> Self {
        Self {
            policy,
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// Record a handler-less dispatch for `id`; return `true` when the
    /// warning should be written now.
    pub(crate) fn should_warn(&self, id: NodeId) -> bool {
        let mut warned = self.warned.lock();
        match self.policy {
            NoHandlerPolicy::Silent => false,
            NoHandlerPolicy::OncePerLogger => warned.insert(id),
            NoHandlerPolicy::OncePerRegistry => warned.is_empty() && warned.insert(id),
        }
    }

    pub(crate) fn has_warned(&self, id: NodeId) -> bool {
        self.warned.lock().contains(&id)
    }
}

/// Text of the "no handlers" diagnostic.
pub(crate) fn no_handlers_message(identity: &str) -> String {
    format!("No handlers could be found for logger \"{identity}\"")
}
