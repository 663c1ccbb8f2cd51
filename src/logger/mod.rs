//! Logger nodes and the dispatcher that walks them.
//!
//! A [`LoggerNode`] holds the mutable state of one named logger. Its parent
//! link lives in the registry's manager, so every operation that needs the
//! ancestor chain goes through a [`Logger`] handle, which pairs the node
//! with the registry that owns it.
//!
//! Dispatch is synchronous: `log` checks the effective level, asks the
//! record factory for a record, runs the logger's own filters and then calls
//! handlers from the logger up towards root until a node with
//! `propagate == false` has been processed. Errors from filters, handlers and
//! the record factory are returned to the caller untouched.

mod convenience_methods;

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use delegate::delegate;
use parking_lot::RwLock;

use crate::diagnostics::no_handlers_message;
use crate::error::LogError;
use crate::filters::{Filter, Filterable, Filterer};
use crate::handler::{Handler, HandlerError, Leveled};
use crate::level::{Level, LevelSpec};
use crate::log_record::{LogRecord, RecordRequest, SourceLocation};
use crate::manager::NodeId;
use crate::registry::RegistryShared;

/// Identity used on records created by the root logger.
pub const ROOT_IDENTITY: &str = "root";

/// State of one named logger.
pub(crate) struct LoggerNode {
    id: NodeId,
    name: String,
    level: RwLock<Option<Level>>,
    propagate: AtomicBool,
    disabled: AtomicBool,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
    filters: Filterer,
}

impl LoggerNode {
    pub(crate) fn new(id: NodeId, name: String, level: Option<Level>) -> Self {
        Self {
            id,
            name,
            level: RwLock::new(level),
            propagate: AtomicBool::new(true),
            disabled: AtomicBool::new(false),
            handlers: RwLock::new(Vec::new()),
            filters: Filterer::new(),
        }
    }

    pub(crate) fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    pub(crate) fn level(&self) -> Option<Level> {
        *self.level.read()
    }

    /// Store an explicit level. `NOTSET` clears it, except on root, which
    /// must always carry a concrete level.
    fn store_level(&self, level: Level) {
        let stored = if level.is_notset() && !self.is_root() {
            None
        } else {
            Some(level)
        };
        *self.level.write() = stored;
    }

    pub(crate) fn propagate(&self) -> bool {
        self.propagate.load(Ordering::SeqCst)
    }

    pub(crate) fn set_propagate(&self, flag: bool) {
        self.propagate.store(flag, Ordering::SeqCst);
    }

    pub(crate) fn disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    pub(crate) fn set_disabled(&self, flag: bool) {
        self.disabled.store(flag, Ordering::SeqCst);
    }

    /// Attach a handler unless the same instance is already attached.
    pub(crate) fn add_handler(&self, handler: Arc<dyn Handler>) {
        let mut handlers = self.handlers.write();
        if !handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            handlers.push(handler);
        }
    }

    pub(crate) fn remove_handler(&self, handler: &Arc<dyn Handler>) -> bool {
        let mut handlers = self.handlers.write();
        if let Some(pos) = handlers.iter().position(|h| Arc::ptr_eq(h, handler)) {
            handlers.remove(pos);
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_handlers(&self) {
        self.handlers.write().clear();
    }

    /// Snapshot of the attached handlers in registration order.
    pub(crate) fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.handlers.read().clone()
    }

    pub(crate) fn has_own_handlers(&self) -> bool {
        !self.handlers.read().is_empty()
    }

    pub(crate) fn add_filter(&self, filter: Arc<dyn Filter>) {
        self.filters.add(filter);
    }

    pub(crate) fn remove_filter(&self, filter: &Arc<dyn Filter>) -> bool {
        self.filters.remove(filter)
    }

    pub(crate) fn clear_filters(&self) {
        self.filters.clear();
    }
}

impl Filterable for LoggerNode {
    fn filterer(&self) -> &Filterer {
        &self.filters
    }
}

impl fmt::Debug for LoggerNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("level", &self.level())
            .field("propagate", &self.propagate())
            .field("disabled", &self.disabled())
            .field("handlers", &self.handlers.read().len())
            .field("filters", &self.filters.len())
            .finish()
    }
}

/// Handle to a logger owned by a [`Registry`](crate::Registry).
///
/// Handles are cheap to clone. Two handles obtained for the same name refer
/// to the same logger; use [`Logger::same_as`] to compare them.
#[derive(Clone)]
pub struct Logger {
    node: Arc<LoggerNode>,
    registry: Arc<RegistryShared>,
}

impl Logger {
    pub(crate) fn new(node: Arc<LoggerNode>, registry: Arc<RegistryShared>) -> Self {
        Self { node, registry }
    }

    delegate! {
        to self.node {
            /// Arena index of this logger within its registry.
            pub fn id(&self) -> NodeId;
            /// Full dotted (or otherwise separated) name; empty for root.
            pub fn name(&self) -> &str;
            pub fn is_root(&self) -> bool;
            /// The explicitly set level, `None` when inherited.
            pub fn level(&self) -> Option<Level>;
            /// Whether records continue to ancestor handlers after this logger.
            pub fn propagate(&self) -> bool;
            pub fn set_propagate(&self, flag: bool);
            /// Whether this logger drops every record.
            pub fn disabled(&self) -> bool;
            pub fn set_disabled(&self, flag: bool);
            /// Attach a handler. Attaching the same instance twice is a no-op.
            pub fn add_handler(&self, handler: Arc<dyn Handler>);
            /// Detach a handler by pointer identity.
            pub fn remove_handler(&self, handler: &Arc<dyn Handler>) -> bool;
            pub fn clear_handlers(&self);
            /// Handlers attached directly to this logger, in registration order.
            pub fn handlers(&self) -> Vec<Arc<dyn Handler>>;
            pub fn add_filter(&self, filter: Arc<dyn Filter>);
            pub fn remove_filter(&self, filter: &Arc<dyn Filter>) -> bool;
            pub fn clear_filters(&self);
        }
    }

    /// Return `true` when both handles refer to the same logger.
    pub fn same_as(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Name written on records created by this logger.
    pub fn identity(&self) -> &str {
        if self.node.is_root() {
            ROOT_IDENTITY
        } else {
            self.node.name()
        }
    }

    /// Set the explicit level from a value or a registered name.
    ///
    /// `NOTSET` makes a non-root logger inherit again.
    pub fn set_level(&self, level: impl Into<LevelSpec>) -> Result<(), LogError> {
        let level = self.registry.resolve_level(&level.into())?;
        self.node.store_level(level);
        Ok(())
    }

    /// First explicit level found walking from this logger to root.
    pub fn effective_level(&self) -> Level {
        let manager = self.registry.manager.read();
        manager
            .ancestry(self.node.id())
            .find_map(|id| manager.node(id).level())
            .unwrap_or(Level::NOTSET)
    }

    /// Return whether a record at `level` would be created.
    pub fn is_enabled_for(&self, level: impl Into<LevelSpec>) -> Result<bool, LogError> {
        let level = self.registry.resolve_level(&level.into())?;
        Ok(self.enabled_for(level))
    }

    // A threshold of NOTSET or below suppresses nothing.
    fn enabled_for(&self, level: Level) -> bool {
        let threshold = self.registry.disable_threshold();
        if self.node.disabled() || (threshold > Level::NOTSET && level <= threshold) {
            return false;
        }
        level >= self.effective_level()
    }

    /// Log `message` at `level`, recording the caller's source location.
    ///
    /// Returns `Ok(false)` without touching the record factory when the
    /// level is not enabled, and `Ok(true)` once a record has been built and
    /// handed to [`handle`](Self::handle).
    #[track_caller]
    pub fn log(
        &self,
        level: impl Into<LevelSpec>,
        message: &str,
        args: &[&dyn fmt::Display],
        exception: Option<&(dyn StdError + 'static)>,
    ) -> Result<bool, LogError> {
        let location = SourceLocation::from(Location::caller());
        self.emit(level.into(), message, args, exception, location, BTreeMap::new())
    }

    /// Log `message` with an explicit source location.
    pub fn log_at(
        &self,
        level: impl Into<LevelSpec>,
        message: &str,
        location: SourceLocation,
    ) -> Result<bool, LogError> {
        self.emit(level.into(), message, &[], None, location, BTreeMap::new())
    }

    /// Log `message` with an explicit location and structured fields, which
    /// are added to the record's key-value metadata.
    pub fn log_fields(
        &self,
        level: impl Into<LevelSpec>,
        message: &str,
        location: SourceLocation,
        fields: BTreeMap<String, String>,
    ) -> Result<bool, LogError> {
        self.emit(level.into(), message, &[], None, location, fields)
    }

    fn emit(
        &self,
        level: LevelSpec,
        message: &str,
        args: &[&dyn fmt::Display],
        exception: Option<&(dyn StdError + 'static)>,
        location: SourceLocation,
        fields: BTreeMap<String, String>,
    ) -> Result<bool, LogError> {
        let level = self.registry.resolve_level(&level)?;
        if !self.enabled_for(level) {
            return Ok(false);
        }
        let mut record = self.registry.record_factory.create_record(RecordRequest {
            identity: self.identity(),
            level,
            level_name: self.registry.level_name(level),
            location,
            message,
            args,
            exception,
        })?;
        record.metadata.key_values.extend(fields);
        self.handle(&record)?;
        Ok(true)
    }

    /// Run this logger's filters and, if they pass, its handler walk.
    pub fn handle(&self, record: &LogRecord) -> Result<(), LogError> {
        if self.node.disabled() {
            return Ok(());
        }
        if self.filter(record)? {
            self.call_handlers(record)?;
        }
        Ok(())
    }

    /// Evaluate this logger's own filters against `record`.
    pub fn filter(&self, record: &LogRecord) -> Result<bool, LogError> {
        Ok(self.node.passes_filters(record)?)
    }

    /// Deliver `record` to every applicable handler from this logger up to
    /// root, stopping after the first logger that does not propagate.
    ///
    /// Returns the number of handlers found on the walk, including those
    /// whose level rejected the record. When none were found the registry's
    /// diagnostic sink receives a one-time warning.
    pub fn call_handlers(&self, record: &LogRecord) -> Result<usize, LogError> {
        let mut found = 0;
        for node in self.chain() {
            for handler in node.handlers() {
                found += 1;
                if record.levelno >= handler.level() {
                    handler.handle(record)?;
                }
            }
            if !node.propagate() {
                break;
            }
        }
        if found == 0 && self.registry.warnings.should_warn(self.node.id()) {
            self.registry
                .diagnostics
                .write_diagnostic(&no_handlers_message(self.identity()));
        }
        Ok(found)
    }

    /// Return whether a dispatch from this logger would reach any handler.
    pub fn has_handlers(&self) -> bool {
        for node in self.chain() {
            if node.has_own_handlers() {
                return true;
            }
            if !node.propagate() {
                break;
            }
        }
        false
    }

    /// Whether the "no handlers" diagnostic has been written for this logger.
    pub fn warned_no_handlers(&self) -> bool {
        self.registry.warnings.has_warned(self.node.id())
    }

    /// Flush every handler attached directly to this logger.
    pub fn flush(&self) -> Result<(), HandlerError> {
        for handler in self.node.handlers() {
            handler.flush()?;
        }
        Ok(())
    }

    /// Nearest real ancestor; `None` for root.
    pub fn parent(&self) -> Option<Logger> {
        let manager = self.registry.manager.read();
        manager
            .parent_of(self.node.id())
            .map(|id| Logger::new(Arc::clone(manager.node(id)), Arc::clone(&self.registry)))
    }

    /// Loggers whose parent is this logger, in creation order.
    pub fn children(&self) -> Vec<Logger> {
        let manager = self.registry.manager.read();
        manager
            .children_of(self.node.id())
            .into_iter()
            .map(|id| Logger::new(Arc::clone(manager.node(id)), Arc::clone(&self.registry)))
            .collect()
    }

    /// Return the descendant `suffix` levels below this logger.
    ///
    /// On root this is the same as asking the registry for `suffix`.
    pub fn get_child(&self, suffix: &str) -> Logger {
        let name = if self.node.is_root() {
            suffix.to_owned()
        } else {
            format!("{}{}{}", self.node.name(), self.registry.separator(), suffix)
        };
        self.registry.logger(&name)
    }

    /// Snapshot of this logger and its ancestors, nearest first.
    ///
    /// The manager lock is released before the snapshot is used so handlers
    /// may call back into the registry.
    fn chain(&self) -> Vec<Arc<LoggerNode>> {
        let manager = self.registry.manager.read();
        manager
            .ancestry(self.node.id())
            .map(|id| Arc::clone(manager.node(id)))
            .collect()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Logger").field(&self.identity()).finish()
    }
}
