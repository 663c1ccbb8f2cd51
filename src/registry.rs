//! The registry: root logger, level names and the manager behind one lock.
//!
//! A [`Registry`] is an explicit context object. Applications normally build
//! one at start-up and pass it (or [`Logger`] handles taken from it) to the
//! code that logs. [`Registry::global`] provides a lazily created
//! process-wide instance for code that cannot be handed one.
//!
//! Manager access is serialised with a `parking_lot::RwLock`: creating a
//! logger takes the write lock, level checks and dispatch snapshots take the
//! read lock. Handlers run with no registry lock held. Dropping the last
//! handle to a registry tears it down; call [`Registry::flush_all`] first if
//! handlers buffer output.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use crate::build_context::{BuildContext, DEFAULT_SEPARATOR};
use crate::diagnostics::{DiagnosticSink, NoHandlerPolicy, NoHandlerWarnings, StderrSink};
use crate::error::LogError;
use crate::handler::HandlerError;
use crate::level::{Level, LevelNames, LevelSpec};
use crate::log_record::{DefaultRecordFactory, RecordFactory};
use crate::logger::Logger;
use crate::manager::Manager;

static GLOBAL: OnceCell<Registry> = OnceCell::new();

/// State shared by a registry and every logger handle taken from it.
pub(crate) struct RegistryShared {
    pub(crate) manager: RwLock<Manager>,
    levels: RwLock<LevelNames>,
    disable_threshold: AtomicI32,
    pub(crate) warnings: NoHandlerWarnings,
    pub(crate) record_factory: Arc<dyn RecordFactory>,
    pub(crate) diagnostics: Arc<dyn DiagnosticSink>,
}

impl RegistryShared {
    /// Return the logger called `name`, creating it on first use.
    pub(crate) fn logger(self: &Arc<Self>, name: &str) -> Logger {
        let existing = {
            let manager = self.manager.read();
            manager.lookup(name).map(|id| Arc::clone(manager.node(id)))
        };
        if let Some(node) = existing {
            return Logger::new(node, Arc::clone(self));
        }
        let node = {
            let mut manager = self.manager.write();
            let id = manager.get_or_create(name);
            Arc::clone(manager.node(id))
        };
        Logger::new(node, Arc::clone(self))
    }

    pub(crate) fn separator(&self) -> char {
        self.manager.read().separator()
    }

    pub(crate) fn resolve_level(&self, spec: &LevelSpec) -> Result<Level, LogError> {
        self.levels.read().resolve(spec)
    }

    pub(crate) fn level_name(&self, level: Level) -> String {
        self.levels.read().name_of(level)
    }

    pub(crate) fn disable_threshold(&self) -> Level {
        Level::new(self.disable_threshold.load(Ordering::Relaxed))
    }
}

/// Builder for [`Registry`].
pub struct RegistryBuilder {
    separator: char,
    root_level: Level,
    record_factory: Arc<dyn RecordFactory>,
    diagnostics: Arc<dyn DiagnosticSink>,
    no_handler_policy: NoHandlerPolicy,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            root_level: Level::WARNING,
            record_factory: Arc::new(DefaultRecordFactory),
            diagnostics: Arc::new(StderrSink),
            no_handler_policy: NoHandlerPolicy::default(),
        }
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character separating name segments. Defaults to `.`.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Set the root logger's initial level. Defaults to `WARNING`.
    pub fn with_root_level(mut self, level: Level) -> Self {
        self.root_level = level;
        self
    }

    pub fn with_record_factory(mut self, factory: Arc<dyn RecordFactory>) -> Self {
        self.record_factory = factory;
        self
    }

    /// Set where the "no handlers" warning is written. Defaults to stderr.
    pub fn with_diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn with_no_handler_policy(mut self, policy: NoHandlerPolicy) -> Self {
        self.no_handler_policy = policy;
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            shared: Arc::new(RegistryShared {
                manager: RwLock::new(Manager::new(self.separator, self.root_level)),
                levels: RwLock::new(LevelNames::default()),
                disable_threshold: AtomicI32::new(Level::NOTSET.value()),
                warnings: NoHandlerWarnings::new(self.no_handler_policy),
                record_factory: self.record_factory,
                diagnostics: self.diagnostics,
            }),
        }
    }
}

/// Owner of a logger hierarchy.
///
/// `Registry` does not implement `Clone`; share it by reference or hand out
/// [`Logger`] handles instead.
pub struct Registry {
    shared: Arc<RegistryShared>,
}

impl Default for Registry {
    fn default() -> Self {
        RegistryBuilder::default().build()
    }
}

impl Registry {
    /// Create a registry with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The process-wide registry, created with defaults on first use.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::default)
    }

    /// Install `registry` as the process-wide registry.
    ///
    /// Fails with [`LogError::AlreadyInitialised`] once a global registry
    /// exists, including one created implicitly by [`Registry::global`].
    pub fn init_global(registry: Registry) -> Result<&'static Registry, LogError> {
        let mut fresh = Some(registry);
        let installed = GLOBAL.get_or_init(|| fresh.take().unwrap_or_default());
        if fresh.is_some() {
            return Err(LogError::AlreadyInitialised);
        }
        Ok(installed)
    }

    /// Registries are singletons per hierarchy; duplication always fails.
    pub fn try_clone(&self) -> Result<Registry, LogError> {
        Err(LogError::CloneForbidden)
    }

    /// Return the logger called `name`, creating it (and placeholders for
    /// its missing ancestors) on first use. The empty name is root.
    pub fn get_logger(&self, name: &str) -> Logger {
        self.shared.logger(name)
    }

    pub fn root(&self) -> Logger {
        self.shared.logger("")
    }

    /// Resolve the logger responsible for `namespace`/`class`/`method`.
    ///
    /// The non-empty components are joined with the separator and trailing
    /// segments are stripped until an existing logger matches; root is the
    /// fallback. No logger is created.
    pub fn logger_for(&self, namespace: &str, class: &str, method: &str) -> Logger {
        let separator = self.separator().to_string();
        let identifier = [namespace, class, method]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(&separator);
        let node = {
            let manager = self.shared.manager.read();
            let id = manager.longest_prefix_match(&identifier);
            Arc::clone(manager.node(id))
        };
        Logger::new(node, Arc::clone(&self.shared))
    }

    pub fn separator(&self) -> char {
        self.shared.separator()
    }

    /// Register `name` for `level`, in both directions.
    pub fn add_level_name(&self, level: Level, name: impl Into<String>) {
        self.shared.levels.write().add(level, name);
    }

    /// Display name for `level`; `"Level <N>"` when unregistered.
    pub fn level_name(&self, level: Level) -> String {
        self.shared.level_name(level)
    }

    /// Value registered for `name`; unknown names fail with `InvalidLevel`.
    pub fn level_value(&self, name: &str) -> Result<Level, LogError> {
        self.shared.levels.read().value_of(name)
    }

    pub fn resolve_level(&self, level: impl Into<LevelSpec>) -> Result<Level, LogError> {
        self.shared.resolve_level(&level.into())
    }

    /// Snapshot of the level names and separator for handler and filter
    /// builders.
    pub fn build_context(&self) -> BuildContext {
        BuildContext::new(self.shared.levels.read().clone(), self.separator())
    }

    /// Suppress every record at or below `level`, across all loggers.
    ///
    /// `NOTSET` (the default) or any lower level lifts the suppression.
    pub fn disable(&self, level: impl Into<LevelSpec>) -> Result<(), LogError> {
        let level = self.shared.resolve_level(&level.into())?;
        self.shared
            .disable_threshold
            .store(level.value(), Ordering::Relaxed);
        Ok(())
    }

    pub fn disable_threshold(&self) -> Level {
        self.shared.disable_threshold()
    }

    /// Every real logger, root first, in creation order.
    pub fn loggers(&self) -> Vec<Logger> {
        let manager = self.shared.manager.read();
        manager
            .nodes()
            .map(|node| Logger::new(Arc::clone(node), Arc::clone(&self.shared)))
            .collect()
    }

    /// Names of every real logger except root, sorted.
    pub fn logger_names(&self) -> Vec<String> {
        self.shared.manager.read().names()
    }

    /// Whether a real logger called `name` exists. Placeholders do not count.
    pub fn has_logger(&self, name: &str) -> bool {
        self.shared.manager.read().lookup(name).is_some()
    }

    /// Whether `name` is currently held by a placeholder.
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.shared.manager.read().is_placeholder(name)
    }

    /// Disable every non-root logger whose name is not in `keep`, and
    /// re-enable those that are.
    pub fn disable_existing_loggers(&self, keep: &HashSet<String>) {
        let manager = self.shared.manager.read();
        for node in manager.nodes().filter(|node| !node.is_root()) {
            node.set_disabled(!keep.contains(node.name()));
        }
    }

    /// Write `message` to the registry's diagnostic sink.
    pub(crate) fn report(&self, message: &str) {
        self.shared.diagnostics.write_diagnostic(message);
    }

    /// Flush the handlers of every logger, returning the first failure.
    pub fn flush_all(&self) -> Result<(), HandlerError> {
        let mut first_err = None;
        for logger in self.loggers() {
            if let Err(err) = logger.flush() {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("separator", &self.separator())
            .field("loggers", &self.logger_names())
            .finish()
    }
}
