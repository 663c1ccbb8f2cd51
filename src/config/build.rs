//! Construction and realisation of configuration.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use log::debug;

use crate::filters::Filter;
use crate::handler::Handler;
use crate::level::Level;
use crate::registry::Registry;

use super::types::{ConfigBuilder, ConfigError, LoggerConfigBuilder};

/// A logger configuration with every identifier and level resolved.
struct ResolvedLogger {
    name: String,
    handlers: Vec<Arc<dyn Handler>>,
    filters: Vec<Arc<dyn Filter>>,
    level: Option<Level>,
    propagate: Option<bool>,
}

impl ConfigBuilder {
    /// Validate the configuration and apply it to `registry`.
    ///
    /// Every handler, filter and level is resolved before any logger is
    /// touched, so a failing configuration leaves the registry unchanged.
    /// Level names and the name separator come from `registry`.
    pub fn build_and_init(&self, registry: &Registry) -> Result<(), ConfigError> {
        if self.version() != 1 {
            return Err(ConfigError::UnsupportedVersion(self.version()));
        }
        let Some(root_cfg) = self.root_logger() else {
            return Err(ConfigError::MissingRootLogger);
        };
        let ctx = registry.build_context();
        let built_handlers = Self::build_map(
            self.handler_builders(),
            |b| b.build_with(&ctx),
            |id, source| ConfigError::HandlerBuild { id, source },
        )?;
        let built_filters = Self::build_map(
            self.filter_builders(),
            |b| b.build_with(&ctx),
            |id, source| ConfigError::FilterBuild { id, source },
        )?;

        let targets = std::iter::once(("", root_cfg))
            .chain(self.logger_builders().iter().map(|(n, c)| (n.as_str(), c)));
        let mut resolved = Vec::with_capacity(self.logger_builders().len() + 1);
        for (name, cfg) in targets {
            resolved.push(self.resolve_logger(
                registry,
                name,
                cfg,
                &built_handlers,
                &built_filters,
            )?);
        }

        if self.disable_existing_loggers() {
            let mut keep_names: HashSet<String> =
                self.logger_builders().keys().cloned().collect();
            Self::extend_keep_names_with_ancestors(
                &mut keep_names,
                self.logger_builders().keys(),
                registry.separator(),
            );
            registry.disable_existing_loggers(&keep_names);
        }

        for item in resolved {
            Self::apply_logger_config(registry, item)?;
        }
        debug!(
            "applied configuration to root and {} logger(s)",
            self.logger_builders().len()
        );
        Ok(())
    }

    /// Include ancestors of each configured logger (e.g., `a.b.c` keeps `a.b`
    /// and `a`) in the keep set used by `disable_existing_loggers`.
    fn extend_keep_names_with_ancestors<'a>(
        keep_names: &mut HashSet<String>,
        names: impl Iterator<Item = &'a String>,
        separator: char,
    ) {
        for name in names {
            let mut cur = name.as_str();
            while let Some((parent, _)) = cur.rsplit_once(separator) {
                if parent.is_empty() {
                    break;
                }
                keep_names.insert(parent.to_owned());
                cur = parent;
            }
        }
    }

    fn build_map<B, O, E, F, G>(
        items: &BTreeMap<String, B>,
        mut build: F,
        wrap_err: G,
    ) -> Result<BTreeMap<String, O>, ConfigError>
    where
        F: FnMut(&B) -> Result<O, E>,
        G: Fn(String, E) -> ConfigError,
    {
        let mut built = BTreeMap::new();
        for (id, builder) in items {
            let obj = build(builder).map_err(|e| wrap_err(id.clone(), e))?;
            built.insert(id.clone(), obj);
        }
        Ok(built)
    }

    fn collect_items<T: ?Sized>(
        ids: &[String],
        pool: &BTreeMap<String, Arc<T>>,
        dup_err: impl FnOnce(Vec<String>) -> ConfigError,
    ) -> Result<Vec<Arc<T>>, ConfigError> {
        let mut seen = HashSet::new();
        let mut dup = Vec::new();
        let mut missing = Vec::new();
        let mut items = Vec::new();

        for id in ids {
            if !seen.insert(id.as_str()) {
                dup.push(id.clone());
                continue;
            }
            match pool.get(id) {
                Some(item) => items.push(Arc::clone(item)),
                None => missing.push(id.clone()),
            }
        }

        if !dup.is_empty() {
            return Err(dup_err(dup));
        }
        if !missing.is_empty() {
            return Err(ConfigError::UnknownIds(missing));
        }
        Ok(items)
    }

    fn resolve_logger(
        &self,
        registry: &Registry,
        name: &str,
        cfg: &LoggerConfigBuilder,
        handlers: &BTreeMap<String, Arc<dyn Handler>>,
        filters: &BTreeMap<String, Arc<dyn Filter>>,
    ) -> Result<ResolvedLogger, ConfigError> {
        let handlers =
            Self::collect_items(cfg.handler_ids(), handlers, ConfigError::DuplicateHandlerIds)?;
        let filters =
            Self::collect_items(cfg.filter_ids(), filters, ConfigError::DuplicateFilterIds)?;
        let level = cfg
            .level_opt()
            .or(self.default_level())
            .map(|spec| registry.resolve_level(spec.clone()))
            .transpose()
            .map_err(|source| ConfigError::Level {
                logger: name.to_owned(),
                source,
            })?;
        Ok(ResolvedLogger {
            name: name.to_owned(),
            handlers,
            filters,
            level,
            propagate: cfg.propagate_opt(),
        })
    }

    // Handlers and filters replace whatever the logger had before.
    fn apply_logger_config(registry: &Registry, item: ResolvedLogger) -> Result<(), ConfigError> {
        let ResolvedLogger {
            name,
            handlers,
            filters,
            level,
            propagate,
        } = item;
        let logger = registry.get_logger(&name);
        logger.clear_handlers();
        for handler in handlers {
            logger.add_handler(handler);
        }
        logger.clear_filters();
        for filter in filters {
            logger.add_filter(filter);
        }
        if let Some(level) = level {
            logger
                .set_level(level)
                .map_err(|source| ConfigError::Level { logger: name, source })?;
        }
        if let Some(propagate) = propagate {
            logger.set_propagate(propagate);
        }
        Ok(())
    }
}
