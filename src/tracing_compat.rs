//! Bridge from `tracing` events into a logger hierarchy.
//!
//! [`HiveLayer`] is a `tracing_subscriber` layer. Each event is routed to the
//! logger named after its target, with `::` replaced by the registry's
//! separator. The `message` field becomes the record message; every other
//! field is stored in the record's key-value metadata.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::bridge::{is_own_target, normalise_target, register_trace_name};
use crate::level::Level;
use crate::log_record::SourceLocation;
use crate::registry::Registry;

/// Layer forwarding `tracing` events to a [`Registry`].
pub struct HiveLayer {
    registry: &'static Registry,
}

impl HiveLayer {
    /// Create a layer for `registry`, registering the `TRACE` level name.
    pub fn new(registry: &'static Registry) -> Self {
        register_trace_name(registry);
        Self { registry }
    }
}

/// Map a `tracing` level onto the hierarchy's numeric levels.
pub fn map_tracing_level(level: &tracing::Level) -> Level {
    match *level {
        tracing::Level::ERROR => Level::ERROR,
        tracing::Level::WARN => Level::WARNING,
        tracing::Level::INFO => Level::INFO,
        tracing::Level::DEBUG => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Visitor splitting an event into its message and remaining fields.
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.fields
                .insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.fields.insert(field.name().to_owned(), value.to_owned());
        }
    }
}

impl<S> Layer<S> for HiveLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }
        let name = normalise_target(metadata.target(), self.registry.separator());
        let logger = self.registry.get_logger(&name);
        let level = map_tracing_level(metadata.level());
        if !logger.is_enabled_for(level).unwrap_or(false) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let location = SourceLocation {
            module_path: metadata.module_path().map(ToOwned::to_owned),
            filename: metadata.file().unwrap_or_default().to_owned(),
            line_number: metadata.line().unwrap_or(0),
            column: 0,
        };
        if let Err(err) = logger.log_fields(level, &visitor.message, location, visitor.fields) {
            self.registry
                .report(&format!("failed to forward tracing event for {name:?}: {err}"));
        }
    }
}
