//! Target handling shared by the `log` and `tracing` bridges.

use std::borrow::Cow;

use crate::level::Level;
use crate::registry::Registry;

/// Module-path root of this crate; records under it are never forwarded.
pub(crate) const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Turn a Rust module path such as `app::db` into a logger name.
pub(crate) fn normalise_target(target: &str, separator: char) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", separator.encode_utf8(&mut [0; 4])))
    } else {
        Cow::Borrowed(target)
    }
}

pub(crate) fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET
        || target
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Give [`Level::TRACE`] its display name unless one is registered.
pub(crate) fn register_trace_name(registry: &Registry) {
    if registry.level_value("TRACE").is_err() {
        registry.add_level_name(Level::TRACE, "TRACE");
    }
}
