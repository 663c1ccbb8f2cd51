//! Registry settings that handler and filter builders resolve against.

use crate::error::LogError;
use crate::level::{Level, LevelNames, LevelSpec};

pub(crate) const DEFAULT_SEPARATOR: char = '.';

/// Level names and separator of the registry a builder is building for.
///
/// Builders invoked outside a configuration use the default level table
/// and the `.` separator.
#[derive(Clone, Debug)]
pub struct BuildContext {
    levels: LevelNames,
    separator: char,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new(LevelNames::default(), DEFAULT_SEPARATOR)
    }
}

impl BuildContext {
    pub fn new(levels: LevelNames, separator: char) -> Self {
        Self { levels, separator }
    }

    pub fn levels(&self) -> &LevelNames {
        &self.levels
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Resolve a value-or-name against this context's level table.
    pub fn resolve_level(&self, spec: &LevelSpec) -> Result<Level, LogError> {
        self.levels.resolve(spec)
    }
}
