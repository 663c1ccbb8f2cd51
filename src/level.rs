//! Numeric logging levels and the bidirectional level-name table.
//!
//! Levels are plain integers so callers can register custom severities
//! between the defaults. [`LevelNames`] maps values to display names and
//! back; every registry owns one.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::error::LogError;

/// A logging severity. Higher values are more severe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i32);

impl Level {
    pub const NOTSET: Level = Level(0);
    pub const DEBUG: Level = Level(10);
    pub const INFO: Level = Level(20);
    pub const WARNING: Level = Level(30);
    pub const ERROR: Level = Level(40);
    pub const CRITICAL: Level = Level(50);
    /// Finer than `DEBUG`. Unnamed until a logging bridge registers it.
    pub const TRACE: Level = Level(5);

    /// Wrap a raw level value.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Return the raw level value.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Return `true` for [`Level::NOTSET`].
    pub const fn is_notset(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A level given either as a value or as a registered name.
///
/// Operations that accept "a level or its name" take `impl Into<LevelSpec>`
/// and resolve names through the owning registry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LevelSpec {
    Value(i32),
    Name(String),
}

impl From<Level> for LevelSpec {
    fn from(level: Level) -> Self {
        Self::Value(level.value())
    }
}

impl From<i32> for LevelSpec {
    fn from(value: i32) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for LevelSpec {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for LevelSpec {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Name(n) => f.write_str(n),
        }
    }
}

const DEFAULT_LEVELS: [(Level, &str); 6] = [
    (Level::NOTSET, "NOTSET"),
    (Level::DEBUG, "DEBUG"),
    (Level::INFO, "INFO"),
    (Level::WARNING, "WARNING"),
    (Level::ERROR, "ERROR"),
    (Level::CRITICAL, "CRITICAL"),
];

// Accepted on input only; they never become the display name of a value.
const LEVEL_ALIASES: [(&str, Level); 2] = [("WARN", Level::WARNING), ("FATAL", Level::CRITICAL)];

/// Bidirectional mapping between level values and names.
#[derive(Clone, Debug)]
pub struct LevelNames {
    by_value: BTreeMap<Level, String>,
    by_name: BTreeMap<String, Level>,
}

impl Default for LevelNames {
    fn default() -> Self {
        let mut names = Self {
            by_value: BTreeMap::new(),
            by_name: BTreeMap::new(),
        };
        for (level, name) in DEFAULT_LEVELS {
            names.add(level, name);
        }
        for (alias, level) in LEVEL_ALIASES {
            names.by_name.insert(alias.to_owned(), level);
        }
        names
    }
}

impl LevelNames {
    /// Create a table holding the default levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `name` with `level` in both directions.
    ///
    /// A value registered twice keeps the latest name; the earlier name
    /// still resolves to the value.
    pub fn add(&mut self, level: Level, name: impl Into<String>) {
        let name = name.into();
        self.by_name.insert(name.clone(), level);
        self.by_value.insert(level, name);
    }

    /// Return the display name of `level`, or `"Level <N>"` when unmapped.
    pub fn name_of(&self, level: Level) -> String {
        self.by_value
            .get(&level)
            .cloned()
            .unwrap_or_else(|| format!("Level {}", level.value()))
    }

    /// Resolve a registered name to its value.
    ///
    /// Exact matches win; otherwise the lookup is ASCII case-insensitive
    /// and, among names differing only in case, the first in byte order
    /// wins. Unknown names fail with [`LogError::InvalidLevel`].
    pub fn value_of(&self, name: &str) -> Result<Level, LogError> {
        if let Some(level) = self.by_name.get(name) {
            return Ok(*level);
        }
        self.by_name
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|(_, level)| *level)
            .ok_or_else(|| LogError::InvalidLevel(name.to_owned()))
    }

    /// Resolve a value-or-name to a concrete level.
    pub fn resolve(&self, spec: &LevelSpec) -> Result<Level, LogError> {
        match spec {
            LevelSpec::Value(v) => Ok(Level::new(*v)),
            LevelSpec::Name(n) => self.value_of(n),
        }
    }
}
