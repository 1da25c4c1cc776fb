//! Logging options for the generator binary.
//!
//! Options come in layers: built-in defaults, then `TASKSYNTH_LOG_*`
//! variables, then command-line flags. Each layer is a [`LogSettings`] that
//! only carries the values it sets.

use std::env;
use std::fmt;
use std::str::FromStr;

pub const FORMAT_ENV: &str = "TASKSYNTH_LOG_FORMAT";
pub const LEVEL_ENV: &str = "TASKSYNTH_LOG_LEVEL";

/// Output format for pipeline log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Resolved to text before the subscriber is built.
    Auto,
    Text,
    Json,
}

/// Accepted spellings, canonical name first for each value.
const FORMAT_NAMES: &[(&str, LogFormat)] = &[
    ("auto", LogFormat::Auto),
    ("text", LogFormat::Text),
    ("plain", LogFormat::Text),
    ("json", LogFormat::Json),
];

/// Logging verbosity, ordered from quietest to noisiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

const LEVEL_NAMES: &[(&str, LogLevel)] = &[
    ("error", LogLevel::Error),
    ("err", LogLevel::Error),
    ("warn", LogLevel::Warn),
    ("warning", LogLevel::Warn),
    ("info", LogLevel::Info),
    ("debug", LogLevel::Debug),
    ("trace", LogLevel::Trace),
    ("verbose", LogLevel::Trace),
];

fn lookup<T: Copy>(table: &[(&str, T)], spec: &str) -> Option<T> {
    let spec = spec.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(spec))
        .map(|(_, value)| *value)
}

fn canonical_name<T: Copy + PartialEq>(table: &[(&'static str, T)], value: T) -> &'static str {
    table
        .iter()
        .find(|(_, candidate)| *candidate == value)
        .map_or("", |(name, _)| *name)
}

/// Canonical spellings, one per distinct value, in table order.
fn canonical_names<T: Copy + PartialEq>(table: &[(&'static str, T)]) -> Vec<&'static str> {
    let mut names = Vec::new();
    for (index, (name, value)) in table.iter().enumerate() {
        if !table[..index].iter().any(|(_, earlier)| earlier == value) {
            names.push(*name);
        }
    }
    names
}

impl LogFormat {
    pub fn parse(spec: &str) -> Option<Self> {
        lookup(FORMAT_NAMES, spec)
    }
}

impl LogLevel {
    pub fn parse(spec: &str) -> Option<Self> {
        lookup(LEVEL_NAMES, spec)
    }

    #[must_use]
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(canonical_name(FORMAT_NAMES, *self))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(canonical_name(LEVEL_NAMES, *self))
    }
}

/// A log format or level value nobody recognises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogValue {
    what: &'static str,
    value: String,
    supported: Vec<&'static str>,
}

impl fmt::Display for UnknownLogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid log {} '{}'; supported values: {}",
            self.what,
            self.value,
            self.supported.join(", ")
        )
    }
}

impl std::error::Error for UnknownLogValue {}

impl FromStr for LogFormat {
    type Err = UnknownLogValue;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        Self::parse(spec).ok_or_else(|| UnknownLogValue {
            what: "format",
            value: spec.to_string(),
            supported: canonical_names(FORMAT_NAMES),
        })
    }
}

impl FromStr for LogLevel {
    type Err = UnknownLogValue;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        Self::parse(spec).ok_or_else(|| UnknownLogValue {
            what: "level",
            value: spec.to_string(),
            supported: canonical_names(LEVEL_NAMES),
        })
    }
}

/// Fully resolved log configuration for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    pub format: LogFormat,
    pub level: LogLevel,
}

impl LogOptions {
    pub const DEFAULT: Self = Self {
        format: LogFormat::Auto,
        level: LogLevel::Warn,
    };

    /// Defaults with the environment layer applied. Unparseable values are
    /// ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::DEFAULT.layered(LogSettings::from_lookup(|name| {
            env::var_os(name).map(|value| value.to_string_lossy().into_owned())
        }))
    }

    /// Apply the values `layer` sets on top of `self`.
    #[must_use]
    pub fn layered(self, layer: LogSettings) -> Self {
        Self {
            format: layer.format.unwrap_or(self.format),
            level: layer.level.unwrap_or(self.level),
        }
    }

    /// Settle `Auto` to a concrete format.
    #[must_use]
    pub fn resolved(self) -> Self {
        match self.format {
            LogFormat::Auto => Self {
                format: LogFormat::Text,
                ..self
            },
            _ => self,
        }
    }
}

impl Default for LogOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One layer of logging overrides; `None` leaves the lower layer's value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub format: Option<LogFormat>,
    pub level: Option<LogLevel>,
}

impl LogSettings {
    /// Read the `TASKSYNTH_LOG_*` variables through `read`.
    pub fn from_lookup(read: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            format: read(FORMAT_ENV).as_deref().and_then(LogFormat::parse),
            level: read(LEVEL_ENV).as_deref().and_then(LogLevel::parse),
        }
    }

    pub fn apply_format(&mut self, value: LogFormat) {
        self.format = Some(value);
    }

    pub fn apply_level(&mut self, value: LogLevel) {
        self.level = Some(value);
    }

    /// Command-line layer over the environment layer over the defaults.
    #[must_use]
    pub fn merged_with_env(self) -> LogOptions {
        LogOptions::from_env().layered(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(format: Option<&str>, level: Option<&str>) -> LogSettings {
        LogSettings::from_lookup(|name| match name {
            FORMAT_ENV => format.map(str::to_string),
            LEVEL_ENV => level.map(str::to_string),
            _ => None,
        })
    }

    #[test]
    fn aliases_resolve_and_display_canonically() {
        assert_eq!(LogFormat::parse(" Plain "), Some(LogFormat::Text));
        assert_eq!(LogFormat::Text.to_string(), "text");
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert!(LogLevel::Debug > LogLevel::Info);
    }

    #[test]
    fn unknown_values_list_canonical_spellings() {
        let err = "yaml".parse::<LogFormat>().expect_err("unknown format");
        assert_eq!(
            err.to_string(),
            "invalid log format 'yaml'; supported values: auto, text, json"
        );
        let err = "loud".parse::<LogLevel>().expect_err("unknown level");
        assert_eq!(
            err.to_string(),
            "invalid log level 'loud'; supported values: error, warn, info, debug, trace"
        );
    }

    #[test]
    fn env_layer_ignores_garbage() {
        let options = LogOptions::DEFAULT.layered(vars(Some("json"), Some("nope")));
        assert_eq!(options.format, LogFormat::Json);
        assert_eq!(options.level, LogOptions::DEFAULT.level);
    }

    #[test]
    fn command_line_layer_wins_over_env() {
        let from_env = LogOptions::DEFAULT.layered(vars(Some("text"), Some("info")));
        let mut flags = LogSettings::default();
        flags.apply_format(LogFormat::Json);
        let merged = from_env.layered(flags);
        assert_eq!(merged.format, LogFormat::Json);
        assert_eq!(merged.level, LogLevel::Info);
        assert_eq!(merged.resolved(), merged);
        assert_eq!(LogOptions::DEFAULT.resolved().format, LogFormat::Text);
    }
}
