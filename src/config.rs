//! Generator configuration loaded from `tasksynth.yaml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::emit::DEFAULT_INDENT;
use crate::error::{Error, Result};

pub const CONFIG_BASENAME: &str = "tasksynth.yaml";

pub const DEFAULT_RUNTIME_NAMESPACE: &str = "TaskSynth";
pub const DEFAULT_MARKER: &str = "Await";
pub const DEFAULT_OPT_IN_ATTRIBUTE: &str = "ExtendTpl";

const MAX_INDENT: usize = 16;

/// Settings shared by every generator in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Namespace holding the cancellable result types and support files.
    pub runtime_namespace: String,
    /// Postfix marker method name.
    pub marker_name: String,
    /// Attribute opting a declaration in to postfix synthesis.
    pub opt_in_attribute: String,
    pub cancellable: bool,
    pub postfix: bool,
    /// Emit the opt-in attribute and marker stubs alongside wrappers.
    pub emit_support_files: bool,
    pub indent_size: usize,
    /// File the settings were read from, if any.
    pub source: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_namespace: DEFAULT_RUNTIME_NAMESPACE.to_string(),
            marker_name: DEFAULT_MARKER.to_string(),
            opt_in_attribute: DEFAULT_OPT_IN_ATTRIBUTE.to_string(),
            cancellable: true,
            postfix: true,
            emit_support_files: true,
            indent_size: DEFAULT_INDENT,
            source: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse YAML text; missing keys keep their defaults.
    pub fn from_yaml(text: &str, path: Option<&Path>) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(text)
            .map_err(|err| Error::config(path.map(Path::to_path_buf), err.to_string()))?;
        let config = Self::from_raw(raw, path.map(Path::to_path_buf));
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| Error::config(Some(path.to_path_buf()), err.to_string()))?;
        Self::from_yaml(&text, Some(path))
    }

    /// Search `start` and its ancestors for `tasksynth.yaml`.
    ///
    /// Returns `Ok(None)` when no configuration file was found.
    pub fn discover(start: &Path) -> Result<Option<Self>> {
        let mut current = if start.is_file() {
            start.parent().map(Path::to_path_buf)
        } else {
            Some(start.to_path_buf())
        };
        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_BASENAME);
            if candidate.is_file() {
                tracing::debug!(
                    target: "pipeline",
                    stage = "config.discover",
                    path = %candidate.display(),
                    "found generator configuration"
                );
                return Self::load(&candidate).map(Some);
            }
            current = dir.parent().map(Path::to_path_buf);
        }
        Ok(None)
    }

    fn from_raw(raw: RawConfig, source: Option<PathBuf>) -> Self {
        let mut config = Self {
            source,
            ..Self::default()
        };
        if let Some(namespace) = raw.runtime_namespace {
            config.runtime_namespace = namespace.trim().to_string();
        }
        if let Some(enabled) = raw.features.cancellable {
            config.cancellable = enabled;
        }
        if let Some(enabled) = raw.features.postfix {
            config.postfix = enabled;
        }
        if let Some(marker) = raw.postfix.marker {
            config.marker_name = marker.trim().to_string();
        }
        if let Some(attribute) = raw.postfix.opt_in_attribute {
            config.opt_in_attribute = attribute.trim().to_string();
        }
        if let Some(emit) = raw.postfix.emit_support_files {
            config.emit_support_files = emit;
        }
        if let Some(indent) = raw.emit.indent {
            config.indent_size = indent.clamp(1, MAX_INDENT);
        }
        config
    }

    /// Reject names that cannot appear in generated source.
    pub fn validate(&self) -> Result<()> {
        if !self.runtime_namespace.is_empty()
            && !self.runtime_namespace.split('.').all(is_identifier)
        {
            return Err(self.invalid(format!(
                "runtime namespace `{}` is not a dotted identifier",
                self.runtime_namespace
            )));
        }
        if !is_identifier(&self.marker_name) {
            return Err(self.invalid(format!(
                "marker `{}` is not an identifier",
                self.marker_name
            )));
        }
        if !is_identifier(&self.opt_in_attribute) {
            return Err(self.invalid(format!(
                "opt-in attribute `{}` is not an identifier",
                self.opt_in_attribute
            )));
        }
        Ok(())
    }

    fn invalid(&self, message: String) -> Error {
        Error::config(self.source.clone(), message)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|ch| ch == '_' || ch.is_alphanumeric())
        }
        _ => false,
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    runtime_namespace: Option<String>,
    #[serde(default)]
    features: RawFeaturesSection,
    #[serde(default)]
    postfix: RawPostfixSection,
    #[serde(default)]
    emit: RawEmitSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawFeaturesSection {
    #[serde(default)]
    cancellable: Option<bool>,
    #[serde(default)]
    postfix: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawPostfixSection {
    #[serde(default)]
    marker: Option<String>,
    #[serde(default)]
    opt_in_attribute: Option<String>,
    #[serde(default)]
    emit_support_files: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawEmitSection {
    #[serde(default)]
    indent: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_document_keeps_defaults() {
        let config = GeneratorConfig::from_yaml("{}", None).expect("config");
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let yaml = "
runtime_namespace: Acme.Runtime
features:
  postfix: false
postfix:
  marker: Then
  emit_support_files: false
emit:
  indent: 40
";
        let config = GeneratorConfig::from_yaml(yaml, None).expect("config");
        assert_eq!(config.runtime_namespace, "Acme.Runtime");
        assert!(config.cancellable);
        assert!(!config.postfix);
        assert_eq!(config.marker_name, "Then");
        assert_eq!(config.opt_in_attribute, DEFAULT_OPT_IN_ATTRIBUTE);
        assert!(!config.emit_support_files);
        assert_eq!(config.indent_size, MAX_INDENT);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let err = GeneratorConfig::from_yaml("postfix:\n  marker: \"9lives\"\n", None)
            .expect_err("invalid marker");
        assert!(err.to_string().contains("marker `9lives`"));

        let err = GeneratorConfig::from_yaml("runtime_namespace: \"A..B\"\n", None)
            .expect_err("invalid namespace");
        assert!(matches!(err, Error::Config { .. }));

        let err = GeneratorConfig::from_yaml("unknown: 1\n", None).expect_err("unknown key");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn discover_walks_up_to_config_file() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).expect("mkdir");
        assert!(GeneratorConfig::discover(&nested).expect("discover").is_none());

        let path = dir.path().join(CONFIG_BASENAME);
        fs::write(&path, "runtime_namespace: Found\n").expect("write config");
        let config = GeneratorConfig::discover(&nested)
            .expect("discover")
            .expect("config present");
        assert_eq!(config.runtime_namespace, "Found");
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }
}
