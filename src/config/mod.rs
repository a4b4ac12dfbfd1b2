//! Tool configuration
//!
//! Settings resolve in three layers:
//! 1. Built-in defaults
//! 2. Config file (`--config`, else `~/.config/chart-overrides/config.toml`)
//! 3. CLI flags (applied by the binary)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::Format;
use crate::logging::LogFormat;
use crate::provider::DEFAULT_HELM;

/// Config file name under the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Application directory under `$XDG_CONFIG_HOME` / `~/.config`
pub const CONFIG_DIR: &str = "chart-overrides";

/// Full tool configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub helm: HelmSettings,
    pub output: OutputSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelmSettings {
    /// Helm executable name or path (default: "helm")
    pub executable: String,
}

impl Default for HelmSettings {
    fn default() -> Self {
        Self {
            executable: DEFAULT_HELM.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Prefix YAML output with the provenance header (default: true)
    pub header: bool,

    /// Write an empty output file when nothing differs (default: true)
    pub write_empty: bool,

    /// Output format (default: yaml)
    pub format: Format,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            header: true,
            write_empty: true,
            format: Format::Yaml,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Log line format (default: human)
    pub format: LogFormat,

    /// EnvFilter directive (default: "info")
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            filter: "info".to_string(),
        }
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),
}

impl Config {
    /// Default config path, from `XDG_CONFIG_HOME` or `HOME`
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path, which must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the file layer.
    ///
    /// An explicit path must exist. Otherwise the default path is used when
    /// present, and built-in defaults when not. Returns the file that was
    /// read, if any.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                let config = Self::load(&path)?;
                Ok((config, Some(path)))
            }
            _ => Ok((Self::default(), None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.helm.executable, "helm");
        assert!(config.output.header);
        assert!(config.output.write_empty);
        assert_eq!(config.output.format, Format::Yaml);
        assert_eq!(config.log.format, LogFormat::Human);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(
            r#"
[helm]
executable = "/opt/helm/bin/helm"

[output]
write_empty = false
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.helm.executable, "/opt/helm/bin/helm");
        assert!(config.output.header);
        assert!(!config.output.write_empty);
        assert_eq!(config.output.format, Format::Json);
        assert_eq!(config.log, LogSettings::default());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_values_rejected() {
        assert!(matches!(
            Config::parse("[log]\nformat = \"xml\"\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::parse("[output]\ncolour = true\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[log]").unwrap();
        writeln!(temp, "format = \"json\"").unwrap();
        writeln!(temp, "filter = \"chart_overrides=debug\"").unwrap();

        let (config, source) = Config::resolve(Some(temp.path())).unwrap();
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.filter, "chart_overrides=debug");
        assert_eq!(source.as_deref(), Some(temp.path()));
    }

    #[test]
    fn test_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::resolve(Some(&missing)),
            Err(ConfigError::NotFound(_))
        ));
    }
}
