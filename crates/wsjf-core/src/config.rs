//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Default Cost of Delay weights a new session starts from
//! - Report options (title, layout, page size, file name prefix)
//!
//! Configuration is stored at `<config dir>/wsjf/config.toml`. Initiatives
//! are never written here; they live only in memory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::report::{Orientation, PageSize, ReportLayout};
use crate::scoring::WeightSet;

/// Report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub layout: ReportLayout,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default)]
    pub orientation: Orientation,
    /// Body text size in points; titles are drawn larger.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<config dir>/wsjf/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub weights: WeightSet,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_title() -> String {
    "Weighted Shortest Job First (WSJF) Prioritization Report".into()
}
fn default_font_size() -> f32 {
    9.0
}
fn default_file_prefix() -> String {
    "wsjf_prioritization_report".into()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            layout: ReportLayout::default(),
            page_size: PageSize::default(),
            orientation: Orientation::default(),
            font_size: default_font_size(),
            file_prefix: default_file_prefix(),
        }
    }
}

/// Returns `<config dir>/wsjf/`, creating it if needed.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join("wsjf");
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<f64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Reject weights outside `[0, inf)` and a non-positive font size.
    fn check_values(&self) -> Result<(), ConfigError> {
        if let Some((field, value)) = self.weights.first_invalid() {
            return Err(ConfigError::InvalidValue {
                key: format!("weights.{field}"),
                message: format!("weight must be a non-negative number, got {value}"),
            });
        }
        let size = self.report.font_size;
        if !(size.is_finite() && size > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "report.font_size".into(),
                message: format!("font size must be greater than 0, got {size}"),
            });
        }
        Ok(())
    }

    /// Default location of the config file.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from `path`, or return defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// holds a non-positive font size. Invalid weights are stored as `0.0`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let mut config: Self =
                    toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
                config.weights = config.weights.sanitized();
                config.check_values().map_err(|e| load_failed(e.to_string()))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(load_failed(e.to_string())),
        }
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The value must parse as the key's type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the result is a negative weight or a non-positive font size.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.check_values()?;
        *self = updated;
        Ok(())
    }
}
