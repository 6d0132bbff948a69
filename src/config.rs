//! Settings for the CLI and server.
//!
//! Precedence, lowest first: defaults, the JSON settings file, environment
//! variables, command-line flags. Environment variables:
//! - `COURSE_MANIFEST_POLICY` - `strict`, `pedantic` or `advisory`
//! - `COURSE_MANIFEST_PORT` - port for `serve`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::models::ValidationPolicy;

const APP_NAME: &str = "course-manifest";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// When a validation report rejects the load.
    pub policy: ValidationPolicy,
    /// Port for the HTTP API.
    pub port: u16,
    /// Warn about lesson content paths that don't end in `.md`/`.markdown`.
    pub require_markdown_extension: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::Strict,
            port: DEFAULT_PORT,
            require_markdown_extension: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the user's config directory when no
    /// path is given, then apply environment overrides.
    ///
    /// A missing default file yields defaults. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::read(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::read(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply `COURSE_MANIFEST_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("COURSE_MANIFEST_POLICY") {
            self.policy = ValidationPolicy::from_str(value.trim()).ok_or_else(|| {
                anyhow::anyhow!("COURSE_MANIFEST_POLICY: unknown policy {:?}", value)
            })?;
        }
        if let Some(value) = lookup("COURSE_MANIFEST_PORT") {
            self.port = value
                .trim()
                .parse()
                .with_context(|| format!("COURSE_MANIFEST_PORT: invalid port {:?}", value))?;
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.policy, ValidationPolicy::Strict);
        assert_eq!(settings.port, 3000);
        assert!(!settings.require_markdown_extension);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "policy": "advisory" }"#).unwrap();

        let settings = Settings::read(&path).unwrap();
        assert_eq!(settings.policy, ValidationPolicy::Advisory);
        assert_eq!(settings.port, 3000);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::read(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings
            .apply_overrides(env(&[
                ("COURSE_MANIFEST_POLICY", "pedantic"),
                ("COURSE_MANIFEST_PORT", "8080"),
            ]))
            .unwrap();
        assert_eq!(settings.policy, ValidationPolicy::Pedantic);
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn test_bad_env_override() {
        let mut settings = Settings::default();
        assert!(settings
            .apply_overrides(env(&[("COURSE_MANIFEST_POLICY", "lenient")]))
            .is_err());
        assert!(settings
            .apply_overrides(env(&[("COURSE_MANIFEST_PORT", "not-a-port")]))
            .is_err());
    }
}
