use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const APP_DIR: &str = "tuncap";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub verbose: bool,
    /// Write logs here instead of stderr.
    pub log_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub output: OutputConfig,
}

/// Root config directory: ~/.config/tuncap/
#[must_use]
pub fn app_config_dir() -> PathBuf {
    xdg_config_home().join(APP_DIR)
}

/// ~/.config/tuncap/config.json
#[must_use]
pub fn config_path() -> PathBuf {
    app_config_dir().join("config.json")
}

fn xdg_config_home() -> PathBuf {
    resolve_config_home(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

// An empty XDG_CONFIG_HOME counts as unset.
fn resolve_config_home(xdg: Option<OsString>, home: Option<OsString>) -> PathBuf {
    xdg.filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

/// Load the config at `path`, falling back to defaults when it does not exist.
pub fn load_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let json = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&json)?;
    if matches!(config.general.log_file.as_deref(), Some(f) if f.trim().is_empty()) {
        return Err(AppError::Config(format!(
            "{}: general.log_file must not be empty",
            path.display()
        )));
    }
    Ok(config)
}

pub fn load() -> Result<AppConfig> {
    load_from(&config_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.output.format, OutputFormat::Text);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"output": {"format": "json"}}"#).unwrap();

        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert!(!cfg.general.verbose);
        assert_eq!(cfg.general.log_file, None);
    }

    #[test]
    fn full_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"general": {"verbose": true, "log_file": "/var/log/tuncap.log"},
                "output": {"format": "text"}}"#,
        )
        .unwrap();

        let cfg = load_from(&path).unwrap();
        assert!(cfg.general.verbose);
        assert_eq!(cfg.general.log_file.as_deref(), Some("/var/log/tuncap.log"));
        assert_eq!(cfg.output.format, OutputFormat::Text);
    }

    #[test]
    fn config_home_resolution_order() {
        assert_eq!(
            resolve_config_home(Some("/xdg".into()), Some("/home/u".into())),
            PathBuf::from("/xdg")
        );
        assert_eq!(
            resolve_config_home(Some("".into()), Some("/home/u".into())),
            PathBuf::from("/home/u/.config")
        );
        assert_eq!(resolve_config_home(None, None), PathBuf::from("/tmp"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_from(&path), Err(AppError::Json(_))));
    }

    #[test]
    fn empty_log_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"general": {"log_file": "  "}}"#).unwrap();

        assert!(matches!(load_from(&path), Err(AppError::Config(_))));
    }
}
