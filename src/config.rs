// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read from a YAML file named by `INKBOOK_CONFIG`, falling
//! back to `inkbook.yaml` in the working directory. Every field has a
//! default, so a missing or partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "INKBOOK_CONFIG";

/// Settings file used when `INKBOOK_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "inkbook.yaml";

/// Layout of the notebook dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory for local and session storage.
    pub data_dir: PathBuf,
    /// Quiet period before a canvas edit is saved.
    pub debounce_ms: u64,
    /// Width of notebook thumbnails on the dashboard.
    pub thumbnail_width: f32,
    /// Width of page thumbnails in the editor sidebar.
    pub page_thumbnail_width: f32,
    pub default_view: ViewMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("inkbook-data"),
            debounce_ms: 200,
            thumbnail_width: 240.0,
            page_thumbnail_width: 160.0,
            default_view: ViewMode::Grid,
        }
    }
}

impl AppConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn local_dir(&self) -> PathBuf {
        self.data_dir.join("local")
    }

    pub fn session_dir(&self) -> PathBuf {
        self.data_dir.join("session")
    }

    /// Read settings from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Load settings from the configured location, using defaults when the
    /// file is absent or unreadable.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inkbook.yaml");
        std::fs::write(&path, "debounce_ms: 500\ndefault_view: list\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.default_view, ViewMode::List);
        assert_eq!(config.thumbnail_width, 240.0);
        assert_eq!(config.local_dir(), PathBuf::from("inkbook-data/local"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inkbook.yaml");
        std::fs::write(&path, "debounce_ms: [nope").unwrap();

        assert!(AppConfig::from_file(&path).is_err());
        assert!(AppConfig::from_file(&dir.path().join("missing.yaml")).is_err());
    }
}
