//! Settings file: header text, demo data switch, invoice terms and the
//! "overview dismissed" flag. Entity data is never written here.

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid settings in {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub business_name: String,
    pub operator_name: String,
    pub overview_dismissed: bool,
    pub seed_demo_data: bool,
    pub invoice_terms_days: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            business_name: "J&S House Cleaners".to_string(),
            operator_name: "Sarah".to_string(),
            overview_dismissed: false,
            seed_demo_data: true,
            invoice_terms_days: 14,
        }
    }
}

/// Where settings live on disk.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The platform config directory, or `./settings.toml` when there is none.
    pub fn default_location() -> Self {
        match ProjectDirs::from("com", "cleaning-desk", "app") {
            Some(dirs) => Self::new(dirs.config_dir().join(SETTINGS_FILE)),
            None => Self::new(SETTINGS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Defaults when the file does not exist yet.
    pub fn load(&self) -> Result<AppSettings, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(AppSettings::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| SettingsError::Read {
            path: self.path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        let write_err = |source: io::Error| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        let toml_str = toml::to_string_pretty(settings)?;
        fs::write(&self.path, toml_str).map_err(write_err)?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested/settings.toml"));
        let settings = store.load().unwrap();
        assert_eq!(settings, AppSettings::default());
        assert!(!settings.overview_dismissed);
    }

    #[test]
    fn save_then_load_keeps_the_flag() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested/settings.toml"));
        let settings = AppSettings {
            overview_dismissed: true,
            invoice_terms_days: 30,
            ..AppSettings::default()
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "overview_dismissed = true\n").unwrap();

        let settings = SettingsStore::new(&path).load().unwrap();
        assert!(settings.overview_dismissed);
        assert_eq!(settings.business_name, "J&S House Cleaners");
        assert_eq!(settings.invoice_terms_days, 14);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "overview_dismissed = \"yes\"\n").unwrap();

        let err = SettingsStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn plain_paths_are_not_expanded() {
        assert_eq!(expand_home_dir("/tmp/settings.toml"), "/tmp/settings.toml");
    }
}
