//! Persisted settings and per-card data records
//!
//! Stores the global settings record and the last acquired data per card as
//! plain JSON files in an XDG-compliant config directory
//! (`~/.config/oneview/` on Linux). A missing or unreadable record yields
//! built-in defaults so a fresh install works without any setup.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::model::{GlobalSettings, ViewerData};

/// File name of the global settings record
const SETTINGS_FILE: &str = "settings.json";

/// Reads and writes the persisted dashboard records
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Directory where record files are stored
    dir: PathBuf,
}

impl SettingsStore {
    /// Creates a store using the XDG-compliant config directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home
    /// directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "oneview")?;
        Some(Self {
            dir: project_dirs.config_dir().to_path_buf(),
        })
    }

    /// Creates a store with a custom directory
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Loads the global settings record
    ///
    /// An absent or corrupt record yields the built-in defaults: first
    /// enumerated relay selected, proxying enabled.
    pub fn load_settings(&self) -> GlobalSettings {
        let Ok(content) = fs::read_to_string(self.path(SETTINGS_FILE)) else {
            return GlobalSettings::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Saves the global settings record
    pub fn save_settings(&self, settings: &GlobalSettings) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(self.path(SETTINGS_FILE), json)
    }

    /// Loads the persisted data record for one card
    pub fn load_viewer_data(&self, id: &str) -> Option<ViewerData> {
        let content = fs::read_to_string(self.path(&data_file(id))).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves the data record for one card, overwriting any previous record
    pub fn save_viewer_data(&self, data: &ViewerData) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(self.path(&data_file(&data.id)), json)
    }
}

/// File name of the data record for the given card id
fn data_file(id: &str) -> String {
    format!("data-{}.json", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (SettingsStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SettingsStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_missing_settings_record_yields_defaults() {
        let (store, _temp_dir) = create_test_store();
        let settings = store.load_settings();
        assert!(settings.cors_proxy.enabled);
        assert_eq!(settings.cors_proxy.selected_proxy_index, 0);
    }

    #[test]
    fn test_settings_roundtrip() {
        let (store, _temp_dir) = create_test_store();
        let mut settings = GlobalSettings::default();
        settings.cors_proxy.selected_proxy_index = -1;
        settings.cors_proxy.custom_proxy_template = "https://mine.test/{url}".to_string();
        settings.cors_proxy.enabled = false;

        store.save_settings(&settings).expect("Save should succeed");
        let loaded = store.load_settings();

        assert_eq!(loaded.cors_proxy.selected_proxy_index, -1);
        assert_eq!(
            loaded.cors_proxy.custom_proxy_template,
            "https://mine.test/{url}"
        );
        assert!(!loaded.cors_proxy.enabled);
    }

    #[test]
    fn test_settings_record_uses_camel_case_format() {
        let (store, temp_dir) = create_test_store();
        store
            .save_settings(&GlobalSettings::default())
            .expect("Save should succeed");

        let content = fs::read_to_string(temp_dir.path().join(SETTINGS_FILE))
            .expect("Settings file should exist");
        assert!(content.contains("\"corsProxy\""));
        assert!(content.contains("\"selectedProxyIndex\""));
        assert!(content.contains("\"customProxyTemplate\""));
    }

    #[test]
    fn test_corrupt_settings_record_yields_defaults() {
        let (store, temp_dir) = create_test_store();
        fs::create_dir_all(temp_dir.path()).expect("dir");
        fs::write(temp_dir.path().join(SETTINGS_FILE), "{ not json")
            .expect("Write should succeed");

        let settings = store.load_settings();
        assert!(settings.cors_proxy.enabled);
    }

    #[test]
    fn test_viewer_data_roundtrip() {
        let (store, _temp_dir) = create_test_store();
        let data = ViewerData::success("card-7", vec!["1".to_string()], json!({"a": 1}));

        store.save_viewer_data(&data).expect("Save should succeed");
        let loaded = store.load_viewer_data("card-7").expect("Record should exist");

        assert_eq!(loaded.id, "card-7");
        assert_eq!(loaded.value, Some(vec!["1".to_string()]));
        assert_eq!(loaded.raw_data, Some(json!({"a": 1})));
    }

    #[test]
    fn test_missing_viewer_data_is_none() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.load_viewer_data("nope").is_none());
    }

    #[test]
    fn test_save_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("config");
        let store = SettingsStore::with_dir(nested.clone());

        store
            .save_settings(&GlobalSettings::default())
            .expect("Save should succeed");

        assert!(nested.join(SETTINGS_FILE).exists());
    }
}
