//! Persisted user preferences
//!
//! A [`PreferenceStore`] is created once at startup and handed to the UI.
//! Mutations mark it dirty; the UI calls [`PreferenceStore::save_if_dirty`]
//! after every change it cares about. The on-disk format is a JSON object
//! using the key names of the web version:
//!
//! ```json
//! {
//!   "theme": "dark",
//!   "starredExperiments": ["exp-001"],
//!   "vlab-filters": { "institutes": ["iitb"], "disciplines": [] },
//!   "vlab-active-tab": "popular"
//! }
//! ```

use crate::catalog::{CatalogTab, ExperimentFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: ThemeMode,
    #[serde(rename = "starredExperiments")]
    pub starred_experiments: BTreeSet<String>,
    #[serde(rename = "vlab-filters")]
    pub filters: ExperimentFilter,
    #[serde(rename = "vlab-active-tab")]
    pub active_tab: CatalogTab,
}

#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    prefs: Preferences,
    dirty: bool,
}

impl PreferenceStore {
    /// Load from `path`. A missing file gives defaults; an unreadable or
    /// corrupt one is logged and replaced by defaults on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(prefs) => prefs,
                Err(err) => {
                    tracing::warn!("Failed to parse preferences at {:?}: {}", path, err);
                    Preferences::default()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Preferences::default(),
            Err(err) => {
                tracing::warn!("Failed to read preferences at {:?}: {}", path, err);
                Preferences::default()
            }
        };
        PreferenceStore {
            path,
            prefs,
            dirty: false,
        }
    }

    /// `<data dir>/vlab/preferences.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("vlab").join("preferences.json"))
    }

    pub fn save(&mut self) -> Result<(), PrefsError> {
        let json = serde_json::to_string_pretty(&self.prefs)?;
        let write_err = |source| PrefsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, json).map_err(write_err)?;
        tracing::debug!("saved preferences to {:?}", self.path);
        self.dirty = false;
        Ok(())
    }

    pub fn save_if_dirty(&mut self) -> Result<(), PrefsError> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn theme(&self) -> ThemeMode {
        self.prefs.theme
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        if self.prefs.theme != theme {
            self.prefs.theme = theme;
            self.dirty = true;
        }
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.set_theme(self.prefs.theme.toggled());
        self.prefs.theme
    }

    pub fn starred(&self) -> &BTreeSet<String> {
        &self.prefs.starred_experiments
    }

    pub fn is_starred(&self, id: &str) -> bool {
        self.prefs.starred_experiments.contains(id)
    }

    /// Star or unstar; returns whether the experiment is now starred
    pub fn toggle_star(&mut self, id: &str) -> bool {
        self.dirty = true;
        if self.prefs.starred_experiments.remove(id) {
            false
        } else {
            self.prefs.starred_experiments.insert(id.to_string());
            true
        }
    }

    pub fn filters(&self) -> &ExperimentFilter {
        &self.prefs.filters
    }

    pub fn set_filters(&mut self, filters: ExperimentFilter) {
        // The query is transient, so only the persisted halves count as a change
        if self.prefs.filters.institutes != filters.institutes
            || self.prefs.filters.disciplines != filters.disciplines
        {
            self.dirty = true;
        }
        self.prefs.filters = filters;
    }

    pub fn active_tab(&self) -> CatalogTab {
        self.prefs.active_tab
    }

    pub fn set_active_tab(&mut self, tab: CatalogTab) {
        if self.prefs.active_tab != tab {
            self.prefs.active_tab = tab;
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::load(dir.path().join("prefs.json"));
        assert_eq!(store.prefs(), &Preferences::default());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = PreferenceStore::load(&path);
        store.toggle_theme();
        store.toggle_star("exp-003");
        let mut filters = store.filters().clone();
        filters.toggle_institute("iitb");
        store.set_filters(filters);
        store.set_active_tab(CatalogTab::Starred);
        assert!(store.is_dirty());
        store.save().unwrap();
        assert!(!store.is_dirty());

        let reloaded = PreferenceStore::load(&path);
        assert_eq!(reloaded.theme(), ThemeMode::Dark);
        assert!(reloaded.is_starred("exp-003"));
        assert!(reloaded.filters().institutes.contains("iitb"));
        assert_eq!(reloaded.active_tab(), CatalogTab::Starred);
    }

    #[test]
    fn test_uses_web_key_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        let mut store = PreferenceStore::load(&path);
        store.toggle_star("exp-001");
        store.save().unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["theme"], "light");
        assert_eq!(json["starredExperiments"][0], "exp-001");
        assert!(json["vlab-filters"]["institutes"].is_array());
        assert_eq!(json["vlab-active-tab"], "all");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = PreferenceStore::load(&path);
        assert_eq!(store.prefs(), &Preferences::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = PreferenceStore::load(&path);
        assert_eq!(store.theme(), ThemeMode::Dark);
        assert!(store.starred().is_empty());
    }

    #[test]
    fn test_unchanged_values_do_not_dirty() {
        let dir = TempDir::new().unwrap();
        let mut store = PreferenceStore::load(dir.path().join("prefs.json"));
        store.set_theme(ThemeMode::Light);
        store.set_active_tab(CatalogTab::All);
        assert!(!store.is_dirty());
    }
}
