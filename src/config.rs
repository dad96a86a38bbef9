//! Configuration file (`~/.vlab/config.toml`)
//!
//! Every section and field is optional:
//!
//! ```toml
//! [player]
//! interval_ms = 600
//! early_exit = true
//! demo_array = [5, 3, 8, 4, 2]
//!
//! [grader]
//! fuel = 200000
//!
//! [catalog]
//! experiment_count = 40
//! experiments_delay_ms = 0
//!
//! [prefs]
//! path = "/tmp/vlab-prefs.json"
//! ```

use crate::catalog::MockDelays;
use crate::grader::GraderConfig;
use crate::sort::player::DEFAULT_INTERVAL;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VlabConfig {
    pub player: PlayerConfig,
    pub grader: GraderConfig,
    pub catalog: CatalogConfig,
    pub prefs: PrefsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub interval_ms: u64,
    pub early_exit: bool,
    /// Array animated on the Demo tab
    pub demo_array: Vec<i32>,
    /// Array used by the Practice tab
    pub practice_array: Vec<i32>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            interval_ms: DEFAULT_INTERVAL.as_millis() as u64,
            early_exit: false,
            demo_array: vec![5, 3, 8, 4, 2],
            practice_array: vec![7, 2, 9, 4, 1, 6],
        }
    }
}

impl PlayerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub experiment_count: usize,
    pub experiments_delay_ms: u64,
    pub directory_delay_ms: u64,
    pub lookup_delay_ms: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let delays = MockDelays::default();
        CatalogConfig {
            experiment_count: 24,
            experiments_delay_ms: delays.experiments.as_millis() as u64,
            directory_delay_ms: delays.directory.as_millis() as u64,
            lookup_delay_ms: delays.lookup.as_millis() as u64,
        }
    }
}

impl CatalogConfig {
    pub fn delays(&self) -> MockDelays {
        MockDelays {
            experiments: Duration::from_millis(self.experiments_delay_ms),
            directory: Duration::from_millis(self.directory_delay_ms),
            lookup: Duration::from_millis(self.lookup_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrefsConfig {
    /// Overrides the platform data directory location
    pub path: Option<PathBuf>,
}

impl VlabConfig {
    /// Load the config. An explicitly given file must exist and parse; the
    /// default file is optional and a broken one only logs a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let Some(path) = config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        match Self::load_from(&path) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("{}", err);
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".vlab").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[player]\ninterval_ms = 250\n\n[grader]\nfuel = 5000\nrandom_len = 5\n",
        )
        .unwrap();

        let config = VlabConfig::load(Some(&path)).unwrap();
        assert_eq!(config.player.interval(), Duration::from_millis(250));
        assert_eq!(config.player.demo_array, vec![5, 3, 8, 4, 2]);
        assert_eq!(config.grader.fuel, 5000);
        assert_eq!(config.grader.random_len, 5);
        assert_eq!(config.grader.entry_function, "bubble_sort");
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_explicit_path_errors_surface() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            VlabConfig::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[player\n").unwrap();
        assert!(matches!(
            VlabConfig::load(Some(&broken)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_catalog_delays() {
        let config = CatalogConfig {
            experiments_delay_ms: 0,
            ..Default::default()
        };
        let delays = config.delays();
        assert_eq!(delays.experiments, Duration::ZERO);
        assert_eq!(delays.lookup, Duration::from_millis(300));
    }
}
