use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Ring the terminal bell for start and rest cues
    pub bell: bool,
    /// Exercise catalog JSON replacing the built-in one
    pub catalog_path: Option<PathBuf>,
    /// Progress database location
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bell: true,
            catalog_path: None,
            store_path: None,
        }
    }
}

impl Config {
    /// Apply command line values on top of the stored config.
    pub fn merge_cli(
        mut self,
        catalog: Option<PathBuf>,
        store: Option<PathBuf>,
        silent: bool,
    ) -> Self {
        if catalog.is_some() {
            self.catalog_path = catalog;
        }
        if store.is_some() {
            self.store_path = store;
        }
        if silent {
            self.bell = false;
        }
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
    fn exists(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("luminate_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "unreadable config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert!(!store.exists());

        let cfg = Config::default();
        store.save(&cfg).unwrap();

        assert!(store.exists());
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            bell: false,
            catalog_path: Some(PathBuf::from("/tmp/catalog.json")),
            store_path: Some(PathBuf::from("/tmp/progress.db")),
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn corrupt_or_partial_files_fall_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);

        fs::write(&path, b"{ nope").unwrap();
        assert_eq!(store.load(), Config::default());

        fs::write(&path, br#"{"bell": false}"#).unwrap();
        let cfg = store.load();
        assert!(!cfg.bell);
        assert_eq!(cfg.store_path, None);
    }

    #[test]
    fn cli_values_override() {
        let cfg = Config {
            bell: true,
            catalog_path: Some(PathBuf::from("a.json")),
            store_path: Some(PathBuf::from("a.db")),
        }
        .merge_cli(None, Some(PathBuf::from("b.db")), true);

        assert!(!cfg.bell);
        assert_eq!(cfg.catalog_path, Some(PathBuf::from("a.json")));
        assert_eq!(cfg.store_path, Some(PathBuf::from("b.db")));
    }
}
