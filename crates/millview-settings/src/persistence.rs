//! Settings Persistence
//!
//! The viewer state is stored as one JSON snapshot under a fixed key in a
//! [`KeyValueStore`]. Stores are pluggable so the application can run
//! against the file system, an in-memory map in tests, or anything else
//! that can hold strings by key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::ViewerConfig;
use crate::error::{SettingsError, SettingsResult};

/// Storage key for the viewer snapshot
pub const STATE_KEY: &str = "millview-state";

const APP_DIR_NAME: &str = "millview";

/// String storage addressed by key
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> SettingsResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform configuration directory
    pub fn default_location() -> SettingsResult<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no configuration directory on this platform".into())
        })?;
        Ok(Self::new(base.join(APP_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> SettingsResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            SettingsError::ConfigDirectory(format!("{}: {}", self.dir.display(), e))
        })?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Loads and saves the viewer snapshot through a store
#[derive(Debug, Clone)]
pub struct SettingsPersistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SettingsPersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the stored snapshot
    ///
    /// Missing state yields defaults. Unreadable state is logged and also
    /// yields defaults, so a corrupt store never blocks startup.
    pub fn load(&self) -> ViewerConfig {
        match self.try_load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                debug!("No stored viewer state, using defaults");
                ViewerConfig::default()
            }
            Err(e) => {
                warn!("Failed to load persisted state, using defaults: {}", e);
                ViewerConfig::default()
            }
        }
    }

    /// Read the stored snapshot, surfacing failures
    pub fn try_load(&self) -> SettingsResult<Option<ViewerConfig>> {
        let Some(raw) = self.store.get(STATE_KEY)? else {
            return Ok(None);
        };
        let config: ViewerConfig = serde_json::from_str(&raw)?;
        Ok(Some(config.with_fallbacks()))
    }

    /// Write the full snapshot
    pub fn save(&mut self, config: &ViewerConfig) -> SettingsResult<()> {
        let json = serde_json::to_string(config)?;
        self.store.set(STATE_KEY, &json)?;
        debug!("Persisted viewer state ({} bytes)", json.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_load_missing_gives_defaults() {
        let persistence = SettingsPersistence::new(MemoryStore::new());
        assert_eq!(persistence.load(), ViewerConfig::default());
        assert!(persistence.try_load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_gives_defaults() {
        let mut store = MemoryStore::new();
        store.set(STATE_KEY, "{not json").unwrap();
        let persistence = SettingsPersistence::new(store);
        assert!(persistence.try_load().is_err());
        assert_eq!(persistence.load(), ViewerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut persistence = SettingsPersistence::new(MemoryStore::new());
        let config = ViewerConfig {
            file_name: "bracket.nc".to_string(),
            tool_diameter: 6.0,
            ..ViewerConfig::default()
        };
        persistence.save(&config).unwrap();
        assert_eq!(persistence.load(), config);
    }

    #[test]
    fn test_blank_fields_fall_back() {
        let mut store = MemoryStore::new();
        store
            .set(STATE_KEY, r#"{"gcode_text":"","playback_speed":0}"#)
            .unwrap();
        let config = SettingsPersistence::new(store).load();
        assert_eq!(config.playback_speed, 1.0);
        assert!(!config.gcode_text.is_empty());
    }
}
