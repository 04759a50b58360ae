//! MillView Settings Crate
//!
//! Handles viewer configuration, its validation, and persistence of the
//! session snapshot through a pluggable key-value store.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    MaterialPreset, ViewerConfig, VisibilityKey, VisibilitySettings, WorkpieceConfig,
    MATERIAL_PRESETS,
};
pub use error::{SettingsError, SettingsResult};
pub use persistence::{FileStore, KeyValueStore, MemoryStore, SettingsPersistence, STATE_KEY};
