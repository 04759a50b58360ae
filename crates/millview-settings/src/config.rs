//! Viewer configuration
//!
//! `ViewerConfig` is the persisted session snapshot: program text, file
//! name, playback speed, camera preset, tool, visibility toggles, workpiece
//! and depth visualisation. Every section merges over its defaults, so a
//! partial stored snapshot still loads.
//!
//! Files can be read and written as JSON or TOML, chosen by extension.

use millview_visualizer::{DepthFilter, Point3D, TemplateLibrary};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{SettingsError, SettingsResult};

pub const DEFAULT_FILE_NAME: &str = "sample.nc";
pub const DEFAULT_CAMERA_PRESET: &str = "isometric";
pub const DEFAULT_TOOL_DIAMETER: f64 = 3.0;
pub const DEFAULT_PLAYBACK_SPEED: f64 = 1.0;

/// Stock material with its display colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

pub const MATERIAL_PRESETS: [MaterialPreset; 5] = [
    MaterialPreset { id: "aluminum", name: "Aluminum", color: "#a8a9ad" },
    MaterialPreset { id: "steel", name: "Steel", color: "#71797e" },
    MaterialPreset { id: "wood", name: "Wood", color: "#8b4513" },
    MaterialPreset { id: "plastic", name: "Plastic", color: "#f5f5dc" },
    MaterialPreset { id: "custom", name: "Custom", color: "#2a2d33" },
];

impl MaterialPreset {
    pub fn find(id: &str) -> Option<&'static MaterialPreset> {
        MATERIAL_PRESETS.iter().find(|m| m.id == id)
    }
}

/// Scene element that can be shown or hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityKey {
    Grid,
    Axes,
    RapidMoves,
    CuttingWidth,
    Workpiece,
    ToolPointer,
}

impl VisibilityKey {
    pub const ALL: [VisibilityKey; 6] = [
        Self::Grid,
        Self::Axes,
        Self::RapidMoves,
        Self::CuttingWidth,
        Self::Workpiece,
        Self::ToolPointer,
    ];
}

impl std::fmt::Display for VisibilityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grid => write!(f, "grid"),
            Self::Axes => write!(f, "axes"),
            Self::RapidMoves => write!(f, "rapid_moves"),
            Self::CuttingWidth => write!(f, "cutting_width"),
            Self::Workpiece => write!(f, "workpiece"),
            Self::ToolPointer => write!(f, "tool_pointer"),
        }
    }
}

impl FromStr for VisibilityKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.to_string() == s)
            .ok_or_else(|| SettingsError::invalid("visibility", format!("unknown element '{}'", s)))
    }
}

/// Visibility toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilitySettings {
    pub grid: bool,
    pub axes: bool,
    pub rapid_moves: bool,
    pub cutting_width: bool,
    pub workpiece: bool,
    pub tool_pointer: bool,
}

impl Default for VisibilitySettings {
    fn default() -> Self {
        Self {
            grid: true,
            axes: true,
            rapid_moves: true,
            cutting_width: true,
            workpiece: true,
            tool_pointer: true,
        }
    }
}

impl VisibilitySettings {
    fn slot(&mut self, key: VisibilityKey) -> &mut bool {
        match key {
            VisibilityKey::Grid => &mut self.grid,
            VisibilityKey::Axes => &mut self.axes,
            VisibilityKey::RapidMoves => &mut self.rapid_moves,
            VisibilityKey::CuttingWidth => &mut self.cutting_width,
            VisibilityKey::Workpiece => &mut self.workpiece,
            VisibilityKey::ToolPointer => &mut self.tool_pointer,
        }
    }

    pub fn is_visible(&self, key: VisibilityKey) -> bool {
        match key {
            VisibilityKey::Grid => self.grid,
            VisibilityKey::Axes => self.axes,
            VisibilityKey::RapidMoves => self.rapid_moves,
            VisibilityKey::CuttingWidth => self.cutting_width,
            VisibilityKey::Workpiece => self.workpiece,
            VisibilityKey::ToolPointer => self.tool_pointer,
        }
    }

    /// Flip one toggle and return its new value
    pub fn toggle(&mut self, key: VisibilityKey) -> bool {
        let slot = self.slot(key);
        *slot = !*slot;
        *slot
    }
}

/// Stock configuration
///
/// In manual mode the dimensions and origin are used as given; otherwise
/// the stock is sized from the toolpath bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkpieceConfig {
    pub manual_mode: bool,
    pub material: String,
    /// Width, depth and height (mm)
    pub dimensions: Point3D,
    pub origin: Point3D,
}

impl Default for WorkpieceConfig {
    fn default() -> Self {
        Self {
            manual_mode: false,
            material: "aluminum".to_string(),
            dimensions: Point3D::new(100.0, 100.0, 20.0),
            origin: Point3D::origin(),
        }
    }
}

impl WorkpieceConfig {
    pub fn material_preset(&self) -> Option<&'static MaterialPreset> {
        MaterialPreset::find(&self.material)
    }
}

fn default_depth_filter() -> DepthFilter {
    DepthFilter::new(-100.0, 10.0)
}

/// Complete persisted viewer state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub gcode_text: String,
    pub file_name: String,
    pub playback_speed: f64,
    pub camera_preset: String,
    pub tool_diameter: f64,
    pub depth_color_enabled: bool,
    pub visibility: VisibilitySettings,
    pub workpiece: WorkpieceConfig,
    pub depth_filter: DepthFilter,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            gcode_text: TemplateLibrary::builtin().default_program().to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            playback_speed: DEFAULT_PLAYBACK_SPEED,
            camera_preset: DEFAULT_CAMERA_PRESET.to_string(),
            tool_diameter: DEFAULT_TOOL_DIAMETER,
            depth_color_enabled: false,
            visibility: VisibilitySettings::default(),
            workpiece: WorkpieceConfig::default(),
            depth_filter: default_depth_filter(),
        }
    }
}

impl ViewerConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace empty or non-positive scalars with their defaults
    ///
    /// Stored snapshots written by older sessions may carry blanks; those
    /// are treated as "unset" rather than as errors.
    pub fn with_fallbacks(mut self) -> Self {
        let defaults = Self::default();
        if self.gcode_text.is_empty() {
            self.gcode_text = defaults.gcode_text;
        }
        if self.file_name.is_empty() {
            self.file_name = defaults.file_name;
        }
        if !(self.playback_speed.is_finite() && self.playback_speed > 0.0) {
            self.playback_speed = defaults.playback_speed;
        }
        if self.camera_preset.is_empty() {
            self.camera_preset = defaults.camera_preset;
        }
        if !(self.tool_diameter.is_finite() && self.tool_diameter > 0.0) {
            self.tool_diameter = defaults.tool_diameter;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !(self.tool_diameter.is_finite() && self.tool_diameter > 0.0) {
            return Err(SettingsError::invalid("tool_diameter", "must be > 0"));
        }
        if !(self.playback_speed.is_finite() && self.playback_speed > 0.0) {
            return Err(SettingsError::invalid("playback_speed", "must be > 0"));
        }

        let dims = self.workpiece.dimensions;
        if dims.x <= 0.0 || dims.y <= 0.0 || dims.z <= 0.0 {
            return Err(SettingsError::invalid(
                "workpiece.dimensions",
                "all dimensions must be > 0",
            ));
        }

        if self.depth_filter.min > self.depth_filter.max {
            return Err(SettingsError::invalid(
                "depth_filter",
                format!(
                    "min ({}) must not exceed max ({})",
                    self.depth_filter.min, self.depth_filter.max
                ),
            ));
        }

        Ok(())
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => return Err(unsupported(other)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => return Err(unsupported(other)),
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn unsupported(ext: Option<&str>) -> SettingsError {
    SettingsError::UnsupportedFormat(format!(
        "'{}' (config file must be .json or .toml)",
        ext.unwrap_or("")
    ))
}
