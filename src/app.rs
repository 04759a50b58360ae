//! Application state
//!
//! `AppState` is the composition root of a viewer session. It owns the
//! persisted [`ViewerConfig`], the currently published [`CompiledProgram`],
//! playback state and measurement points, and writes the configuration
//! back through a [`KeyValueStore`] whenever a persisted field changes.
//!
//! Programs are compiled completely before they replace the current one,
//! so readers never observe a half-built program.

use millview_core::{GcodeError, Result};
use millview_settings::config::DEFAULT_FILE_NAME;
use millview_settings::{
    KeyValueStore, SettingsError, SettingsPersistence, SettingsResult, ViewerConfig,
    VisibilityKey, WorkpieceConfig,
};
use millview_visualizer::visualizer::{adaptive_pointer_scale, segment_duration};
use millview_visualizer::{
    aggregate_statistics, auto_workpiece, compile, validate, CompiledProgram, DepthFilter,
    PlaybackState, Point3D, StatusSnapshot, TemplateLibrary, ToolpathStats, ValidationResult,
    WorkpieceBox,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Number of measurement points kept for distance readout
const MEASUREMENT_POINTS_KEPT: usize = 2;

/// A marked position used for measuring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementPoint {
    pub position: Point3D,
    pub label: String,
}

/// Distance between the two most recent measurement points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub total: f64,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Measurement {
    pub fn between(a: &Point3D, b: &Point3D) -> Self {
        Self {
            total: a.distance_to(b),
            dx: (b.x - a.x).abs(),
            dy: (b.y - a.y).abs(),
            dz: (b.z - a.z).abs(),
        }
    }
}

/// Viewer session state
pub struct AppState<S: KeyValueStore> {
    config: ViewerConfig,
    program: CompiledProgram,
    playback: PlaybackState,
    templates: TemplateLibrary,
    measurement_mode: bool,
    measurement_points: Vec<MeasurementPoint>,
    is_colliding: bool,
    persistence: SettingsPersistence<S>,
}

impl<S: KeyValueStore> AppState<S> {
    /// Restore the last session from `store` and compile its program
    pub fn load(store: S) -> Self {
        let persistence = SettingsPersistence::new(store);
        let config = persistence.load();
        let program = compile(&config.gcode_text);
        info!(
            "Loaded session '{}' ({} toolpath points)",
            config.file_name,
            program.len()
        );

        Self {
            playback: PlaybackState::new(config.playback_speed),
            config,
            program,
            templates: TemplateLibrary::builtin(),
            measurement_mode: false,
            measurement_points: Vec::new(),
            is_colliding: false,
            persistence,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn program(&self) -> &CompiledProgram {
        &self.program
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.config) {
            warn!("Failed to persist state: {}", e);
        }
    }

    /// Replace the program; the new one is compiled before it is published
    fn publish(&mut self, text: String) {
        let program = compile(&text);
        self.config.gcode_text = text;
        self.program = program;
        self.playback.reset();
        debug!("Published program with {} points", self.program.len());
    }

    // ---- program ----

    pub fn set_gcode_text(&mut self, text: impl Into<String>) {
        self.publish(text.into());
        self.persist();
    }

    /// Load a built-in template by id
    pub fn load_template(&mut self, id: &str) -> Result<()> {
        let template = self
            .templates
            .get(id)
            .ok_or_else(|| GcodeError::UnknownTemplate { id: id.to_string() })?;
        let (text, file_name) = (template.gcode.to_string(), template.file_name());

        self.publish(text);
        self.config.file_name = file_name;
        self.persist();
        info!("Loaded template '{}'", id);
        Ok(())
    }

    pub fn load_sample(&mut self) {
        let text = self.templates.default_program().to_string();
        self.publish(text);
        self.config.file_name = DEFAULT_FILE_NAME.to_string();
        self.persist();
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.config.file_name = name.into();
        self.persist();
    }

    // ---- playback ----

    pub fn play(&mut self) {
        self.playback.play();
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle_playback(&mut self) {
        self.playback.toggle();
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn step_forward(&mut self) {
        self.playback.step_forward(&self.program);
    }

    pub fn step_backward(&mut self) {
        self.playback.step_backward();
    }

    pub fn seek(&mut self, index: usize) {
        self.playback.seek(&self.program, index);
    }

    pub fn seek_fraction(&mut self, fraction: f64) {
        self.playback.seek_fraction(&self.program, fraction);
    }

    /// Advance playback by one frame of `elapsed` seconds
    pub fn tick(&mut self, elapsed: f64) -> bool {
        self.playback.tick(&self.program, elapsed)
    }

    /// Set the playback multiplier, clamped to the supported range
    ///
    /// Non-finite and non-positive speeds are rejected and nothing changes.
    pub fn set_playback_speed(&mut self, speed: f64) -> SettingsResult<()> {
        if !self.playback.set_speed(speed) {
            return Err(SettingsError::invalid(
                "playback_speed",
                format!("{} is not a positive number", speed),
            ));
        }
        self.store_playback_speed();
        Ok(())
    }

    pub fn speed_up(&mut self) {
        self.playback.speed_up();
        self.store_playback_speed();
    }

    pub fn speed_down(&mut self) {
        self.playback.speed_down();
        self.store_playback_speed();
    }

    fn store_playback_speed(&mut self) {
        self.config.playback_speed = self.playback.speed;
        self.persist();
    }

    pub fn tool_position(&self) -> Point3D {
        self.playback.tool_position(&self.program)
    }

    // ---- view settings ----

    pub fn set_camera_preset(&mut self, preset: impl Into<String>) {
        self.config.camera_preset = preset.into();
        self.persist();
    }

    /// Non-finite and non-positive diameters are rejected and nothing changes
    pub fn set_tool_diameter(&mut self, diameter: f64) -> SettingsResult<()> {
        if !(diameter.is_finite() && diameter > 0.0) {
            return Err(SettingsError::invalid(
                "tool_diameter",
                format!("{} is not a positive number", diameter),
            ));
        }
        self.config.tool_diameter = diameter;
        self.persist();
        Ok(())
    }

    /// Flip a visibility toggle and return its new value
    pub fn toggle_visibility(&mut self, key: VisibilityKey) -> bool {
        let visible = self.config.visibility.toggle(key);
        self.persist();
        visible
    }

    pub fn set_workpiece_config(&mut self, workpiece: WorkpieceConfig) {
        self.config.workpiece = workpiece;
        self.persist();
    }

    pub fn set_workpiece_material(&mut self, material: impl Into<String>) {
        self.config.workpiece.material = material.into();
        self.persist();
    }

    pub fn set_workpiece_manual_mode(&mut self, manual: bool) {
        self.config.workpiece.manual_mode = manual;
        self.persist();
    }

    pub fn toggle_depth_color(&mut self) -> bool {
        self.config.depth_color_enabled = !self.config.depth_color_enabled;
        self.persist();
        self.config.depth_color_enabled
    }

    pub fn set_depth_filter(&mut self, filter: DepthFilter) {
        self.config.depth_filter = filter;
        self.persist();
    }

    /// Stock box: the manual configuration if enabled, else sized from the toolpath
    ///
    /// A manual stock is centred on the configured origin's XY with its top
    /// face at the origin's Z.
    pub fn workpiece(&self) -> WorkpieceBox {
        let workpiece = &self.config.workpiece;
        if !workpiece.manual_mode {
            return auto_workpiece(&self.program.bounds);
        }
        let dims = workpiece.dimensions;
        let origin = workpiece.origin;
        WorkpieceBox {
            width: dims.x,
            depth: dims.y,
            height: dims.z,
            center: Point3D::new(origin.x, origin.y, origin.z - dims.z / 2.0),
        }
    }

    // ---- collision ----

    pub fn set_colliding(&mut self, colliding: bool) {
        self.is_colliding = colliding;
    }

    pub fn is_colliding(&self) -> bool {
        self.is_colliding
    }

    // ---- measurement ----

    pub fn measurement_mode(&self) -> bool {
        self.measurement_mode
    }

    pub fn set_measurement_mode(&mut self, enabled: bool) {
        self.measurement_mode = enabled;
    }

    pub fn measurement_points(&self) -> &[MeasurementPoint] {
        &self.measurement_points
    }

    /// Add a point, keeping only the most recent two
    pub fn add_measurement_point(&mut self, point: MeasurementPoint) {
        if self.measurement_points.len() >= MEASUREMENT_POINTS_KEPT {
            self.measurement_points.remove(0);
        }
        self.measurement_points.push(point);
    }

    /// Mark the toolpath point at the current playback index
    pub fn mark_current_point(&mut self) {
        let Some(point) = self.program.point(self.playback.current_index) else {
            return;
        };
        let label = format!("P{}", self.measurement_points.len() + 1);
        self.add_measurement_point(MeasurementPoint {
            position: point.position,
            label,
        });
    }

    pub fn measurement(&self) -> Option<Measurement> {
        match self.measurement_points.as_slice() {
            [.., a, b] => Some(Measurement::between(&a.position, &b.position)),
            _ => None,
        }
    }

    pub fn clear_measurements(&mut self) {
        self.measurement_points.clear();
    }

    // ---- queries ----

    pub fn segment_duration(&self, from: usize, to: usize) -> f64 {
        segment_duration(&self.program, from, to)
    }

    pub fn adaptive_pointer_scale(&self) -> f64 {
        adaptive_pointer_scale(&self.program)
    }

    pub fn statistics(&self) -> ToolpathStats {
        aggregate_statistics(&self.program)
    }

    pub fn validation(&self) -> ValidationResult {
        validate(&self.config.gcode_text)
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot::capture(&self.program, &self.playback)
    }
}
