//! # MillView Visualizer
//!
//! G-code interpretation and toolpath analytics for MillView.
//! Includes the toolpath compiler, the kinematic query engine, playback
//! state, scene analytics, the syntax validator and the template library.

pub mod gcode;
pub mod visualizer;

pub use gcode::{
    validate, Command, GcodeTemplate, MotionType, TemplateLibrary, ValidationIssue,
    ValidationResult, ValidationSeverity,
};

pub use visualizer::{
    adaptive_pointer_scale, aggregate_statistics, auto_workpiece, compile, depth_color,
    interpolate_position, scene_scale, segment_duration, split_progress, visible_segments,
    BoundingVolume, CompiledProgram, DepthFilter, MoveClass, PlaybackState, Point3D,
    ProgressSplit, Rgb, StatusSnapshot, ToolpathPoint, ToolpathStats, WorkpieceBox,
};
