//! Toolpath compilation and analytics
//!
//! This module provides:
//! - Toolpath compilation with arc tessellation (compile)
//! - Bounding volume accumulation (viewport)
//! - Kinematic queries: durations, interpolation, pointer sizing
//! - Aggregate statistics
//! - Playback state driven by an external frame loop
//! - Rendering-agnostic scene analytics

pub mod arc;
pub mod kinematics;
pub mod playback;
pub mod scene;
pub mod stats;
pub mod toolpath;
pub mod viewport;

pub use arc::tessellate_arc;
pub use kinematics::{
    adaptive_pointer_scale, interpolate_position, resolve_feed_rate, segment_duration,
    DEFAULT_FEED_RATE, FALLBACK_SEGMENT_DURATION, MIN_SEGMENT_DURATION, RAPID_FEED_RATE,
};
pub use playback::{
    clamp_speed, PlaybackState, MAX_PLAYBACK_SPEED, MIN_PLAYBACK_SPEED, SPEED_OPTIONS,
};
pub use scene::{
    auto_workpiece, depth_color, scene_scale, split_progress, visible_segments, DepthFilter,
    ProgressSplit, Rgb, StatusSnapshot, WorkpieceBox,
};
pub use stats::{aggregate_statistics, ToolpathStats};
pub use toolpath::{compile, CompiledProgram, MoveClass, Point3D, ToolpathPoint};
pub use viewport::BoundingVolume;
