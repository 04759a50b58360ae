//! # MillView
//!
//! A G-code toolpath viewer and playback simulator for CNC milling programs.
//!
//! ## Architecture
//!
//! MillView is organized as a workspace with multiple crates:
//!
//! 1. **millview-core** - Error types and display formatting
//! 2. **millview-visualizer** - Toolpath compiler, kinematics, playback, scene analytics,
//!    syntax validator and built-in templates
//! 3. **millview-settings** - Viewer configuration and session persistence
//! 4. **millview** - Application state and the command-line front end
//!
//! ## Features
//!
//! - **Toolpath Compilation**: Modal G0/G1/G2/G3 interpretation with arc tessellation
//! - **Kinematics**: Segment timing, interpolation and time estimates
//! - **Playback**: Frame-driven simulation with seek, step and speed control
//! - **Validation**: Line-level lint for unsupported codes and risky moves
//! - **Persistence**: Session snapshot restored on the next start

pub mod app;

pub use app::{AppState, Measurement, MeasurementPoint};

pub use millview_core::{
    format_coordinate, format_distance, format_duration, format_feed_rate, Error, GcodeError,
    Result,
};

pub use millview_visualizer::{
    aggregate_statistics, compile, validate, BoundingVolume, CompiledProgram, PlaybackState,
    Point3D, TemplateLibrary, ToolpathStats, ValidationResult,
};

pub use millview_settings::{FileStore, KeyValueStore, MemoryStore, ViewerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output to stderr so command output on stdout stays clean
/// - RUST_LOG environment variable support
/// - Target, level and line number on every event
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
