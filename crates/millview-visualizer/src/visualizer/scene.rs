//! Rendering-agnostic scene analytics
//!
//! Everything a front end needs to draw the toolpath without owning any
//! geometry logic: scene scale, stock box, depth colours, depth filtering,
//! the completed/remaining split and the status bar snapshot.
//!
//! Segments are identified by the index of their destination point, so
//! segment `i` runs from point `i - 1` to point `i`.

use serde::{Deserialize, Serialize};

use super::playback::PlaybackState;
use super::toolpath::{CompiledProgram, MoveClass, Point3D, ToolpathPoint};
use super::viewport::BoundingVolume;

const FALLBACK_SCENE_SCALE: f64 = 0.01;
const SCENE_SIZE: f64 = 1.5;
const WORKPIECE_MARGIN: f64 = 1.15;
const WORKPIECE_DEPTH_FACTOR: f64 = 1.5;
const MIN_WORKPIECE_SIZE: f64 = 1.0;

/// Shallow to deep
const DEPTH_RAMP: [Rgb; 5] = [
    Rgb::new(0x4d, 0xd0, 0xe1),
    Rgb::new(0x26, 0xa6, 0x9a),
    Rgb::new(0xff, 0xeb, 0x3b),
    Rgb::new(0xff, 0x98, 0x00),
    Rgb::new(0xf4, 0x43, 0x36),
];

/// Scale that fits the toolpath into a fixed-size scene
pub fn scene_scale(bounds: &BoundingVolume) -> f64 {
    let max_extent = bounds.max_extent();
    if max_extent > 0.0 {
        SCENE_SIZE / max_extent
    } else {
        FALLBACK_SCENE_SCALE
    }
}

/// Stock box in work units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkpieceBox {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    /// Center of the box
    pub center: Point3D,
}

impl WorkpieceBox {
    /// Box with its top face at Z=0 centred on (x, y)
    pub fn at(x: f64, y: f64, width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
            center: Point3D::new(x, y, -height / 2.0),
        }
    }

    pub fn min(&self) -> Point3D {
        Point3D::new(
            self.center.x - self.width / 2.0,
            self.center.y - self.depth / 2.0,
            self.center.z - self.height / 2.0,
        )
    }

    pub fn max(&self) -> Point3D {
        Point3D::new(
            self.center.x + self.width / 2.0,
            self.center.y + self.depth / 2.0,
            self.center.z + self.height / 2.0,
        )
    }
}

/// Stock sized from the toolpath bounds with a margin
pub fn auto_workpiece(bounds: &BoundingVolume) -> WorkpieceBox {
    let (dx, dy, _) = bounds.extents();
    let center = bounds.center();
    WorkpieceBox::at(
        center.x,
        center.y,
        (dx * WORKPIECE_MARGIN).max(MIN_WORKPIECE_SIZE),
        (dy * WORKPIECE_MARGIN).max(MIN_WORKPIECE_SIZE),
        (bounds.min.z.abs() * WORKPIECE_DEPTH_FACTOR).max(MIN_WORKPIECE_SIZE),
    )
}

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Colour for a Z height: cyan at the top of the bounds through red at the bottom
pub fn depth_color(z: f64, bounds: &BoundingVolume) -> Rgb {
    let range = bounds.max.z - bounds.min.z;
    if range <= 0.0 || !z.is_finite() {
        return DEPTH_RAMP[0];
    }

    let depth = ((bounds.max.z - z) / range).clamp(0.0, 1.0);
    let scaled = depth * (DEPTH_RAMP.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(DEPTH_RAMP.len() - 2);
    DEPTH_RAMP[lower].lerp(DEPTH_RAMP[lower + 1], scaled - lower as f64)
}

/// Inclusive Z window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthFilter {
    pub min: f64,
    pub max: f64,
}

impl DepthFilter {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Window spanning the whole Z range of the bounds
    pub fn full(bounds: &BoundingVolume) -> Self {
        Self::new(bounds.min.z, bounds.max.z)
    }

    pub fn contains(&self, z: f64) -> bool {
        z >= self.min && z <= self.max
    }
}

/// Segments whose endpoints both lie inside the filter, as (from, to) pairs
pub fn visible_segments(program: &CompiledProgram, filter: &DepthFilter) -> Vec<(usize, usize)> {
    program
        .toolpath
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| {
            filter.contains(pair[0].position.z) && filter.contains(pair[1].position.z)
        })
        .map(|(idx, _)| (idx, idx + 1))
        .collect()
}

/// Segments partitioned by playback position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSplit {
    pub completed: Vec<usize>,
    pub remaining_cutting: Vec<usize>,
    pub remaining_rapid: Vec<usize>,
}

pub fn split_progress(program: &CompiledProgram, current_index: usize) -> ProgressSplit {
    let mut split = ProgressSplit::default();
    for (idx, point) in program.toolpath.iter().enumerate().skip(1) {
        if idx <= current_index {
            split.completed.push(idx);
        } else if point.move_class == MoveClass::Rapid {
            split.remaining_rapid.push(idx);
        } else {
            split.remaining_cutting.push(idx);
        }
    }
    split
}

/// Status bar contents for the current playback position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub position: Point3D,
    pub move_class: MoveClass,
    pub source_line: usize,
    pub command_text: Option<String>,
    pub current_index: usize,
    pub total_points: usize,
}

impl StatusSnapshot {
    pub fn capture(program: &CompiledProgram, playback: &PlaybackState) -> Self {
        let index = playback.current_index.min(program.last_index());
        let point = program
            .point(index)
            .copied()
            .unwrap_or_else(ToolpathPoint::origin);
        Self {
            position: point.position,
            move_class: point.move_class,
            source_line: point.source_line,
            command_text: program
                .command_for_line(point.source_line)
                .map(|c| c.raw_text.clone()),
            current_index: index,
            total_points: program.len(),
        }
    }

    pub fn move_label(&self) -> &'static str {
        match self.move_class {
            MoveClass::Rapid => "RAPID",
            MoveClass::Cutting => "CUT",
        }
    }
}
