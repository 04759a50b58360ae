//! Toolpath compiler
//!
//! Turns program text into an immutable [`CompiledProgram`]: the ordered
//! command list, a dense toolpath with rapid/cutting classification, and
//! the bounding volume of every toolpath point.
//!
//! Compilation never fails. Lines the interpreter does not understand
//! degrade into `Other` commands with no motion effect.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::arc::tessellate_arc;
use super::viewport::{Bounds, BoundingVolume};
use crate::gcode::{parse_line, Command, LineWords, MotionType};

/// 3D point in work coordinates (mm)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Per-axis linear interpolation; `t` is not clamped
    pub fn lerp(&self, other: &Point3D, t: f64) -> Point3D {
        Point3D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

/// Binary move classification used by rendering and analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveClass {
    Rapid,
    Cutting,
}

impl MoveClass {
    /// G0 moves are rapid; linear and arc moves are cutting
    pub fn from_motion(motion: MotionType) -> Self {
        if motion == MotionType::Rapid {
            Self::Rapid
        } else {
            Self::Cutting
        }
    }
}

/// One vertex of the resolved motion path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolpathPoint {
    pub position: Point3D,
    pub move_class: MoveClass,
    /// Line number of the originating command; tessellated arcs share one
    pub source_line: usize,
}

impl ToolpathPoint {
    /// Implicit starting point every toolpath begins with
    pub fn origin() -> Self {
        Self {
            position: Point3D::origin(),
            move_class: MoveClass::Rapid,
            source_line: 0,
        }
    }
}

/// Compiled program: commands, toolpath and bounds
///
/// Built once per text change and treated as immutable afterwards.
/// The toolpath always holds at least the origin point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledProgram {
    pub commands: Vec<Command>,
    pub toolpath: Vec<ToolpathPoint>,
    pub bounds: BoundingVolume,
}

impl CompiledProgram {
    /// Number of toolpath points (at least 1)
    pub fn len(&self) -> usize {
        self.toolpath.len()
    }

    /// Always false for compiled programs; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.toolpath.is_empty()
    }

    /// Index of the final toolpath point
    pub fn last_index(&self) -> usize {
        self.toolpath.len().saturating_sub(1)
    }

    pub fn point(&self, index: usize) -> Option<&ToolpathPoint> {
        self.toolpath.get(index)
    }

    /// First command recorded for a source line
    pub fn command_for_line(&self, line_number: usize) -> Option<&Command> {
        // Commands are recorded in line order with at most one per line.
        self.commands
            .binary_search_by_key(&line_number, |c| c.line_number)
            .ok()
            .map(|idx| &self.commands[idx])
    }

    /// Command that produced the toolpath point at `index`
    pub fn command_for_point(&self, index: usize) -> Option<&Command> {
        self.point(index)
            .and_then(|p| self.command_for_line(p.source_line))
    }
}

impl Default for CompiledProgram {
    fn default() -> Self {
        compile("")
    }
}

/// Compile-scope interpreter state
#[derive(Debug, Clone, Copy)]
struct ModalState {
    position: Point3D,
    motion_mode: MotionType,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            position: Point3D::origin(),
            motion_mode: MotionType::Rapid,
        }
    }
}

impl ModalState {
    /// Apply the line's G word to the motion group and resolve the line's motion type
    fn resolve_motion(&mut self, words: &LineWords) -> MotionType {
        match words.g_code.and_then(MotionType::from_g_number) {
            Some(motion) => {
                self.motion_mode = motion;
                motion
            }
            None if words.has_axis_words() => self.motion_mode,
            None => MotionType::Other,
        }
    }

    /// Absolute positioning: only the supplied axes change
    fn move_to(&mut self, words: &LineWords) -> Point3D {
        if let Some(x) = words.x {
            self.position.x = x;
        }
        if let Some(y) = words.y {
            self.position.y = y;
        }
        if let Some(z) = words.z {
            self.position.z = z;
        }
        self.position
    }
}

/// Compile program text into a toolpath
///
/// Pure: identical text always yields an identical program.
pub fn compile(source: &str) -> CompiledProgram {
    debug!("Compiling program, input size: {} bytes", source.len());

    let mut commands = Vec::new();
    let mut toolpath = vec![ToolpathPoint::origin()];
    let mut state = ModalState::default();
    let mut arc_count = 0usize;
    // Commanded targets; an inconsistent arc can end off its tessellated circle
    let mut targets = Vec::new();

    for (line_number, line) in source.split('\n').enumerate() {
        let Some(parsed) = parse_line(line) else {
            continue;
        };

        let Some(words) = parsed.words else {
            commands.push(Command::comment_only(
                line_number,
                parsed.raw_text,
                parsed.comment,
            ));
            continue;
        };

        let motion_type = state.resolve_motion(&words);
        trace!("Line {}: {} {:?}", line_number, motion_type, words);

        if words.has_axis_words() {
            let target = state.move_to(&words);
            targets.push(target);

            if motion_type.is_arc() && (words.i.is_some() || words.j.is_some()) {
                arc_count += 1;
                let start = toolpath
                    .last()
                    .map(|p| p.position)
                    .unwrap_or_default();
                toolpath.extend(tessellate_arc(
                    start,
                    target,
                    words.i.unwrap_or(0.0),
                    words.j.unwrap_or(0.0),
                    motion_type == MotionType::ArcClockwise,
                    line_number,
                ));
            } else {
                toolpath.push(ToolpathPoint {
                    position: target,
                    move_class: MoveClass::from_motion(motion_type),
                    source_line: line_number,
                });
            }
        }

        commands.push(Command {
            line_number,
            raw_text: parsed.raw_text,
            motion_type,
            g_code: words.g_code,
            x: words.x,
            y: words.y,
            z: words.z,
            feed_rate: words.f,
            i: words.i,
            j: words.j,
            k: words.k,
            comment: parsed.comment,
        });
    }

    // The origin only counts once real motion exists; otherwise the
    // accumulator stays empty and finalizes to the unit cube.
    let mut bounds = Bounds::new();
    if toolpath.len() > 1 {
        for point in &toolpath {
            bounds.update(point.position);
        }
        for target in &targets {
            bounds.update(*target);
        }
    }
    let bounds = bounds.finalize();

    debug!(
        "Compile complete: {} commands, {} toolpath points, {} arcs",
        commands.len(),
        toolpath.len(),
        arc_count
    );

    CompiledProgram {
        commands,
        toolpath,
        bounds,
    }
}
