//! G-Code command types

use serde::{Deserialize, Serialize};

/// Motion classification of an interpreted line
///
/// `Other` covers comment-only lines and administrative codes
/// (units, spindle, program end) that carry no motion of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionType {
    /// G0 rapid positioning
    Rapid,
    /// G1 linear feed move
    Linear,
    /// G2 clockwise arc
    ArcClockwise,
    /// G3 counter-clockwise arc
    ArcCounterClockwise,
    /// Anything else
    Other,
}

impl MotionType {
    /// Map a G number onto the motion group (G0-G3), if it belongs to it
    pub fn from_g_number(g: u32) -> Option<Self> {
        match g {
            0 => Some(Self::Rapid),
            1 => Some(Self::Linear),
            2 => Some(Self::ArcClockwise),
            3 => Some(Self::ArcCounterClockwise),
            _ => None,
        }
    }

    /// True for G2/G3
    pub fn is_arc(&self) -> bool {
        matches!(self, Self::ArcClockwise | Self::ArcCounterClockwise)
    }
}

impl std::fmt::Display for MotionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rapid => write!(f, "rapid"),
            Self::Linear => write!(f, "linear"),
            Self::ArcClockwise => write!(f, "arc-cw"),
            Self::ArcCounterClockwise => write!(f, "arc-ccw"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One interpreted line of program text
///
/// Word fields stay `None` when the letter is absent from the line; an
/// absent axis is not the same as a zero axis because omitted axes keep
/// their previous position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// 0-based source line index
    pub line_number: usize,
    /// Trimmed line text including any comment
    pub raw_text: String,
    /// Resolved motion classification
    pub motion_type: MotionType,
    /// First G number on the line
    pub g_code: Option<u32>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Programmed feed rate (units/min)
    pub feed_rate: Option<f64>,
    /// Arc center offset from the start point, X component
    pub i: Option<f64>,
    /// Arc center offset from the start point, Y component
    pub j: Option<f64>,
    /// Arc center offset, Z component (parsed, not modeled)
    pub k: Option<f64>,
    /// Comment text without its delimiters
    pub comment: Option<String>,
}

impl Command {
    /// Create a comment-only command
    pub fn comment_only(line_number: usize, raw_text: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            line_number,
            raw_text: raw_text.into(),
            motion_type: MotionType::Other,
            g_code: None,
            x: None,
            y: None,
            z: None,
            feed_rate: None,
            i: None,
            j: None,
            k: None,
            comment,
        }
    }

    /// True if any of X/Y/Z is present
    pub fn has_axis_words(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }

    /// True if an arc center can be derived (I or J present)
    pub fn has_arc_offset(&self) -> bool {
        self.i.is_some() || self.j.is_some()
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.line_number, self.motion_type, self.raw_text)
    }
}
