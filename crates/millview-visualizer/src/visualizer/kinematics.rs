//! Kinematic queries over a compiled program
//!
//! Stateless and total: out-of-range indices and missing feed rates fall
//! back to fixed defaults instead of failing.

use super::toolpath::{CompiledProgram, MoveClass, Point3D};
use crate::gcode::Command;

/// Feed rate assumed for cutting moves without a usable F word (mm/min)
pub const DEFAULT_FEED_RATE: f64 = 500.0;
/// Traverse rate assumed for every rapid move (mm/min)
pub const RAPID_FEED_RATE: f64 = 2000.0;
/// Duration reported for segments that do not exist (seconds)
pub const FALLBACK_SEGMENT_DURATION: f64 = 0.1;
/// Floor applied to every real segment duration (seconds)
pub const MIN_SEGMENT_DURATION: f64 = 0.01;

const MIN_POINTER_SCALE: f64 = 0.01;
const MAX_POINTER_SCALE: f64 = 0.05;
const POINTER_SCALE_FACTOR: f64 = 0.02;

/// Feed rate (mm/min) used to time a move into a point of `move_class`
///
/// Rapids always run at [`RAPID_FEED_RATE`]. Cutting moves take the
/// command's F word; absent, zero or negative values use the default.
pub fn resolve_feed_rate(command: Option<&Command>, move_class: MoveClass) -> f64 {
    if move_class == MoveClass::Rapid {
        return RAPID_FEED_RATE;
    }
    command
        .and_then(|c| c.feed_rate)
        .filter(|f| *f > 0.0)
        .unwrap_or(DEFAULT_FEED_RATE)
}

/// Time in seconds to travel from toolpath point `from` to point `to`
pub fn segment_duration(program: &CompiledProgram, from: usize, to: usize) -> f64 {
    let (Some(start), Some(end)) = (program.point(from), program.point(to)) else {
        return FALLBACK_SEGMENT_DURATION;
    };

    let distance = start.position.distance_to(&end.position);
    let feed = resolve_feed_rate(program.command_for_line(end.source_line), end.move_class);
    let feed_per_second = feed / 60.0;

    (distance / feed_per_second).max(MIN_SEGMENT_DURATION)
}

/// Linear per-axis interpolation; `fraction` is used as given
pub fn interpolate_position(a: &Point3D, b: &Point3D, fraction: f64) -> Point3D {
    a.lerp(b, fraction)
}

/// Size for the tool position marker, proportional to the part
pub fn adaptive_pointer_scale(program: &CompiledProgram) -> f64 {
    (program.bounds.max_extent() * POINTER_SCALE_FACTOR).clamp(MIN_POINTER_SCALE, MAX_POINTER_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::compile;

    #[test]
    fn test_out_of_range_is_fallback() {
        let program = compile("G1 X10 F600");
        assert_eq!(segment_duration(&program, 0, 5), FALLBACK_SEGMENT_DURATION);
        assert_eq!(segment_duration(&program, 7, 1), FALLBACK_SEGMENT_DURATION);
    }

    #[test]
    fn test_cutting_uses_feed() {
        // 10 mm at 600 mm/min = 1 s
        let program = compile("G1 X10 F600");
        assert!((segment_duration(&program, 0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rapid_ignores_feed() {
        // 100 mm at 2000 mm/min = 3 s
        let program = compile("G0 X100 F10");
        assert!((segment_duration(&program, 0, 1) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_or_zero_feed_uses_default() {
        let program = compile("G1 X50\nG1 X100 F0");
        assert!((segment_duration(&program, 0, 1) - 6.0).abs() < 1e-12);
        assert!((segment_duration(&program, 1, 2) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_length_is_floored() {
        let program = compile("G1 X0 F100");
        assert_eq!(segment_duration(&program, 0, 1), MIN_SEGMENT_DURATION);
    }

    #[test]
    fn test_pointer_scale_clamped() {
        assert_eq!(adaptive_pointer_scale(&compile("")), 0.02);
        assert_eq!(adaptive_pointer_scale(&compile("G0 X0.1")), MIN_POINTER_SCALE);
        assert_eq!(adaptive_pointer_scale(&compile("G0 X100")), MAX_POINTER_SCALE);
        assert!((adaptive_pointer_scale(&compile("G0 X2")) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_position() {
        let a = Point3D::new(0.0, 0.0, 0.0);
        let b = Point3D::new(10.0, 20.0, -4.0);
        assert_eq!(interpolate_position(&a, &b, 0.0), a);
        assert_eq!(interpolate_position(&a, &b, 1.0), b);
        assert_eq!(interpolate_position(&a, &b, 0.25), Point3D::new(2.5, 5.0, -1.0));
    }
}
