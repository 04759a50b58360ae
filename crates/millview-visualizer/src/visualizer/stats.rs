//! Toolpath statistics

use serde::{Deserialize, Serialize};

use super::kinematics::resolve_feed_rate;
use super::toolpath::{CompiledProgram, MoveClass};

/// Aggregate distances, counts and time estimate for a toolpath
///
/// Counts are per toolpath segment, so one tessellated arc command
/// contributes several cutting and arc moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolpathStats {
    pub total_distance: f64,
    pub rapid_distance: f64,
    pub cutting_distance: f64,
    pub estimated_time_seconds: f64,
    pub rapid_move_count: usize,
    pub cutting_move_count: usize,
    pub arc_move_count: usize,
}

impl ToolpathStats {
    pub fn move_count(&self) -> usize {
        self.rapid_move_count + self.cutting_move_count
    }
}

/// Walk consecutive point pairs once, classifying by the destination point
pub fn aggregate_statistics(program: &CompiledProgram) -> ToolpathStats {
    let mut stats = ToolpathStats::default();
    let mut minutes = 0.0;

    for pair in program.toolpath.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let distance = prev.position.distance_to(&curr.position);
        let command = program.command_for_line(curr.source_line);

        stats.total_distance += distance;
        minutes += distance / resolve_feed_rate(command, curr.move_class);

        match curr.move_class {
            MoveClass::Rapid => {
                stats.rapid_distance += distance;
                stats.rapid_move_count += 1;
            }
            MoveClass::Cutting => {
                stats.cutting_distance += distance;
                stats.cutting_move_count += 1;
                if command.is_some_and(|c| c.motion_type.is_arc()) {
                    stats.arc_move_count += 1;
                }
            }
        }
    }

    stats.estimated_time_seconds = minutes * 60.0;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::compile;

    #[test]
    fn test_empty_program_stats() {
        assert_eq!(aggregate_statistics(&compile("")), ToolpathStats::default());
    }

    #[test]
    fn test_mixed_moves() {
        let program = compile("G0 X10\nG1 X10 Y10 F300\nG1 X0 Y10");
        let stats = aggregate_statistics(&program);
        assert_eq!(stats.rapid_move_count, 1);
        assert_eq!(stats.cutting_move_count, 2);
        assert_eq!(stats.arc_move_count, 0);
        assert_eq!(stats.rapid_distance, 10.0);
        assert_eq!(stats.cutting_distance, 20.0);
        assert_eq!(stats.total_distance, 30.0);
        // 10/2000 + 10/300 + 10/500 minutes
        let expected = (10.0 / 2000.0 + 10.0 / 300.0 + 10.0 / 500.0) * 60.0;
        assert!((stats.estimated_time_seconds - expected).abs() < 1e-9);
    }

    #[test]
    fn test_arc_segments_counted() {
        let program = compile("G2 X10 Y0 I5 J0 F100");
        let stats = aggregate_statistics(&program);
        assert_eq!(stats.arc_move_count, 16);
        assert_eq!(stats.cutting_move_count, 16);
        assert_eq!(stats.move_count(), 16);
        // half circumference of r=5
        assert!((stats.cutting_distance - 5.0 * std::f64::consts::PI).abs() < 0.1);
    }
}
