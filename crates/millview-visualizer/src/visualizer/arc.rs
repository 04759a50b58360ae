//! Circular arc tessellation for G2/G3 moves

use std::f64::consts::PI;

use super::toolpath::{MoveClass, Point3D, ToolpathPoint};

/// Upper bound on the angle subtended by one tessellated segment
const MAX_SEGMENT_ANGLE: f64 = PI / 16.0;
const MIN_ARC_SEGMENTS: usize = 8;

/// Tessellate an arc into cutting points
///
/// The center is `start + (i, j)` and the radius is `hypot(i, j)`. Points
/// follow that circle even when `end` is not on it, so the last point only
/// matches the commanded end for self-consistent input. Z is interpolated
/// linearly; helical pitch (K) is not modeled. The start point itself is
/// not emitted.
pub fn tessellate_arc(
    start: Point3D,
    end: Point3D,
    i: f64,
    j: f64,
    clockwise: bool,
    source_line: usize,
) -> Vec<ToolpathPoint> {
    let center_x = start.x + i;
    let center_y = start.y + j;
    let radius = i.hypot(j);

    let start_angle = (start.y - center_y).atan2(start.x - center_x);
    let mut end_angle = (end.y - center_y).atan2(end.x - center_x);

    if clockwise {
        if end_angle >= start_angle {
            end_angle -= 2.0 * PI;
        }
    } else if end_angle <= start_angle {
        end_angle += 2.0 * PI;
    }

    let sweep = end_angle - start_angle;
    let segments = ((sweep.abs() / MAX_SEGMENT_ANGLE).ceil() as usize).max(MIN_ARC_SEGMENTS);

    (1..=segments)
        .map(|step| {
            let t = step as f64 / segments as f64;
            let angle = start_angle + sweep * t;
            ToolpathPoint {
                position: Point3D::new(
                    center_x + radius * angle.cos(),
                    center_y + radius * angle.sin(),
                    start.z + (end.z - start.z) * t,
                ),
                move_class: MoveClass::Cutting,
                source_line,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_half_circle_clockwise() {
        let points = tessellate_arc(
            Point3D::origin(),
            Point3D::new(10.0, 0.0, 0.0),
            5.0,
            0.0,
            true,
            3,
        );
        assert_eq!(points.len(), 16);

        let last = points.last().unwrap().position;
        assert!((last.x - 10.0).abs() < EPS);
        assert!(last.y.abs() < EPS);

        for p in &points {
            let r = (p.position.x - 5.0).hypot(p.position.y);
            assert!((r - 5.0).abs() < EPS);
            assert_eq!(p.move_class, MoveClass::Cutting);
            assert_eq!(p.source_line, 3);
        }
        // clockwise from (0,0) around (5,0) passes through positive Y
        assert!(points[7].position.y > 0.0);
    }

    #[test]
    fn test_half_circle_counter_clockwise() {
        let points = tessellate_arc(
            Point3D::origin(),
            Point3D::new(10.0, 0.0, 0.0),
            5.0,
            0.0,
            false,
            0,
        );
        assert!(points[7].position.y < 0.0);
    }

    #[test]
    fn test_small_arc_uses_minimum_segments() {
        let start = Point3D::new(10.0, 0.0, 0.0);
        let end = Point3D::new(10.0 * 0.1f64.cos(), 10.0 * 0.1f64.sin(), 0.0);
        let points = tessellate_arc(start, end, -10.0, 0.0, false, 0);
        assert_eq!(points.len(), 8);
    }

    #[test]
    fn test_coincident_endpoints_make_full_circle() {
        let start = Point3D::new(10.0, 0.0, 0.0);
        let points = tessellate_arc(start, start, -10.0, 0.0, true, 0);
        assert_eq!(points.len(), 32);
        let last = points.last().unwrap().position;
        assert!((last.x - 10.0).abs() < EPS);
        assert!(last.y.abs() < EPS);
    }

    #[test]
    fn test_z_is_interpolated() {
        let points = tessellate_arc(
            Point3D::origin(),
            Point3D::new(10.0, 0.0, -4.0),
            5.0,
            0.0,
            true,
            0,
        );
        assert!((points[7].position.z + 2.0).abs() < EPS);
        assert!((points[15].position.z + 4.0).abs() < EPS);
    }

    #[test]
    fn test_inconsistent_radius_is_not_snapped() {
        let points = tessellate_arc(
            Point3D::origin(),
            Point3D::new(12.0, 0.0, 0.0),
            5.0,
            0.0,
            true,
            0,
        );
        let last = points.last().unwrap().position;
        assert!((last.x - 10.0).abs() < EPS);
    }
}
