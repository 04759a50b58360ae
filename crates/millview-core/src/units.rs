//! Display formatting for lengths, feeds and durations
//!
//! All lengths are in millimeters and all feeds in mm/min.

/// Format a path length for display
///
/// * `value_mm` - Length in millimeters
///
/// Lengths of a meter or more switch to meters with two decimals.
pub fn format_distance(value_mm: f64) -> String {
    if value_mm >= 1000.0 {
        format!("{:.2} m", value_mm / 1000.0)
    } else {
        format!("{:.1} mm", value_mm)
    }
}

/// Format a duration in seconds as `1h 5m`, `3m 20s` or `12.5s`
pub fn format_duration(seconds: f64) -> String {
    if seconds >= 3600.0 {
        let hours = (seconds / 3600.0).floor();
        let mins = ((seconds % 3600.0) / 60.0).floor();
        format!("{}h {}m", hours, mins)
    } else if seconds >= 60.0 {
        let mins = (seconds / 60.0).floor();
        let secs = (seconds % 60.0).floor();
        format!("{}m {}s", mins, secs)
    } else {
        format!("{:.1}s", seconds)
    }
}

/// Format a single axis coordinate (3 decimal places)
pub fn format_coordinate(value: f64) -> String {
    format!("{:.3}", value)
}

/// Format feed rate value for display
pub fn format_feed_rate(value_mm_per_min: f64) -> String {
    format!("{:.0} mm/min", value_mm_per_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0.0 mm");
        assert_eq!(format_distance(12.34), "12.3 mm");
        assert_eq!(format_distance(999.9), "999.9 mm");
        assert_eq!(format_distance(1000.0), "1.00 m");
        assert_eq!(format_distance(2345.0), "2.35 m");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0.0s");
        assert_eq!(format_duration(12.34), "12.3s");
        assert_eq!(format_duration(60.0), "1m 0s");
        assert_eq!(format_duration(200.5), "3m 20s");
        assert_eq!(format_duration(3600.0), "1h 0m");
        assert_eq!(format_duration(3900.0), "1h 5m");
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(1.0), "1.000");
        assert_eq!(format_coordinate(-2.5), "-2.500");
    }

    #[test]
    fn test_format_feed_rate() {
        assert_eq!(format_feed_rate(500.0), "500 mm/min");
    }
}
