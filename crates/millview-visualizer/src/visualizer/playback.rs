//! Playback controller
//!
//! Drives a tool marker along the toolpath one segment at a time. Callers
//! feed elapsed wall time through [`PlaybackState::tick`]; the controller
//! converts it into progress through the current segment using the
//! segment's duration, and stops at the final point.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::kinematics::{interpolate_position, segment_duration};
use super::toolpath::{CompiledProgram, Point3D};

pub const MIN_PLAYBACK_SPEED: f64 = 0.25;
pub const MAX_PLAYBACK_SPEED: f64 = 4.0;
/// Speeds offered by the speed menu
pub const SPEED_OPTIONS: [f64; 5] = [0.25, 0.5, 1.0, 2.0, 4.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Index of the toolpath point the tool last reached
    pub current_index: usize,
    /// Fraction of the way to the next point, in [0, 1)
    pub progress: f64,
    pub is_playing: bool,
    /// Speed multiplier
    pub speed: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_index: 0,
            progress: 0.0,
            is_playing: false,
            speed: 1.0,
        }
    }
}

/// Clamp a requested speed into the supported range
///
/// Returns `None` for NaN, infinite, zero or negative speeds.
pub fn clamp_speed(speed: f64) -> Option<f64> {
    (speed.is_finite() && speed > 0.0)
        .then(|| speed.clamp(MIN_PLAYBACK_SPEED, MAX_PLAYBACK_SPEED))
}

impl PlaybackState {
    /// Unusable speeds fall back to 1x
    pub fn new(speed: f64) -> Self {
        let defaults = Self::default();
        Self {
            speed: clamp_speed(speed).unwrap_or(defaults.speed),
            ..defaults
        }
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    pub fn toggle(&mut self) {
        self.is_playing = !self.is_playing;
    }

    /// Pause and rewind to the first point
    pub fn stop(&mut self) {
        self.is_playing = false;
        self.current_index = 0;
        self.progress = 0.0;
    }

    /// Rewind without touching play state or speed; used when a new program is published
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.progress = 0.0;
    }

    pub fn step_forward(&mut self, program: &CompiledProgram) {
        self.current_index = (self.current_index + 1).min(program.last_index());
        self.progress = 0.0;
    }

    pub fn step_backward(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
        self.progress = 0.0;
    }

    /// Jump to a point, clamped into range
    pub fn seek(&mut self, program: &CompiledProgram, index: usize) {
        self.current_index = index.min(program.last_index());
        self.progress = 0.0;
    }

    /// Jump to a fraction of the toolpath (scrub bar position)
    pub fn seek_fraction(&mut self, program: &CompiledProgram, fraction: f64) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let index = (fraction * program.last_index() as f64).floor() as usize;
        self.seek(program, index);
    }

    /// Set the multiplier, clamped into range; returns false and keeps the
    /// current speed if `speed` is unusable
    pub fn set_speed(&mut self, speed: f64) -> bool {
        match clamp_speed(speed) {
            Some(speed) => {
                self.speed = speed;
                true
            }
            None => false,
        }
    }

    pub fn speed_up(&mut self) {
        self.speed = (self.speed * 2.0).min(MAX_PLAYBACK_SPEED);
    }

    pub fn speed_down(&mut self) {
        self.speed = (self.speed / 2.0).max(MIN_PLAYBACK_SPEED);
    }

    pub fn is_at_end(&self, program: &CompiledProgram) -> bool {
        self.current_index >= program.last_index()
    }

    /// Advance playback by `elapsed` seconds of wall time
    ///
    /// Progress past the end of a segment is discarded and the index moves
    /// by at most one point per tick. Reaching the final point pauses.
    /// Returns whether the index advanced.
    pub fn tick(&mut self, program: &CompiledProgram, elapsed: f64) -> bool {
        if !self.is_playing {
            return false;
        }
        if self.is_at_end(program) {
            self.is_playing = false;
            return false;
        }

        // A stalled or backwards clock must not move the tool
        let elapsed = if elapsed.is_finite() && elapsed > 0.0 {
            elapsed
        } else {
            0.0
        };
        let duration = segment_duration(program, self.current_index, self.current_index + 1);
        self.progress += elapsed * self.speed / duration;

        if self.progress < 1.0 {
            return false;
        }

        self.progress = 0.0;
        self.current_index += 1;
        if self.is_at_end(program) {
            debug!("Playback reached end at index {}", self.current_index);
            self.is_playing = false;
        }
        true
    }

    /// Interpolated tool position for the current index and progress
    pub fn tool_position(&self, program: &CompiledProgram) -> Point3D {
        let Some(current) = program.point(self.current_index) else {
            return program
                .toolpath
                .last()
                .map(|p| p.position)
                .unwrap_or_default();
        };
        match program.point(self.current_index + 1) {
            Some(next) => interpolate_position(&current.position, &next.position, self.progress),
            None => current.position,
        }
    }

    pub fn percent_complete(&self, program: &CompiledProgram) -> f64 {
        let last = program.last_index();
        if last == 0 {
            return 0.0;
        }
        self.current_index.min(last) as f64 / last as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::compile;

    fn square() -> CompiledProgram {
        compile("G1 X10 F600\nG1 Y10\nG1 X0\nG1 Y0")
    }

    #[test]
    fn test_transport_controls() {
        let mut state = PlaybackState::default();
        state.play();
        assert!(state.is_playing);
        state.toggle();
        assert!(!state.is_playing);
        state.current_index = 3;
        state.progress = 0.5;
        state.play();
        state.stop();
        assert_eq!(state, PlaybackState::default());
    }

    #[test]
    fn test_stepping_clamps() {
        let program = square();
        let mut state = PlaybackState::default();
        state.step_backward();
        assert_eq!(state.current_index, 0);
        for _ in 0..10 {
            state.step_forward(&program);
        }
        assert_eq!(state.current_index, 4);
    }

    #[test]
    fn test_seek() {
        let program = square();
        let mut state = PlaybackState::default();
        state.progress = 0.3;
        state.seek(&program, 99);
        assert_eq!(state.current_index, 4);
        assert_eq!(state.progress, 0.0);
        state.seek_fraction(&program, 0.6);
        assert_eq!(state.current_index, 2);
        state.seek_fraction(&program, f64::NAN);
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn test_speed_limits() {
        let mut state = PlaybackState::default();
        state.speed_up();
        state.speed_up();
        state.speed_up();
        assert_eq!(state.speed, MAX_PLAYBACK_SPEED);
        for _ in 0..6 {
            state.speed_down();
        }
        assert_eq!(state.speed, MIN_PLAYBACK_SPEED);
    }

    #[test]
    fn test_tick_accumulates_and_discards_excess() {
        // each segment is 10 mm at 600 mm/min = 1 s
        let program = square();
        let mut state = PlaybackState::default();
        state.play();

        assert!(!state.tick(&program, 0.5));
        assert!((state.progress - 0.5).abs() < 1e-12);
        assert_eq!(state.tool_position(&program), Point3D::new(5.0, 0.0, 0.0));

        assert!(state.tick(&program, 0.9));
        assert_eq!(state.current_index, 1);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_tick_respects_speed() {
        let program = square();
        let mut state = PlaybackState::new(2.0);
        state.play();
        assert!(!state.tick(&program, 0.25));
        assert!((state.progress - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unusable_speed_is_rejected() {
        let program = square();
        let mut state = PlaybackState::new(f64::NAN);
        assert_eq!(state.speed, 1.0);

        assert!(!state.set_speed(f64::NAN));
        assert!(!state.set_speed(-1.0));
        assert!(!state.set_speed(0.0));
        assert!(!state.set_speed(f64::INFINITY));
        assert_eq!(state.speed, 1.0);

        state.play();
        assert!(!state.tick(&program, 0.0));
        assert_eq!(state.current_index, 0);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut state = PlaybackState::new(10.0);
        assert_eq!(state.speed, MAX_PLAYBACK_SPEED);
        assert!(state.set_speed(0.01));
        assert_eq!(state.speed, MIN_PLAYBACK_SPEED);
    }

    #[test]
    fn test_bad_elapsed_time_is_ignored() {
        let program = square();
        let mut state = PlaybackState::default();
        state.play();
        assert!(!state.tick(&program, 0.5));
        for elapsed in [-1.0, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
            assert!(!state.tick(&program, elapsed));
        }
        assert_eq!(state.current_index, 0);
        assert!((state.progress - 0.5).abs() < 1e-12);
        assert_eq!(state.tool_position(&program), Point3D::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_auto_pause_at_end() {
        let program = square();
        let mut state = PlaybackState::default();
        state.play();
        let mut ticks = 0;
        while state.is_playing && ticks < 1000 {
            state.tick(&program, 1.0 / 60.0);
            ticks += 1;
        }
        assert!(!state.is_playing);
        assert_eq!(state.current_index, 4);
        assert_eq!(state.percent_complete(&program), 100.0);
        assert_eq!(state.tool_position(&program), Point3D::origin());
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let program = square();
        let mut state = PlaybackState::default();
        assert!(!state.tick(&program, 10.0));
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn test_single_point_program() {
        let program = compile("");
        let mut state = PlaybackState::default();
        state.play();
        assert!(!state.tick(&program, 1.0));
        assert!(!state.is_playing);
        assert_eq!(state.percent_complete(&program), 0.0);
    }
}
