//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Monotonic frame clock. The game loop reads `delta_seconds()` once per frame
/// and hands it to the simulation; nothing assumes a fixed timestep.
#[derive(Debug)]
pub struct Time {
    /// Time when the loop started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new frame clock.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.elapsed = now.saturating_duration_since(self.start_time);
        self.frame_count += 1;
    }

    /// Forget the time spent while the loop was not ticking (focus lost, minimised),
    /// so the next frame does not see one enormous delta.
    pub fn resync(&mut self) {
        self.last_frame = Instant::now();
        self.delta = Duration::ZERO;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_advances_frames_and_resync_clears_delta() {
        let mut time = Time::new();
        time.update();
        time.update();
        assert_eq!(time.frame_count(), 2);
        assert!(time.delta_seconds() >= 0.0);
        time.resync();
        assert_eq!(time.delta(), Duration::ZERO);
        assert_eq!(time.fps(), 0.0);
    }
}
