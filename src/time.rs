//! Frame timing for the scheduler.
//!
//! The field itself is tick-based and ignores wall time; the clock only
//! exists to count frames and report the refresh rate the loop is
//! actually achieving.

use std::time::{Duration, Instant};

/// Frame counter with a periodically refreshed FPS estimate.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    /// Frame count and time at the last FPS refresh.
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Clock that refreshes its FPS estimate every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frame_count: 0,
            fps_frame_count: 0,
            fps_update_time: Instant::now(),
            fps_update_interval: interval,
        }
    }

    /// Record a completed frame.
    ///
    /// Returns the new FPS estimate when one was computed this frame.
    pub fn tick(&mut self) -> Option<f32> {
        self.frame_count += 1;

        let now = Instant::now();
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed < self.fps_update_interval {
            return None;
        }

        let frames_since = self.frame_count - self.fps_frame_count;
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        Some(frames_since as f32 / fps_elapsed.as_secs_f32())
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
