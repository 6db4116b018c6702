//! Time management utilities
//!
//! The engine never reads a wall clock on its own. The host passes a
//! timestamp in milliseconds into every tick, which keeps simulations
//! deterministic and lets tests feed synthetic times.

use crate::foundation::math::Size;

/// Per-frame timing and canvas state threaded through update and draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Timestamp of this frame in milliseconds
    pub now: f64,
    /// Milliseconds elapsed since the previous frame
    pub delta_time: f64,
    /// Canvas size in game units
    pub canvas_size: Size,
    /// Ratio between device pixels and game units
    pub canvas_scale: f32,
}

impl FrameContext {
    /// Context for a frame at `now`
    pub fn new(now: f64, delta_time: f64, canvas_size: Size, canvas_scale: f32) -> Self {
        Self {
            now,
            delta_time,
            canvas_size,
            canvas_scale,
        }
    }
}

/// Frame clock fed with host timestamps (should be advanced once per frame)
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Option<f64>,
    now: f64,
    delta_time: f64,
    total_time: f64,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock that has not seen any frame yet
    pub const fn new() -> Self {
        Self {
            last_frame: None,
            now: 0.0,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance to the frame at `now` (milliseconds)
    ///
    /// The first frame has a delta of zero. Timestamps that go backwards are
    /// treated as a zero-length frame.
    pub fn advance(&mut self, now: f64) {
        self.delta_time = match self.last_frame {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        self.total_time += self.delta_time;
        self.last_frame = Some(now);
        self.now = now;
        self.frame_count += 1;
    }

    /// Timestamp of the current frame in milliseconds
    pub const fn now(&self) -> f64 {
        self.now
    }

    /// Milliseconds since the previous frame
    pub const fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Total milliseconds covered by all frames so far
    pub const fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Number of frames seen
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since the first frame
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f64 {
        if self.total_time > 0.0 {
            (self.frame_count.saturating_sub(1)) as f64 * 1000.0 / self.total_time
        } else {
            0.0
        }
    }

    /// Frames per second based on the last frame time
    pub fn current_fps(&self) -> f64 {
        if self.delta_time > 0.0 {
            1000.0 / self.delta_time
        } else {
            0.0
        }
    }
}
