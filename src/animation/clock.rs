use std::time::Duration;

use crate::foundation::core::{Fps, FrameIndex};

/// Source of display-synchronized ticks.
///
/// `now` is the time of the current frame relative to an arbitrary origin; it never decreases.
pub trait FrameClock {
    /// Timestamp of the current frame.
    fn now(&self) -> Duration;

    /// Advance to the next frame (blocking until it is due, for real-time clocks).
    fn next_frame(&mut self);
}

/// Virtual clock stepping exactly one frame of `fps` per tick.
///
/// Timestamps are derived from the frame count, so long runs never drift.
#[derive(Clone, Copy, Debug)]
pub struct FixedStepClock {
    fps: Fps,
    frame: u64,
}

impl FixedStepClock {
    /// Clock at frame 0.
    pub fn new(fps: Fps) -> Self {
        Self { fps, frame: 0 }
    }

    /// Frame rate of this clock.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Index of the current frame.
    pub fn frame(&self) -> FrameIndex {
        FrameIndex(self.frame)
    }
}

impl FrameClock for FixedStepClock {
    fn now(&self) -> Duration {
        self.fps.frames_to_duration(self.frame)
    }

    fn next_frame(&mut self) {
        self.frame = self.frame.saturating_add(1);
    }
}

impl<C: FrameClock + ?Sized> FrameClock for &mut C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn next_frame(&mut self) {
        (**self).next_frame();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
