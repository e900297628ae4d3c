use std::time::Duration;

use crate::animation::clock::FrameClock;
use crate::animation::control::AnimationControl;

/// Result of advancing a phase by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhaseStep {
    /// The run was cancelled; no frame should be drawn.
    Cancelled,
    /// Draw a frame at linear `progress`; `done` is set on the final frame.
    Frame {
        /// Linear progress in `[0, 1]`.
        progress: f64,
        /// Whether this is the final frame of the phase.
        done: bool,
    },
}

/// Terminal-or-not status after [`Phase::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseStatus {
    /// More ticks needed.
    Pending,
    /// Ran to completion.
    Completed,
    /// Cancelled mid-flight.
    Cancelled,
}

/// One timed unit of animated work.
///
/// Elapsed time accrues per tick as `delta * speed`, except while paused. Progress is linear;
/// easing is left to the caller.
#[derive(Clone, Debug)]
pub struct Phase {
    duration_ns: f64,
    accrued_ns: f64,
    last: Duration,
    finished: Option<PhaseStatus>,
}

impl Phase {
    /// Phase of `duration_ms` whose clock starts at `started_at`.
    pub fn new(duration_ms: u64, started_at: Duration) -> Self {
        Self {
            duration_ns: duration_ms as f64 * 1_000_000.0,
            accrued_ns: 0.0,
            last: started_at,
            finished: None,
        }
    }

    /// Nominal duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ns / 1_000_000.0
    }

    /// Current linear progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration_ns <= 0.0 {
            return if self.finished == Some(PhaseStatus::Completed) {
                1.0
            } else {
                0.0
            };
        }
        (self.accrued_ns / self.duration_ns).clamp(0.0, 1.0)
    }

    /// Terminal status, once reached.
    pub fn finished(&self) -> Option<PhaseStatus> {
        self.finished
    }

    /// Advance to `now`.
    ///
    /// Cancellation wins over everything else, including pause. While paused the clock still
    /// moves forward, so no time is accrued for the paused span on resume.
    pub fn advance(&mut self, now: Duration, control: &AnimationControl, speed: f64) -> PhaseStep {
        match self.finished {
            Some(PhaseStatus::Cancelled) => return PhaseStep::Cancelled,
            Some(_) => {
                return PhaseStep::Frame {
                    progress: 1.0,
                    done: true,
                };
            }
            None => {}
        }
        if control.is_cancelled() {
            self.finished = Some(PhaseStatus::Cancelled);
            return PhaseStep::Cancelled;
        }

        let delta = now.saturating_sub(self.last);
        self.last = self.last.max(now);
        if !control.is_paused() && speed.is_finite() && speed > 0.0 {
            self.accrued_ns += delta.as_nanos() as f64 * speed;
        }

        let progress = if self.duration_ns <= 0.0 {
            1.0
        } else {
            (self.accrued_ns / self.duration_ns).min(1.0)
        };
        let done = progress >= 1.0;
        if done {
            self.finished = Some(PhaseStatus::Completed);
        }
        PhaseStep::Frame { progress, done }
    }

    /// Advance to `now`, reading the speed and reporting the frame through callbacks.
    ///
    /// `on_frame` is never called once the phase is cancelled.
    pub fn tick(
        &mut self,
        now: Duration,
        control: &AnimationControl,
        speed: impl FnOnce() -> f64,
        on_frame: impl FnOnce(f64),
    ) -> PhaseStatus {
        if control.is_cancelled() {
            self.finished.get_or_insert(PhaseStatus::Cancelled);
        }
        if let Some(status) = self.finished {
            return status;
        }
        match self.advance(now, control, speed()) {
            PhaseStep::Cancelled => PhaseStatus::Cancelled,
            PhaseStep::Frame { progress, done } => {
                on_frame(progress);
                if done {
                    PhaseStatus::Completed
                } else {
                    PhaseStatus::Pending
                }
            }
        }
    }
}

/// Drive a phase of `duration_ms` to completion on `clock`.
///
/// The first tick happens one frame after the call. Returns `true` when the phase completed and
/// `false` when it was cancelled.
pub fn run_phase(
    mut clock: impl FrameClock,
    duration_ms: u64,
    control: &AnimationControl,
    mut on_frame: impl FnMut(f64),
    speed: impl Fn() -> f64,
) -> bool {
    let mut phase = Phase::new(duration_ms, clock.now());
    loop {
        clock.next_frame();
        match phase.tick(clock.now(), control, &speed, &mut on_frame) {
            PhaseStatus::Pending => {}
            PhaseStatus::Completed => return true,
            PhaseStatus::Cancelled => return false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/phase.rs"]
mod tests;
