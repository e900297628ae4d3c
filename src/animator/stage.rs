use crate::animation::phase::Phase;
use crate::map::view::Camera;

/// Externally visible state of a [`RouteAnimator`](crate::animator::RouteAnimator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimatorPhase {
    /// No run in progress.
    Idle,
    /// Flying from the current camera to the first destination.
    FlyToFirst,
    /// Holding at destination `i`.
    PauseAt(usize),
    /// Flying from destination `i` to `i + 1`.
    Segment(usize),
    /// Full route restored; zooming out to fit every destination.
    ZoomToFit,
    /// Short hold before returning to idle.
    Settle,
}

impl AnimatorPhase {
    /// Whether a run is in progress.
    pub fn is_running(self) -> bool {
        self != Self::Idle
    }
}

#[derive(Debug)]
pub(crate) enum Stage {
    Idle,
    FlyToFirst {
        phase: Phase,
        from: Camera,
        to: Camera,
    },
    PauseAt {
        index: usize,
        phase: Phase,
    },
    Segment {
        index: usize,
        phase: Phase,
    },
    ZoomToFit {
        phase: Phase,
        from: Camera,
        to: Camera,
    },
    Settle {
        phase: Phase,
    },
}

impl Stage {
    pub(crate) fn public(&self) -> AnimatorPhase {
        match self {
            Self::Idle => AnimatorPhase::Idle,
            Self::FlyToFirst { .. } => AnimatorPhase::FlyToFirst,
            Self::PauseAt { index, .. } => AnimatorPhase::PauseAt(*index),
            Self::Segment { index, .. } => AnimatorPhase::Segment(*index),
            Self::ZoomToFit { .. } => AnimatorPhase::ZoomToFit,
            Self::Settle { .. } => AnimatorPhase::Settle,
        }
    }

    /// Whether this stage's clock follows the playback speed.
    pub(crate) fn speed_scaled(&self) -> bool {
        !matches!(self, Self::ZoomToFit { .. } | Self::Settle { .. })
    }
}
