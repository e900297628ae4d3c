//! Route fly-through choreography.
//!
//! [`RouteAnimator`] sequences timed phases over a destination list: fly to the first stop,
//! pause, fly each segment along its great-circle arc, pause, then restore the full route and
//! zoom out to fit. It is steppable: the host calls [`RouteAnimator::tick`] once per frame.

/// Per-run driver and its observers.
pub mod route;
/// Phase sequence of a run.
pub mod stage;

pub use route::{RouteAnimator, RunOutcome};
pub use stage::AnimatorPhase;

/// Camera flight from the current pose to the first destination.
pub const FLY_TO_FIRST_MS: u64 = 2000;
/// Flight along one segment, independent of its geographic length.
pub const SEGMENT_MS: u64 = 3000;
/// Final zoom-out to the whole route.
pub const ZOOM_TO_FIT_MS: u64 = 2000;
/// Hold after the zoom-out before returning to idle.
pub const SETTLE_MS: u64 = 500;
/// Zoom used when the list holds a single destination.
pub const SINGLE_DESTINATION_ZOOM: f64 = 6.0;
