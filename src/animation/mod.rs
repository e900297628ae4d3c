//! Cooperative, cancellable, pausable timed phases.
//!
//! A [`phase::Phase`] is advanced by explicit ticks from a [`clock::FrameClock`]; nothing here
//! spawns threads or sleeps. Cancellation and pause are flags in a shared
//! [`control::AnimationControl`] that the phase checks at every tick.

/// Monotonic frame clocks.
pub mod clock;
/// Cancel/pause signal shared between a driver and a running phase.
pub mod control;
/// Easing curves.
pub mod ease;
/// Single timed phase and the blocking `run_phase` driver.
pub mod phase;
