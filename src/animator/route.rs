use std::time::Duration;

use crate::animation::clock::FrameClock;
use crate::animation::control::AnimationControl;
use crate::animation::ease::Ease;
use crate::animation::phase::{Phase, PhaseStatus};
use crate::animator::stage::{AnimatorPhase, Stage};
use crate::animator::{
    FLY_TO_FIRST_MS, SEGMENT_MS, SETTLE_MS, SINGLE_DESTINATION_ZOOM, ZOOM_TO_FIT_MS,
};
use crate::foundation::core::LngLat;
use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::geo::bounds::GeoBounds;
use crate::geo::great_circle::compute_arcs;
use crate::geo::mercator::Padding;
use crate::map::view::{Camera, MapView, MarkerId};
use crate::model::destination::DestinationList;
use crate::settings::SettingsStore;

/// How the most recent run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every phase ran to completion.
    Completed,
    /// Cancelled by `stop`, `restart`, a new run or a control handle.
    Cancelled,
    /// Aborted by an error inside a frame.
    Failed,
}

enum Step {
    Continue(Stage),
    Finished(RunOutcome),
}

/// Drives camera, route layer and position indicator of a [`MapView`] through one run at a time.
///
/// Settings are read from the shared [`SettingsStore`] on every tick, so speed, stop zoom and
/// route paint changes apply mid-run. Pause lengths are read when each pause begins.
pub struct RouteAnimator<V: MapView> {
    view: V,
    settings: SettingsStore,
    destinations: DestinationList,
    arcs: Vec<Vec<LngLat>>,
    control: AnimationControl,
    stage: Stage,
    indicator: Option<MarkerId>,
    stop_markers: Vec<MarkerId>,
    progress: f64,
    restart_pending: bool,
    last_outcome: Option<RunOutcome>,
}

impl<V: MapView> RouteAnimator<V> {
    /// Wrap `view`, applying the current settings' paint and style.
    pub fn new(mut view: V, settings: SettingsStore) -> Self {
        let s = settings.get();
        view.set_route_paint(s.route_paint());
        view.set_map_style(s.map_style);
        Self {
            view,
            settings,
            destinations: DestinationList::default(),
            arcs: Vec::new(),
            control: AnimationControl::new(),
            stage: Stage::Idle,
            indicator: None,
            stop_markers: Vec::new(),
            progress: 0.0,
            restart_pending: false,
            last_outcome: None,
        }
    }

    /// Replace the destination list.
    ///
    /// Stops any run, recomputes arcs, shows the full route with one marker per stop and frames
    /// the destinations.
    pub fn set_destinations(&mut self, destinations: DestinationList) {
        self.stop();
        for id in self.stop_markers.drain(..) {
            self.view.remove_marker(id);
        }
        self.arcs = compute_arcs(destinations.as_slice());
        self.stop_markers = destinations
            .iter()
            .map(|d| self.view.add_marker(d.position()))
            .collect();
        self.destinations = destinations;
        self.view.set_route(self.arcs.clone());

        if !self.view.is_ready() {
            return;
        }
        if self.destinations.len() == 1 {
            if let Some(only) = self.destinations.iter().next() {
                self.view.set_camera(Camera {
                    center: only.position(),
                    zoom: SINGLE_DESTINATION_ZOOM,
                });
            }
        } else if let Some(camera) = self.fit_all() {
            self.view.set_camera(camera);
        }
    }

    /// Start a new run at `now`.
    ///
    /// Returns `false` (and changes nothing) with fewer than two destinations or a view that is
    /// not ready. Any previous run is cancelled first.
    pub fn start(&mut self, now: Duration) -> bool {
        let Some(first) = self.destinations.iter().next().map(|d| d.position()) else {
            return false;
        };
        if self.destinations.len() < 2 || !self.view.is_ready() {
            tracing::debug!(
                destinations = self.destinations.len(),
                ready = self.view.is_ready(),
                "route animation not started"
            );
            return false;
        }

        // A pending restart already installed the control for this run.
        if self.restart_pending {
            self.restart_pending = false;
        } else {
            self.control.cancel();
            self.control = AnimationControl::new();
        }
        self.teardown_indicator();
        self.apply_live_paint();

        let from = self.view.camera();
        let to = Camera {
            center: first,
            zoom: self.settings.stop_zoom(),
        };
        self.view.set_route(Vec::new());
        self.indicator = Some(self.view.add_marker(from.center));
        self.progress = 0.0;
        self.stage = Stage::FlyToFirst {
            phase: Phase::new(FLY_TO_FIRST_MS, now),
            from,
            to,
        };
        tracing::info!(
            destinations = self.destinations.len(),
            segments = self.arcs.len(),
            "route animation started"
        );
        true
    }

    /// Advance the current run to `now`.
    ///
    /// Errors abort the run (indicator removed, state back to idle) and are returned.
    pub fn tick(&mut self, now: Duration) -> FlyPathResult<()> {
        if self.restart_pending {
            self.start(now);
            self.restart_pending = false;
            return Ok(());
        }
        let stage = std::mem::replace(&mut self.stage, Stage::Idle);
        if matches!(stage, Stage::Idle) {
            return Ok(());
        }
        self.apply_live_paint();

        let control = self.control.clone();
        match self.step(stage, now, &control) {
            Ok(Step::Continue(next)) => {
                self.stage = next;
                Ok(())
            }
            Ok(Step::Finished(outcome)) => {
                self.end_run(outcome);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "route animation aborted");
                self.control.cancel();
                self.end_run(RunOutcome::Failed);
                Err(e)
            }
        }
    }

    /// Start a run and tick it on `clock` until it ends.
    ///
    /// Returns `None` when the run could not start.
    pub fn play(&mut self, mut clock: impl FrameClock) -> FlyPathResult<Option<RunOutcome>> {
        if !self.start(clock.now()) {
            return Ok(None);
        }
        while self.is_running() {
            clock.next_frame();
            self.tick(clock.now())?;
        }
        Ok(self.last_outcome)
    }

    /// Toggle pause of the current run and return the new paused state (`false` when idle).
    pub fn toggle_pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.control.toggle_pause()
    }

    /// Cancel the current run and start a fresh one on the next tick.
    ///
    /// The new run's control is live immediately, so a pause toggled before that tick applies to
    /// the fresh run.
    pub fn restart(&mut self) {
        self.control.cancel();
        if self.phase().is_running() {
            self.end_run(RunOutcome::Cancelled);
        }
        self.control = AnimationControl::new();
        self.restart_pending = true;
    }

    /// Cancel the current run and go idle, leaving the route as last drawn.
    pub fn stop(&mut self) {
        self.control.cancel();
        self.restart_pending = false;
        if self.is_running() {
            self.end_run(RunOutcome::Cancelled);
        } else {
            self.teardown_indicator();
        }
    }

    /// Current phase.
    pub fn phase(&self) -> AnimatorPhase {
        self.stage.public()
    }

    /// Whether a run is in progress (or a restart is pending).
    pub fn is_running(&self) -> bool {
        self.phase().is_running() || self.restart_pending
    }

    /// Whether the current run is paused.
    pub fn is_paused(&self) -> bool {
        self.is_running() && self.control.is_paused()
    }

    /// Overall progress in `[0, 1]`: completed segments plus eased progress of the current one.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Handle to the current run's control flags.
    pub fn control(&self) -> AnimationControl {
        self.control.clone()
    }

    /// How the last finished run ended.
    pub fn last_outcome(&self) -> Option<RunOutcome> {
        self.last_outcome
    }

    /// Position of the moving indicator while a run is active.
    pub fn indicator_position(&self) -> Option<LngLat> {
        self.indicator.and_then(|id| self.view.marker_position(id))
    }

    /// Borrow the map view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutably borrow the map view.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Current destination list.
    pub fn destinations(&self) -> &DestinationList {
        &self.destinations
    }

    /// Great-circle arcs for the current list, one per consecutive pair.
    pub fn arcs(&self) -> &[Vec<LngLat>] {
        &self.arcs
    }

    /// Shared settings handle.
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    fn step(
        &mut self,
        stage: Stage,
        now: Duration,
        control: &AnimationControl,
    ) -> FlyPathResult<Step> {
        let before = stage.public();
        let speed_scaled = stage.speed_scaled();
        let speed = || {
            if speed_scaled {
                self.settings.speed()
            } else {
                1.0
            }
        };

        let next = match stage {
            Stage::Idle => return Ok(Step::Continue(Stage::Idle)),
            Stage::FlyToFirst {
                mut phase,
                from,
                to,
            } => {
                let indicator = self.indicator;
                let view = &mut self.view;
                let status = phase.tick(now, control, speed, |p| {
                    let camera = from.lerp(to, Ease::InOutCubic.apply(p));
                    view.set_camera(camera);
                    if let Some(id) = indicator {
                        view.move_marker(id, camera.center);
                    }
                });
                match status {
                    PhaseStatus::Pending => Stage::FlyToFirst { phase, from, to },
                    PhaseStatus::Completed => self.pause_stage(0, now),
                    PhaseStatus::Cancelled => return Ok(Step::Finished(RunOutcome::Cancelled)),
                }
            }
            Stage::PauseAt { index, mut phase } => {
                match phase.tick(now, control, speed, |_| {}) {
                    PhaseStatus::Pending => Stage::PauseAt { index, phase },
                    PhaseStatus::Completed if index < self.arcs.len() => Stage::Segment {
                        index,
                        phase: Phase::new(SEGMENT_MS, now),
                    },
                    PhaseStatus::Completed => self.completion_stage(now),
                    PhaseStatus::Cancelled => return Ok(Step::Finished(RunOutcome::Cancelled)),
                }
            }
            Stage::Segment { index, mut phase } => {
                let total = self.arcs.len();
                let arc = self
                    .arcs
                    .get(index)
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| FlyPathError::animation(format!("no arc for segment {index}")))?;
                let completed = &self.arcs[..index];
                let indicator = self.indicator;
                let settings = &self.settings;
                let view = &mut self.view;
                let progress = &mut self.progress;
                let status = phase.tick(now, control, speed, |p| {
                    let eased = Ease::InOutCubic.apply(p);
                    let last = arc.len() - 1;
                    let idx = ((eased * last as f64).floor() as usize).min(last);
                    let point = arc[idx];

                    let stop_zoom = settings.stop_zoom();
                    let min_zoom = (stop_zoom - 4.0).max(3.0).min(6.0);
                    let zoom = stop_zoom
                        - (stop_zoom - min_zoom) * (std::f64::consts::PI * eased).sin();
                    view.set_camera(Camera {
                        center: point,
                        zoom,
                    });

                    let mut route = completed.to_vec();
                    route.push(arc[..=idx].to_vec());
                    view.set_route(route);
                    if let Some(id) = indicator {
                        view.move_marker(id, point);
                    }
                    *progress = ((index as f64 + eased) / total as f64).clamp(0.0, 1.0);
                });
                match status {
                    PhaseStatus::Pending => Stage::Segment { index, phase },
                    PhaseStatus::Completed => self.pause_stage(index + 1, now),
                    PhaseStatus::Cancelled => return Ok(Step::Finished(RunOutcome::Cancelled)),
                }
            }
            Stage::ZoomToFit {
                mut phase,
                from,
                to,
            } => {
                let view = &mut self.view;
                let status = phase.tick(now, control, speed, |p| {
                    view.set_camera(from.lerp(to, Ease::InOutCubic.apply(p)));
                });
                match status {
                    PhaseStatus::Pending => Stage::ZoomToFit { phase, from, to },
                    PhaseStatus::Completed => Stage::Settle {
                        phase: Phase::new(SETTLE_MS, now),
                    },
                    PhaseStatus::Cancelled => return Ok(Step::Finished(RunOutcome::Cancelled)),
                }
            }
            Stage::Settle { mut phase } => match phase.tick(now, control, speed, |_| {}) {
                PhaseStatus::Pending => Stage::Settle { phase },
                PhaseStatus::Completed => return Ok(Step::Finished(RunOutcome::Completed)),
                PhaseStatus::Cancelled => return Ok(Step::Finished(RunOutcome::Cancelled)),
            },
        };

        if next.public() != before {
            tracing::debug!(phase = ?next.public(), progress = self.progress, "phase started");
        }
        Ok(Step::Continue(next))
    }

    fn pause_stage(&self, index: usize, now: Duration) -> Stage {
        Stage::PauseAt {
            index,
            phase: Phase::new(self.settings.pause_ms(), now),
        }
    }

    fn completion_stage(&mut self, now: Duration) -> Stage {
        self.view.set_route(self.arcs.clone());
        self.progress = 1.0;
        let from = self.view.camera();
        let to = self.fit_all().unwrap_or(from);
        Stage::ZoomToFit {
            phase: Phase::new(ZOOM_TO_FIT_MS, now),
            from,
            to,
        }
    }

    fn fit_all(&self) -> Option<Camera> {
        let bounds = GeoBounds::from_points(self.destinations.positions())?;
        Some(
            self.view
                .fit_camera(bounds, Padding::for_viewport(self.view.viewport())),
        )
    }

    fn apply_live_paint(&mut self) {
        let s = self.settings.get();
        self.view.set_route_paint(s.route_paint());
        self.view.set_map_style(s.map_style);
    }

    fn teardown_indicator(&mut self) {
        if let Some(id) = self.indicator.take() {
            self.view.remove_marker(id);
        }
    }

    fn end_run(&mut self, outcome: RunOutcome) {
        self.teardown_indicator();
        self.progress = 0.0;
        self.stage = Stage::Idle;
        self.last_outcome = Some(outcome);
        tracing::info!(?outcome, "route animation finished");
    }
}

impl<V: MapView> Drop for RouteAnimator<V> {
    fn drop(&mut self) {
        self.control.cancel();
        self.teardown_indicator();
        for id in self.stop_markers.drain(..) {
            self.view.remove_marker(id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animator/route.rs"]
mod tests;
