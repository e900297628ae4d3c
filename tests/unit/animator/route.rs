use super::*;
use crate::animation::clock::FixedStepClock;
use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::map::headless::HeadlessMap;
use crate::model::destination::Destination;
use crate::settings::SettingChange;

const MAX_TICKS: usize = 10_000;

struct Rig {
    anim: RouteAnimator<HeadlessMap>,
    clock: FixedStepClock,
}

impl Rig {
    fn new(points: &[(f64, f64)]) -> Self {
        let list = DestinationList::new(
            points
                .iter()
                .enumerate()
                .map(|(i, &(lng, lat))| {
                    Destination::new(format!("d{i}"), format!("D{i}"), "", LngLat::new(lng, lat))
                        .unwrap()
                })
                .collect(),
        )
        .unwrap();
        let mut anim = RouteAnimator::new(
            HeadlessMap::new(Canvas::new(320, 180)),
            SettingsStore::default(),
        );
        anim.set_destinations(list);
        Self {
            anim,
            clock: FixedStepClock::new(Fps::new(100, 1).unwrap()),
        }
    }

    fn start(&mut self) -> bool {
        self.anim.start(self.clock.now())
    }

    fn tick(&mut self) {
        self.clock.next_frame();
        self.anim.tick(self.clock.now()).unwrap();
    }

    fn tick_until(&mut self, phase: AnimatorPhase) -> usize {
        for n in 1..=MAX_TICKS {
            self.tick();
            if self.anim.phase() == phase {
                return n;
            }
        }
        panic!("never reached {phase:?}, stuck in {:?}", self.anim.phase());
    }
}

fn a_to_b() -> Rig {
    Rig::new(&[(0.0, 0.0), (90.0, 0.0)])
}

#[test]
fn two_stop_run_follows_documented_sequence() {
    let mut rig = a_to_b();
    assert!(rig.start());
    assert_eq!(rig.anim.phase(), AnimatorPhase::FlyToFirst);
    assert!(rig.anim.indicator_position().is_some());

    assert_eq!(rig.tick_until(AnimatorPhase::PauseAt(0)), 200);
    let cam = rig.anim.view().camera();
    assert!(cam.center.approx_eq(LngLat::new(0.0, 0.0), 1e-9));
    assert_eq!(cam.zoom, 5.0);
    assert_eq!(rig.anim.progress(), 0.0);

    assert_eq!(rig.tick_until(AnimatorPhase::Segment(0)), 150);
    assert_eq!(rig.tick_until(AnimatorPhase::PauseAt(1)), 300);
    assert_eq!(rig.anim.progress(), 1.0);
    assert_eq!(rig.anim.view().route(), rig.anim.arcs());
    let end = rig.anim.indicator_position().unwrap();
    assert!(end.approx_eq(LngLat::new(90.0, 0.0), 1e-9));

    assert_eq!(rig.tick_until(AnimatorPhase::ZoomToFit), 150);
    assert_eq!(rig.anim.progress(), 1.0);
    assert_eq!(rig.tick_until(AnimatorPhase::Settle), 200);
    assert_eq!(rig.tick_until(AnimatorPhase::Idle), 50);

    assert_eq!(rig.anim.progress(), 0.0);
    assert_eq!(rig.anim.last_outcome(), Some(RunOutcome::Completed));
    assert_eq!(rig.anim.indicator_position(), None);
    assert_eq!(rig.anim.view().route(), rig.anim.arcs());
}

#[test]
fn start_is_a_no_op_without_two_destinations() {
    let mut rig = Rig::new(&[(10.0, 10.0)]);
    assert!(!rig.start());
    assert_eq!(rig.anim.phase(), AnimatorPhase::Idle);
    assert_eq!(rig.anim.progress(), 0.0);
    rig.tick();
    assert_eq!(rig.anim.phase(), AnimatorPhase::Idle);

    let cam = rig.anim.view().camera();
    assert!(cam.center.approx_eq(LngLat::new(10.0, 10.0), 1e-9));
    assert_eq!(cam.zoom, crate::animator::SINGLE_DESTINATION_ZOOM);
}

#[test]
fn start_is_a_no_op_until_view_is_ready() {
    let mut rig = a_to_b();
    rig.anim.view_mut().set_ready(false);
    assert!(!rig.start());
    rig.anim.view_mut().set_ready(true);
    assert!(rig.start());
}

#[test]
fn segment_progress_and_partial_route_are_recomputed_each_frame() {
    let mut rig = Rig::new(&[(0.0, 0.0), (30.0, 0.0), (60.0, 0.0)]);
    rig.start();
    rig.tick_until(AnimatorPhase::Segment(1));
    for _ in 0..150 {
        rig.tick();
    }
    // Halfway through the second of two segments.
    assert!((rig.anim.progress() - 0.75).abs() < 1e-9);
    let route = rig.anim.view().route();
    assert_eq!(route.len(), 2);
    assert_eq!(route[0], rig.anim.arcs()[0]);
    assert!(route[1].len() < rig.anim.arcs()[1].len());
    // Zoom dips to max(3, stopZoom - 4) at the midpoint.
    assert_eq!(rig.anim.view().camera().zoom, 3.0);
}

#[test]
fn stop_zoom_is_read_live_during_segment() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick_until(AnimatorPhase::Segment(0));
    for _ in 0..150 {
        rig.tick();
    }
    rig.anim
        .settings()
        .apply(SettingChange::StopZoom(8.0))
        .unwrap();
    rig.tick();
    let zoom = rig.anim.view().camera().zoom;
    assert!(zoom > 3.9 && zoom < 4.1, "zoom {zoom}");
}

#[test]
fn route_paint_is_reapplied_every_tick() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick();
    let red = Rgba8::rgb(255, 0, 0);
    rig.anim
        .settings()
        .apply(SettingChange::RouteColor(red))
        .unwrap();
    rig.tick();
    assert_eq!(rig.anim.view().route_paint().color, red);
}

#[test]
fn pause_duration_is_read_when_each_pause_begins() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick_until(AnimatorPhase::PauseAt(0));
    rig.anim
        .settings()
        .apply(SettingChange::PauseDuration(0.0))
        .unwrap();
    // The pause already running keeps its 1.5 s.
    assert_eq!(rig.tick_until(AnimatorPhase::Segment(0)), 150);
    rig.tick_until(AnimatorPhase::PauseAt(1));
    rig.tick();
    assert_eq!(rig.anim.phase(), AnimatorPhase::ZoomToFit);
}

#[test]
fn pause_freezes_progress_and_double_toggle_resumes() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick_until(AnimatorPhase::Segment(0));
    for _ in 0..30 {
        rig.tick();
    }
    assert!(rig.anim.toggle_pause());
    let frozen = rig.anim.progress();
    for _ in 0..200 {
        rig.tick();
    }
    assert_eq!(rig.anim.progress(), frozen);
    assert_eq!(rig.anim.phase(), AnimatorPhase::Segment(0));

    assert!(!rig.anim.toggle_pause());
    assert!(rig.anim.toggle_pause());
    assert!(!rig.anim.toggle_pause());
    assert!(!rig.anim.control().is_paused());
    rig.tick();
    assert!(rig.anim.progress() > frozen);
}

#[test]
fn stop_goes_idle_and_keeps_partial_route() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick_until(AnimatorPhase::Segment(0));
    for _ in 0..100 {
        rig.tick();
    }
    let control = rig.anim.control();
    rig.anim.stop();
    assert!(control.is_cancelled());
    assert_eq!(rig.anim.phase(), AnimatorPhase::Idle);
    assert_eq!(rig.anim.progress(), 0.0);
    assert_eq!(rig.anim.indicator_position(), None);
    assert_eq!(rig.anim.last_outcome(), Some(RunOutcome::Cancelled));
    let route = rig.anim.view().route();
    assert_eq!(route.len(), 1);
    assert!(route[0].len() < rig.anim.arcs()[0].len());
}

#[test]
fn cancel_from_another_handle_is_observed_on_next_tick() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick();
    let remote = rig.anim.control();
    std::thread::spawn(move || remote.cancel()).join().unwrap();
    rig.tick();
    assert_eq!(rig.anim.phase(), AnimatorPhase::Idle);
    assert_eq!(rig.anim.last_outcome(), Some(RunOutcome::Cancelled));
    assert_eq!(rig.anim.view().marker_count(), 2);
}

#[test]
fn restart_starts_a_fresh_run_on_next_tick() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick_until(AnimatorPhase::Segment(0));
    let old = rig.anim.control();
    rig.anim.restart();
    assert!(old.is_cancelled());
    assert_eq!(rig.anim.indicator_position(), None);
    assert!(rig.anim.is_running());

    rig.tick();
    assert_eq!(rig.anim.phase(), AnimatorPhase::FlyToFirst);
    assert!(!rig.anim.control().same_run(&old));
    assert!(!rig.anim.control().is_cancelled());
    assert_eq!(rig.anim.progress(), 0.0);
}

#[test]
fn pause_toggled_while_restart_is_pending_applies_to_new_run() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick();
    let old = rig.anim.control();
    rig.anim.restart();
    assert!(rig.anim.toggle_pause());
    assert!(!old.is_paused());

    rig.tick();
    assert_eq!(rig.anim.phase(), AnimatorPhase::FlyToFirst);
    assert!(rig.anim.is_paused());
    assert!(rig.anim.control().is_paused());
    assert!(!rig.anim.control().is_cancelled());

    let camera = rig.anim.view().camera();
    for _ in 0..50 {
        rig.tick();
    }
    assert_eq!(rig.anim.view().camera(), camera);
    assert_eq!(rig.anim.phase(), AnimatorPhase::FlyToFirst);

    assert!(!rig.anim.toggle_pause());
    rig.tick_until(AnimatorPhase::PauseAt(0));
}

#[test]
fn error_inside_a_tick_tears_the_run_down() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick_until(AnimatorPhase::Segment(0));
    for _ in 0..10 {
        rig.tick();
    }
    assert_eq!(rig.anim.view().marker_count(), 3);
    let control = rig.anim.control();

    rig.anim.arcs.clear();
    rig.clock.next_frame();
    let err = rig.anim.tick(rig.clock.now()).unwrap_err();
    assert!(err.to_string().starts_with("animation error:"));

    assert_eq!(rig.anim.phase(), AnimatorPhase::Idle);
    assert!(!rig.anim.is_running());
    assert_eq!(rig.anim.progress(), 0.0);
    assert_eq!(rig.anim.indicator_position(), None);
    assert_eq!(rig.anim.view().marker_count(), 2);
    assert_eq!(rig.anim.last_outcome(), Some(RunOutcome::Failed));
    assert!(control.is_cancelled());
}

#[test]
fn starting_again_invalidates_previous_control() {
    let mut rig = a_to_b();
    rig.start();
    let first = rig.anim.control();
    rig.start();
    assert!(first.is_cancelled());
    // One indicator plus one marker per destination.
    assert_eq!(rig.anim.view().marker_count(), 3);
}

#[test]
fn set_destinations_stops_run_and_shows_full_route() {
    let mut rig = a_to_b();
    rig.start();
    rig.tick_until(AnimatorPhase::Segment(0));
    rig.anim.set_destinations(
        DestinationList::new(vec![
            Destination::new("x", "X", "", LngLat::new(-10.0, 40.0)).unwrap(),
            Destination::new("y", "Y", "", LngLat::new(20.0, 50.0)).unwrap(),
            Destination::new("z", "Z", "", LngLat::new(30.0, 10.0)).unwrap(),
        ])
        .unwrap(),
    );
    assert_eq!(rig.anim.phase(), AnimatorPhase::Idle);
    assert_eq!(rig.anim.arcs().len(), 2);
    assert_eq!(rig.anim.view().route(), rig.anim.arcs());
    assert_eq!(rig.anim.view().marker_count(), 3);
}

#[test]
fn play_runs_to_completion_on_a_clock() {
    let mut rig = a_to_b();
    rig.anim
        .settings()
        .apply(SettingChange::Speed(4.0))
        .unwrap();
    let outcome = rig.anim.play(&mut rig.clock).unwrap();
    assert_eq!(outcome, Some(RunOutcome::Completed));
    assert_eq!(rig.anim.phase(), AnimatorPhase::Idle);
}

#[test]
fn dropping_animator_cancels_its_run() {
    let rig = a_to_b();
    let control = rig.anim.control();
    drop(rig);
    assert!(control.is_cancelled());
}
