use super::*;
use crate::animation::clock::FixedStepClock;
use crate::foundation::core::Fps;

fn clock_10ms() -> FixedStepClock {
    FixedStepClock::new(Fps::new(100, 1).unwrap())
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn completes_after_duration_over_speed() {
    let mut clock = clock_10ms();
    let control = AnimationControl::new();
    let mut frames = Vec::new();
    let done = run_phase(&mut clock, 1000, &control, |p| frames.push(p), || 2.0);
    assert!(done);
    assert_eq!(clock.now(), ms(500));
    assert_eq!(frames.len(), 50);
    assert_eq!(frames.last().copied(), Some(1.0));
    assert!(frames.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn paused_time_never_accrues() {
    let control = AnimationControl::new();
    let mut phase = Phase::new(1000, Duration::ZERO);
    let mut last = 0.0;
    let mut t = 0;
    let mut completed_at = None;
    while completed_at.is_none() {
        t += 10;
        // Paused between 200ms and 700ms.
        control.set_paused((200..700).contains(&t));
        let status = phase.tick(ms(t), &control, || 1.0, |p| last = p);
        if status == PhaseStatus::Completed {
            completed_at = Some(t);
        }
        if control.is_paused() {
            assert!((last - 0.19).abs() < 1e-9, "progress moved while paused: {last}");
        }
    }
    // 1000ms of running time plus 500ms paused.
    assert_eq!(completed_at, Some(1500));
    assert_eq!(last, 1.0);
}

#[test]
fn cancel_resolves_false_and_stops_frames() {
    let mut clock = clock_10ms();
    let control = AnimationControl::new();
    let mut frames = 0u32;
    let canceller = control.clone();
    let done = run_phase(
        &mut clock,
        10_000,
        &control,
        |_| {
            frames += 1;
            if frames == 7 {
                canceller.cancel();
            }
        },
        || 1.0,
    );
    assert!(!done);
    assert_eq!(frames, 7);
}

#[test]
fn cancel_wins_over_pause() {
    let control = AnimationControl::new();
    let mut phase = Phase::new(1000, Duration::ZERO);
    control.set_paused(true);
    control.cancel();
    let mut called = false;
    let status = phase.tick(ms(10), &control, || 1.0, |_| called = true);
    assert_eq!(status, PhaseStatus::Cancelled);
    assert!(!called);
    assert_eq!(phase.advance(ms(20), &control, 1.0), PhaseStep::Cancelled);
}

#[test]
fn speed_change_applies_mid_phase() {
    let control = AnimationControl::new();
    let mut phase = Phase::new(1000, Duration::ZERO);
    // 250ms at 1x, then 4x for the remaining 750ms of phase time.
    phase.advance(ms(250), &control, 1.0);
    assert!((phase.progress() - 0.25).abs() < 1e-12);
    let step = phase.advance(ms(250 + 188), &control, 4.0);
    assert_eq!(
        step,
        PhaseStep::Frame {
            progress: 1.0,
            done: true
        }
    );
}

#[test]
fn invalid_speed_accrues_nothing() {
    let control = AnimationControl::new();
    let mut phase = Phase::new(100, Duration::ZERO);
    phase.advance(ms(50), &control, f64::NAN);
    phase.advance(ms(60), &control, -1.0);
    assert_eq!(phase.progress(), 0.0);
}

#[test]
fn zero_duration_completes_on_first_tick() {
    let mut clock = clock_10ms();
    let control = AnimationControl::new();
    let mut frames = Vec::new();
    assert!(run_phase(&mut clock, 0, &control, |p| frames.push(p), || 1.0));
    assert_eq!(frames, vec![1.0]);
    assert_eq!(clock.now(), ms(10));
}

#[test]
fn double_toggle_resumes_accrual() {
    let control = AnimationControl::new();
    let mut phase = Phase::new(1000, Duration::ZERO);
    phase.advance(ms(100), &control, 1.0);
    control.toggle_pause();
    control.toggle_pause();
    assert!(!control.is_paused());
    phase.advance(ms(200), &control, 1.0);
    assert!((phase.progress() - 0.2).abs() < 1e-12);
}
