use super::*;

#[test]
fn in_out_cubic_matches_reference_curve() {
    let e = Ease::InOutCubic;
    assert_eq!(e.apply(0.0), 0.0);
    assert_eq!(e.apply(1.0), 1.0);
    assert!((e.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((e.apply(0.25) - 0.0625).abs() < 1e-12);
    assert!((e.apply(0.75) - 0.9375).abs() < 1e-12);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::InOutCubic.apply(-1.0), 0.0);
    assert_eq!(Ease::Linear.apply(2.0), 1.0);
}

#[test]
fn in_out_cubic_is_monotonic() {
    let mut prev = 0.0;
    for i in 0..=100 {
        let v = Ease::InOutCubic.apply(f64::from(i) / 100.0);
        assert!(v >= prev);
        prev = v;
    }
}
