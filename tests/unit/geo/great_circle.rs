use super::*;

fn dest(id: &str, lng: f64, lat: f64) -> Destination {
    Destination::new(id, id, "", LngLat::new(lng, lat)).unwrap()
}

#[test]
fn arcs_count_is_pairs_and_endpoints_match() {
    let dests = vec![
        dest("paris", 2.35, 48.85),
        dest("tokyo", 139.69, 35.69),
        dest("dubai", 55.27, 25.2),
        dest("lima", -77.04, -12.05),
    ];
    let arcs = compute_arcs(&dests);
    assert_eq!(arcs.len(), dests.len() - 1);
    for (i, arc) in arcs.iter().enumerate() {
        assert!(arc.len() >= ARC_SAMPLES);
        assert!(arc[0].approx_eq(dests[i].position(), 1e-9));
        assert!(arc[arc.len() - 1].approx_eq(dests[i + 1].position(), 1e-9));
    }
}

#[test]
fn fewer_than_two_destinations_yields_nothing() {
    assert!(compute_arcs(&[]).is_empty());
    assert!(compute_arcs(&[dest("a", 0.0, 0.0)]).is_empty());
}

#[test]
fn equator_arc_stays_on_equator_and_hits_midpoint() {
    let gc = GreatCircle::new(LngLat::new(0.0, 0.0), LngLat::new(90.0, 0.0));
    let mid = gc.interpolate(0.5);
    assert!(mid.approx_eq(LngLat::new(45.0, 0.0), 1e-9));
    assert!((gc.angular_distance() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn great_circle_bulges_toward_pole() {
    // New York -> Madrid: the great circle peaks north of both endpoints.
    let gc = GreatCircle::new(LngLat::new(-74.0, 40.7), LngLat::new(-3.7, 40.4));
    let mid = gc.interpolate(0.5);
    assert!(mid.lat > 45.0, "mid latitude {}", mid.lat);
}

#[test]
fn antimeridian_crossing_splits_and_flattens_in_order() {
    // Tokyo -> San Francisco crosses the date line.
    let a = LngLat::new(139.69, 35.69);
    let b = LngLat::new(-122.42, 37.77);
    let line = GreatCircle::new(a, b).arc(ARC_SAMPLES);
    assert!(line.is_multi_part());
    assert_eq!(line.parts[0].last().unwrap().lng, 180.0);
    assert_eq!(line.parts[1][0].lng, -180.0);
    assert_eq!(
        line.parts[0].last().unwrap().lat,
        line.parts[1][0].lat
    );

    let flat = line.flatten();
    assert!(flat[0].approx_eq(a, 1e-9));
    assert!(flat[flat.len() - 1].approx_eq(b, 1e-9));
    // Exactly one jump across the antimeridian, at the split.
    let jumps = flat
        .windows(2)
        .filter(|w| (w[1].lng - w[0].lng).abs() > 180.0)
        .count();
    assert_eq!(jumps, 1);
}

#[test]
fn coincident_points_do_not_produce_nan() {
    let p = LngLat::new(12.5, 41.9);
    let line = GreatCircle::new(p, p).arc(10);
    let flat = line.flatten();
    assert_eq!(flat.len(), 10);
    assert!(flat.iter().all(|q| q.approx_eq(p, 1e-12)));
}

#[test]
fn antipodal_points_fall_back_to_linear() {
    let gc = GreatCircle::new(LngLat::new(0.0, 0.0), LngLat::new(180.0, 0.0));
    let mid = gc.interpolate(0.5);
    assert!(mid.lng.is_finite() && mid.lat.is_finite());
}
