use super::*;

#[test]
fn short_queries_return_nothing() {
    let g = Gazetteer::builtin();
    assert!(g.search("").is_empty());
    assert!(g.search("p").is_empty());
    assert!(g.search("  p  ").is_empty());
    assert!(!g.search("pa").is_empty());
}

#[test]
fn prefix_match_is_case_insensitive() {
    let g = Gazetteer::builtin();
    let hits = g.search("LISB");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Lisbon");
    assert_eq!(hits[0].country, "Portugal");
    assert!(g.search("sbon").is_empty());
}

#[test]
fn results_are_capped() {
    let places = (0..9)
        .map(|i| SearchResult {
            id: format!("p{i}"),
            name: format!("Springfield {i}"),
            country: "United States".into(),
            lng: -90.0,
            lat: 40.0,
        })
        .collect();
    let hits = Gazetteer::new(places).search("spring");
    assert_eq!(hits.len(), MAX_RESULTS);
    assert_eq!(hits[0].id, "p0");
}

#[test]
fn builtin_ids_are_unique_and_coordinates_valid() {
    let g = Gazetteer::default();
    assert!(!g.is_empty());
    let mut ids: Vec<_> = g.places.iter().map(|p| p.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), g.len());
    for p in &g.places {
        assert!(LngLat::new(p.lng, p.lat).validate().is_ok(), "{}", p.name);
    }
}

#[test]
fn search_result_becomes_destination_with_fresh_id() {
    let hit = Gazetteer::builtin().search("tok").remove(0);
    let a = hit.clone().into_destination().unwrap();
    let b = hit.into_destination().unwrap();
    assert_eq!(a.name, "Tokyo");
    assert_ne!(a.id, b.id);
    assert_eq!(a.position(), LngLat::new(139.6917, 35.6895));
}
