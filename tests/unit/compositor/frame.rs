use super::*;
use crate::map::headless::HeadlessMap;
use crate::map::view::Camera;
use crate::model::destination::Destination;

fn small_map() -> HeadlessMap {
    let mut map = HeadlessMap::new(Canvas::new(160, 90));
    map.set_camera(Camera {
        center: LngLat::new(0.0, 0.0),
        zoom: 0.0,
    });
    map
}

fn stops() -> DestinationList {
    DestinationList::new(vec![
        Destination::new("a", "Alpha", "", LngLat::new(40.0, 0.0)).unwrap(),
        Destination::new("b", "Bravo", "", LngLat::new(-40.0, 0.0)).unwrap(),
    ])
    .unwrap()
}

#[test]
fn inactive_compositor_produces_nothing() {
    let mut comp = Compositor::new(Resolution::Hd720, false);
    let mut map = small_map();
    let out = comp
        .compose(&mut map, &stops(), None, &AnimationSettings::default())
        .unwrap();
    assert!(out.is_none());

    comp.start();
    comp.stop();
    assert!(!comp.is_active());
    let out = comp
        .compose(&mut map, &stops(), None, &AnimationSettings::default())
        .unwrap();
    assert!(out.is_none());
}

#[test]
fn frames_match_target_resolution() {
    for (res, w, h) in [(Resolution::Hd720, 1280, 720), (Resolution::Hd1080, 1920, 1080)] {
        let mut comp = Compositor::new(res, true);
        comp.start();
        let frame = comp
            .compose(&mut small_map(), &stops(), None, &AnimationSettings::default())
            .unwrap()
            .unwrap();
        assert_eq!((frame.width, frame.height), (w, h));
        assert_eq!(frame.data.len(), (w * h * 4) as usize);
        assert!(frame.premultiplied);
        assert_eq!(comp.frames(), 1);
    }
}

#[test]
fn indicator_and_badges_are_drawn_at_projected_positions() {
    let mut comp = Compositor::new(Resolution::Hd720, false);
    comp.start();
    let mut map = small_map();
    let settings = AnimationSettings {
        show_labels: false,
        ..AnimationSettings::default()
    };
    let frame = comp
        .compose(&mut map, &stops(), Some(LngLat::new(0.0, 0.0)), &settings)
        .unwrap()
        .unwrap();

    // Map is scaled 8x; the indicator sits at the viewport centre.
    assert_eq!(frame.pixel(640, 360), Some([255, 255, 255, 255]));

    let badge = map.project(LngLat::new(40.0, 0.0));
    let (bx, by) = ((badge.x * 8.0).round() as u32, (badge.y * 8.0).round() as u32);
    assert_eq!(frame.pixel(bx - 10, by), Some([0x3B, 0x82, 0xF6, 255]));
}

#[test]
fn background_comes_from_map_snapshot() {
    let mut comp = Compositor::new(Resolution::Hd720, false);
    comp.start();
    let mut map = small_map();
    map.set_map_style(crate::settings::MapStyle::Vintage);
    let frame = comp
        .compose(
            &mut map,
            &DestinationList::default(),
            None,
            &AnimationSettings::default(),
        )
        .unwrap()
        .unwrap();
    let bg = crate::settings::MapStyle::Vintage.background();
    assert_eq!(frame.pixel(20, 20), Some([bg.r, bg.g, bg.b, 255]));
}

#[test]
fn resolution_ids_parse_and_serialize() {
    assert_eq!("1080p".parse::<Resolution>().unwrap(), Resolution::Hd1080);
    assert_eq!("720".parse::<Resolution>().unwrap(), Resolution::Hd720);
    assert!("4k".parse::<Resolution>().is_err());
    assert_eq!(serde_json::to_string(&Resolution::Hd720).unwrap(), "\"720p\"");
    assert_eq!(Resolution::Hd1080.scale(), 1.5);
}
