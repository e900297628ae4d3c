use super::*;

#[test]
fn defaults_are_valid() {
    let s = AnimationSettings::default();
    s.validate().unwrap();
    assert_eq!(s.route_color.to_hex(), "#00D4FF");
    assert_eq!(s.pause_ms(), 1500);
}

#[test]
fn json_uses_camel_case_and_lowercase_enums() {
    let s = AnimationSettings {
        line_style: LineStyle::Dotted,
        map_style: MapStyle::Vintage,
        ..AnimationSettings::default()
    };
    let v = serde_json::to_value(s).unwrap();
    assert_eq!(v["pauseDuration"], 1.5);
    assert_eq!(v["stopZoom"], 5.0);
    assert_eq!(v["lineStyle"], "dotted");
    assert_eq!(v["mapStyle"], "vintage");
    assert_eq!(v["routeColor"], "#00D4FF");
    assert_eq!(v["showLabels"], true);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let s: AnimationSettings = serde_json::from_str(r#"{"speed": 2}"#).unwrap();
    assert_eq!(s.speed, 2.0);
    assert_eq!(s.stop_zoom, 5.0);
    assert_eq!(s.map_style, MapStyle::Dark);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let base = AnimationSettings::default();
    for bad in [
        base.with_change(SettingChange::Speed(0.0)),
        base.with_change(SettingChange::Speed(f64::NAN)),
        base.with_change(SettingChange::PauseDuration(-0.1)),
        base.with_change(SettingChange::StopZoom(23.0)),
    ] {
        assert!(bad.validate().is_err(), "{bad:?}");
    }
    base.with_change(SettingChange::PauseDuration(0.0))
        .validate()
        .unwrap();
}

#[test]
fn style_ids_parse_case_insensitively() {
    assert_eq!("Dashed".parse::<LineStyle>().unwrap(), LineStyle::Dashed);
    assert_eq!(" outdoors ".parse::<MapStyle>().unwrap(), MapStyle::Outdoors);
    assert!("neon".parse::<MapStyle>().is_err());
}

#[test]
fn dash_patterns() {
    assert_eq!(LineStyle::Solid.dash_pattern(), None);
    assert_eq!(LineStyle::Dashed.dash_pattern(), Some((2.0, 1.5)));
    assert!(LineStyle::Dotted.round_caps());
    assert!(!LineStyle::Dashed.round_caps());
}
