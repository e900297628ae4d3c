use super::*;
use crate::settings::options::LineStyle;

#[test]
fn repeated_identical_writes_are_no_ops() {
    let store = SettingsStore::default();
    assert!(store.apply(SettingChange::Speed(2.0)).unwrap());
    let after_first = (store.get(), store.revision());
    for _ in 0..5 {
        assert!(!store.apply(SettingChange::Speed(2.0)).unwrap());
    }
    assert_eq!((store.get(), store.revision()), after_first);
}

#[test]
fn invalid_write_leaves_value_untouched() {
    let store = SettingsStore::default();
    assert!(store.apply(SettingChange::Speed(-1.0)).is_err());
    assert_eq!(store.speed(), 1.0);
    assert_eq!(store.revision(), 0);
}

#[test]
fn clones_share_state() {
    let store = SettingsStore::default();
    let reader = store.clone();
    store.apply(SettingChange::LineStyle(LineStyle::Dashed)).unwrap();
    store.apply(SettingChange::PauseDuration(0.25)).unwrap();
    assert_eq!(reader.get().line_style, LineStyle::Dashed);
    assert_eq!(reader.pause_ms(), 250);
    assert_eq!(reader.revision(), 2);
}

#[test]
fn writes_from_another_thread_are_visible() {
    let store = SettingsStore::default();
    let writer = store.clone();
    std::thread::spawn(move || writer.apply(SettingChange::StopZoom(8.0)).unwrap())
        .join()
        .unwrap();
    assert_eq!(store.stop_zoom(), 8.0);
}
