use super::*;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("flypath-session-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn default_config_names_files_after_the_stem() {
    let cfg = ExporterConfig::default();
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());
    assert_eq!(cfg.trailing_ms, 500);
    assert_eq!(cfg.file_name(ArtifactFormat::Mp4), "travel-animation.mp4");
    assert_eq!(cfg.file_name(ArtifactFormat::Gif), "travel-animation.gif");
    assert_eq!(cfg.file_name(ArtifactFormat::Y4m), "travel-animation.y4m");
}

#[test]
fn frame_limit_respects_capture_size_budget() {
    let hd = Canvas::new(1920, 1080);
    let per_frame = 6 + 1920 * 1080 * 3;
    let header = y4m_file_size(1920, 1080, Fps::new(30, 1).unwrap(), 0);
    let cfg = ExporterConfig {
        max_capture_bytes: header + 10 * per_frame + per_frame / 2,
        ..ExporterConfig::default()
    };
    assert_eq!(cfg.frame_limit(hd), 10);

    let frames_cap = ExporterConfig {
        max_frames: 4,
        ..ExporterConfig::default()
    };
    assert_eq!(frames_cap.frame_limit(hd), 4);

    // The default budget fits over a minute of 1080p at 30 fps.
    assert!(ExporterConfig::default().frame_limit(hd) >= 30 * 60);
}

#[test]
fn recording_stops_at_the_size_budget() {
    use crate::map::headless::HeadlessMap;
    use crate::model::destination::{Destination, DestinationList};
    use crate::settings::SettingsStore;
    use crate::foundation::core::LngLat;

    struct Never;
    impl Transcoder for Never {
        fn is_available(&self) -> bool {
            false
        }
        fn transcode(&mut self, _: &TranscodeRequest, _: &mut dyn FnMut(f64)) -> FlyPathResult<()> {
            Ok(())
        }
    }

    let dir = temp_dir("budget");
    let mut anim = RouteAnimator::new(
        HeadlessMap::new(Canvas::new(64, 36)),
        SettingsStore::default(),
    );
    anim.set_destinations(
        DestinationList::new(vec![
            Destination::new("a", "A", "", LngLat::new(0.0, 0.0)).unwrap(),
            Destination::new("b", "B", "", LngLat::new(40.0, 0.0)).unwrap(),
        ])
        .unwrap(),
    );
    let per_frame = 6 + 1280 * 720 * 3;
    let config = ExporterConfig {
        out_dir: dir.clone(),
        fps: Fps::new(5, 1).unwrap(),
        max_capture_bytes: 3 * per_frame,
        ..ExporterConfig::default()
    };
    let job = ExportJob::new();
    let mut session = ExportSession::new(config, ExportOptions::default(), Box::new(Never));
    let err = session.run(&mut anim, &job).unwrap_err();
    assert!(err.to_string().contains("max_capture_bytes"));
    assert_eq!(job.state(), ExportState::Error);
    assert!(std::fs::read_dir(&dir).unwrap().next().is_none());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn temp_guard_removes_unless_kept() {
    let dir = temp_dir("guard");
    let dropped = dir.join("dropped.bin");
    let kept = dir.join("kept.bin");
    std::fs::write(&dropped, b"x").unwrap();
    std::fs::write(&kept, b"x").unwrap();
    {
        let _a = TempFileGuard::new(dropped.clone());
        let mut b = TempFileGuard::new(kept.clone());
        b.keep = true;
    }
    assert!(!dropped.exists());
    assert!(kept.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn temp_guard_tolerates_missing_file() {
    let dir = temp_dir("missing");
    drop(TempFileGuard::new(dir.join("never-created.bin")));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn move_file_relocates_content() {
    let dir = temp_dir("move");
    let from = dir.join("a.y4m");
    let to = dir.join("b.y4m");
    std::fs::write(&from, b"YUV4MPEG2").unwrap();
    move_file(&from, &to).unwrap();
    assert!(!from.exists());
    assert_eq!(std::fs::read(&to).unwrap(), b"YUV4MPEG2");
    let _ = std::fs::remove_dir_all(&dir);
}
