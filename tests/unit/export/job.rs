use super::*;

fn artifact() -> ExportArtifact {
    ExportArtifact {
        path: PathBuf::from("travel-animation.mp4"),
        file_name: "travel-animation.mp4".into(),
        format: ArtifactFormat::Mp4,
        width: 1280,
        height: 720,
        frames: 10,
        fell_back: false,
    }
}

#[test]
fn happy_path_transitions() {
    let job = ExportJob::new();
    job.begin_recording(ExportOptions::default()).unwrap();
    assert_eq!(job.state(), ExportState::Recording);
    assert!(job.is_active());
    job.begin_encoding().unwrap();
    assert!(job.report_progress(0.4));
    job.finish(artifact()).unwrap();
    assert_eq!(job.state(), ExportState::Done);
    assert_eq!(job.progress(), 1.0);
    assert_eq!(job.dismiss(), Some(artifact()));
    assert_eq!(job.status(), ExportStatus::default());
}

#[test]
fn progress_only_counts_while_encoding_and_never_decreases() {
    let job = ExportJob::new();
    assert!(!job.report_progress(0.5));
    job.begin_recording(ExportOptions::default()).unwrap();
    assert!(!job.report_progress(0.5));
    job.begin_encoding().unwrap();
    assert!(job.report_progress(0.6));
    assert!(!job.report_progress(0.3));
    assert!(!job.report_progress(f64::NAN));
    assert!(job.report_progress(7.0));
    assert_eq!(job.progress(), 1.0);
    job.finish(artifact()).unwrap();
    // Late update after completion.
    assert!(!job.report_progress(0.9));
    assert_eq!(job.progress(), 1.0);
}

#[test]
fn a_second_export_is_refused_until_dismissed() {
    let job = ExportJob::new();
    job.begin_recording(ExportOptions::default()).unwrap();
    assert!(job.begin_recording(ExportOptions::default()).is_err());
    job.fail("boom");
    assert!(job.begin_recording(ExportOptions::default()).is_err());
    job.dismiss();
    job.begin_recording(ExportOptions::default()).unwrap();
}

#[test]
fn fail_is_reachable_from_every_state() {
    let job = ExportJob::new();
    job.fail("idle failure");
    assert_eq!(job.state(), ExportState::Error);
    assert_eq!(job.error().as_deref(), Some("idle failure"));
    job.dismiss();

    job.begin_recording(ExportOptions::default()).unwrap();
    job.begin_encoding().unwrap();
    job.finish(artifact()).unwrap();
    job.fail("late failure");
    assert_eq!(job.state(), ExportState::Error);
    assert_eq!(job.artifact(), None);
}

#[test]
fn illegal_transitions_are_rejected() {
    let job = ExportJob::new();
    assert!(job.begin_encoding().is_err());
    assert!(job.finish(artifact()).is_err());
}

#[test]
fn clones_share_state_across_threads() {
    let job = ExportJob::new();
    let ui = job.clone();
    std::thread::spawn(move || {
        ui.begin_recording(ExportOptions {
            watermark: true,
            ..ExportOptions::default()
        })
        .unwrap()
    })
    .join()
    .unwrap();
    assert_eq!(job.state(), ExportState::Recording);
    assert_eq!(job.status().options.map(|o| o.watermark), Some(true));
}

#[test]
fn options_deserialize_from_ui_values() {
    let o: ExportOptions =
        serde_json::from_str(r#"{"resolution":"1080p","format":"gif","watermark":true}"#).unwrap();
    assert_eq!(o.resolution, Resolution::Hd1080);
    assert_eq!(o.format, DeliveryFormat::Gif);
    assert!(o.watermark);
}
