use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::animation::clock::{FixedStepClock, FrameClock};
use crate::animator::{RouteAnimator, RunOutcome};
use crate::compositor::Compositor;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::encode::transcode::{ArtifactFormat, TranscodeRequest, Transcoder};
use crate::encode::y4m::{Y4mSink, y4m_file_size};
use crate::export::job::{ExportArtifact, ExportJob, ExportOptions, ExportState};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::map::view::MapView;

/// Where and how exports are written.
///
/// The capture is an uncompressed YUV4MPEG2 file in `out_dir` (about 2.8 MB per 720p frame and
/// 6.2 MB per 1080p frame), and it is the delivered artifact when no transcoder is available.
/// Recording stops with an error once either `max_frames` or `max_capture_bytes` would be
/// exceeded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Directory receiving the capture and the delivered file.
    pub out_dir: PathBuf,
    /// File name without extension.
    pub file_stem: String,
    /// Capture frame rate.
    pub fps: Fps,
    /// Extra time recorded after the run ends.
    pub trailing_ms: u64,
    /// Safety limit on captured frames.
    pub max_frames: u64,
    /// Safety limit on the capture file size, in bytes.
    pub max_capture_bytes: u64,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            file_stem: "travel-animation".to_owned(),
            fps: Fps { num: 30, den: 1 },
            trailing_ms: 500,
            max_frames: 30 * 60 * 30,
            max_capture_bytes: 16 << 30,
        }
    }
}

impl ExporterConfig {
    /// Largest number of frames a capture at `canvas` may hold under both limits.
    pub fn frame_limit(&self, canvas: Canvas) -> u64 {
        let per_frame = y4m_file_size(canvas.width, canvas.height, self.fps, 1)
            - y4m_file_size(canvas.width, canvas.height, self.fps, 0);
        let header = y4m_file_size(canvas.width, canvas.height, self.fps, 0);
        let by_size = self.max_capture_bytes.saturating_sub(header) / per_frame.max(1);
        self.max_frames.min(by_size)
    }

    /// Suggested download name for `format`.
    pub fn file_name(&self, format: ArtifactFormat) -> String {
        format!("{}.{}", self.file_stem, format.extension())
    }
}

/// Removes a file on drop unless kept.
struct TempFileGuard {
    path: PathBuf,
    keep: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.keep && self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temp file");
            }
        }
    }
}

/// Runs one export: records a full animation run through the compositor, then transcodes.
pub struct ExportSession {
    config: ExporterConfig,
    options: ExportOptions,
    transcoder: Box<dyn Transcoder>,
}

impl ExportSession {
    /// Session for `options` using `transcoder` for delivery.
    pub fn new(
        config: ExporterConfig,
        options: ExportOptions,
        transcoder: Box<dyn Transcoder>,
    ) -> Self {
        Self {
            config,
            options,
            transcoder,
        }
    }

    /// Writer configuration.
    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Requested options.
    pub fn options(&self) -> ExportOptions {
        self.options
    }

    /// Record `animator` from the start of a fresh run and deliver the result.
    ///
    /// Returns `Ok(None)` without touching `job` when the animator cannot start (fewer than two
    /// destinations or a view that is not ready). Failures move `job` to `error`, stop the
    /// animation and discard recording artifacts.
    #[tracing::instrument(skip_all, fields(resolution = self.options.resolution.id(), format = ?self.options.format))]
    pub fn run<V: MapView>(
        &mut self,
        animator: &mut RouteAnimator<V>,
        job: &ExportJob,
    ) -> FlyPathResult<Option<ExportArtifact>> {
        if animator.destinations().len() < 2 || !animator.view().is_ready() {
            tracing::debug!("export skipped: animation cannot start");
            return Ok(None);
        }
        job.begin_recording(self.options)?;

        match self.record_and_deliver(animator, job) {
            Ok(artifact) => Ok(Some(artifact)),
            Err(e) => {
                animator.stop();
                if job.state() != ExportState::Error {
                    job.fail(e.to_string());
                }
                Err(e)
            }
        }
    }

    fn record_and_deliver<V: MapView>(
        &mut self,
        animator: &mut RouteAnimator<V>,
        job: &ExportJob,
    ) -> FlyPathResult<ExportArtifact> {
        let capture_path = self.config.out_dir.join(format!(
            ".{}-{}.y4m",
            self.config.file_stem,
            uuid::Uuid::new_v4().simple()
        ));
        let mut capture = TempFileGuard::new(capture_path.clone());

        let mut compositor = Compositor::new(self.options.resolution, self.options.watermark);
        compositor.start();
        let recorded = self.record(animator, &mut compositor, &capture_path, job);
        compositor.stop();
        let frames = recorded?;

        let canvas = self.options.resolution.canvas();
        let mut artifact = ExportArtifact {
            path: capture_path.clone(),
            file_name: self.config.file_name(ArtifactFormat::Y4m),
            format: ArtifactFormat::Y4m,
            width: canvas.width,
            height: canvas.height,
            frames,
            fell_back: true,
        };

        if !self.transcoder.is_available() {
            let delivered = self.config.out_dir.join(&artifact.file_name);
            move_file(&capture_path, &delivered)?;
            capture.keep = true;
            artifact.path = delivered;
            tracing::warn!(
                requested = ?self.options.format,
                "transcoder unavailable, delivering capture container"
            );
            job.finish(artifact.clone())?;
            return Ok(artifact);
        }

        job.begin_encoding()?;
        let format = ArtifactFormat::from(self.options.format);
        let output = self.config.out_dir.join(self.config.file_name(format));
        let mut partial = TempFileGuard::new(output.clone());
        let req = TranscodeRequest {
            input: capture_path.clone(),
            output: output.clone(),
            format: self.options.format,
            canvas,
            fps: self.config.fps,
            duration: self.config.fps.frames_to_duration(frames),
        };

        let transcoder = &mut self.transcoder;
        let (tx, rx) = mpsc::channel::<f64>();
        let result = std::thread::scope(|scope| {
            let worker = scope.spawn(move || {
                transcoder.transcode(&req, &mut |p| {
                    let _ = tx.send(p);
                })
            });
            for p in rx {
                job.report_progress(p);
            }
            worker
                .join()
                .unwrap_or_else(|_| Err(FlyPathError::encode("transcoder worker panicked")))
        });
        result?;

        partial.keep = true;
        artifact.path = output;
        artifact.file_name = self.config.file_name(format);
        artifact.format = format;
        artifact.fell_back = false;
        job.finish(artifact.clone())?;
        Ok(artifact)
    }

    /// Capture one full run plus the trailing buffer; returns the number of frames written.
    fn record<V: MapView>(
        &self,
        animator: &mut RouteAnimator<V>,
        compositor: &mut Compositor,
        capture_path: &Path,
        job: &ExportJob,
    ) -> FlyPathResult<u64> {
        let canvas = self.options.resolution.canvas();
        let mut sink = Y4mSink::new(capture_path);
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.config.fps,
        })?;

        let mut clock = FixedStepClock::new(self.config.fps);
        if !animator.start(clock.now()) {
            return Err(FlyPathError::animation("animation could not start"));
        }
        let trailing = self.config.fps.frames_for_ms(self.config.trailing_ms);
        let mut trailing_left = trailing;
        let frame_limit = self.config.frame_limit(canvas);

        loop {
            if job.state() != ExportState::Recording {
                return Err(FlyPathError::encode("export aborted during recording"));
            }
            let idx = clock.frame();
            if idx.0 >= frame_limit {
                return Err(FlyPathError::encode(format!(
                    "recording exceeded {frame_limit} frames (max_frames {}, max_capture_bytes {})",
                    self.config.max_frames, self.config.max_capture_bytes
                )));
            }
            let settings = animator.settings().get();
            let indicator = animator.indicator_position();
            let destinations = animator.destinations().clone();
            let frame = compositor
                .compose(animator.view_mut(), &destinations, indicator, &settings)?
                .ok_or_else(|| FlyPathError::render("compositor stopped during recording"))?;
            sink.push_frame(idx, &frame)?;

            if !animator.is_running() {
                if animator.last_outcome() != Some(RunOutcome::Completed) {
                    return Err(FlyPathError::animation("animation run was cancelled"));
                }
                if trailing_left == 0 {
                    break;
                }
                trailing_left -= 1;
            }
            clock.next_frame();
            animator.tick(clock.now())?;
        }

        sink.end()?;
        let frames = sink.frames_written();
        tracing::info!(frames, trailing, "recording finished");
        Ok(frames)
    }
}

fn move_file(from: &Path, to: &Path) -> FlyPathResult<()> {
    use anyhow::Context as _;
    if std::fs::rename(from, to).is_err() {
        std::fs::copy(from, to)
            .with_context(|| format!("copy '{}' to '{}'", from.display(), to.display()))?;
        std::fs::remove_file(from)
            .with_context(|| format!("remove '{}'", from.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/session.rs"]
mod tests;
