use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::compositor::Resolution;
use crate::encode::transcode::{ArtifactFormat, DeliveryFormat};
use crate::foundation::error::{FlyPathError, FlyPathResult};

/// What the user asked to export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output resolution preset.
    pub resolution: Resolution,
    /// Requested delivery format.
    pub format: DeliveryFormat,
    /// Draw the "Made with FlyPath" mark.
    pub watermark: bool,
}

/// Lifecycle of an export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportState {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Capturing frames of an animation run.
    Recording,
    /// Transcoding the capture.
    Encoding,
    /// Artifact ready.
    Done,
    /// Failed; see [`ExportStatus::error`].
    Error,
}

/// The delivered file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ExportArtifact {
    /// Location of the file.
    pub path: PathBuf,
    /// Suggested download name, with the extension of the actual format.
    pub file_name: String,
    /// Format actually produced.
    pub format: ArtifactFormat,
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Number of captured frames.
    pub frames: u64,
    /// Whether the capture container was delivered because the transcoder was unavailable.
    pub fell_back: bool,
}

/// Point-in-time copy of an [`ExportJob`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportStatus {
    /// Lifecycle state.
    pub state: ExportState,
    /// Encoding progress in `[0, 1]`.
    pub progress: f64,
    /// Options of the current or last export.
    pub options: Option<ExportOptions>,
    /// Result once `Done`.
    pub artifact: Option<ExportArtifact>,
    /// Human-readable message once `Error`.
    pub error: Option<String>,
}

/// Shared handle to the single export in flight.
///
/// Clones observe the same state; a UI thread can poll it while an [`ExportSession`] runs.
///
/// [`ExportSession`]: crate::export::ExportSession
#[derive(Clone, Debug, Default)]
pub struct ExportJob {
    inner: Arc<Mutex<ExportStatus>>,
}

impl ExportJob {
    /// Idle job.
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut ExportStatus) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Copy of the whole state.
    pub fn status(&self) -> ExportStatus {
        self.with(|s| s.clone())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ExportState {
        self.with(|s| s.state)
    }

    /// Encoding progress.
    pub fn progress(&self) -> f64 {
        self.with(|s| s.progress)
    }

    /// Delivered artifact, once done.
    pub fn artifact(&self) -> Option<ExportArtifact> {
        self.with(|s| s.artifact.clone())
    }

    /// Error message, once failed.
    pub fn error(&self) -> Option<String> {
        self.with(|s| s.error.clone())
    }

    /// `idle → recording`. Fails if another export is active or awaiting dismissal.
    pub fn begin_recording(&self, options: ExportOptions) -> FlyPathResult<()> {
        self.with(|s| {
            if s.state != ExportState::Idle {
                return Err(FlyPathError::validation(format!(
                    "cannot start an export while {:?}",
                    s.state
                )));
            }
            *s = ExportStatus {
                state: ExportState::Recording,
                options: Some(options),
                ..ExportStatus::default()
            };
            Ok(())
        })
    }

    /// `recording → encoding`.
    pub fn begin_encoding(&self) -> FlyPathResult<()> {
        self.with(|s| {
            if s.state != ExportState::Recording {
                return Err(FlyPathError::validation(format!(
                    "cannot start encoding while {:?}",
                    s.state
                )));
            }
            s.state = ExportState::Encoding;
            s.progress = 0.0;
            Ok(())
        })
    }

    /// Record encoding progress.
    ///
    /// Ignored (returns `false`) unless encoding, for non-finite values, and for values lower
    /// than the current progress.
    pub fn report_progress(&self, progress: f64) -> bool {
        self.with(|s| {
            if s.state != ExportState::Encoding || !progress.is_finite() {
                return false;
            }
            let p = progress.clamp(0.0, 1.0);
            if p < s.progress {
                return false;
            }
            s.progress = p;
            true
        })
    }

    /// `recording | encoding → done`.
    pub fn finish(&self, artifact: ExportArtifact) -> FlyPathResult<()> {
        self.with(|s| {
            if !matches!(s.state, ExportState::Recording | ExportState::Encoding) {
                return Err(FlyPathError::validation(format!(
                    "cannot finish an export while {:?}",
                    s.state
                )));
            }
            tracing::info!(file = %artifact.file_name, format = ?artifact.format, "export done");
            s.state = ExportState::Done;
            s.progress = 1.0;
            s.artifact = Some(artifact);
            Ok(())
        })
    }

    /// Move to `error` from any state.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(error = %message, "export failed");
        self.with(|s| {
            s.state = ExportState::Error;
            s.artifact = None;
            s.error = Some(message);
        });
    }

    /// Whether the job is recording or encoding.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state(),
            ExportState::Recording | ExportState::Encoding
        )
    }

    /// Back to `idle`, returning the artifact of a finished export.
    pub fn dismiss(&self) -> Option<ExportArtifact> {
        self.with(|s| std::mem::take(s).artifact)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/job.rs"]
mod tests;
