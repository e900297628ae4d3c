use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{FlyPathError, FlyPathResult};

/// Format the user asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryFormat {
    /// H.264 video in an MP4 container.
    #[default]
    Mp4,
    /// Looping animated GIF.
    Gif,
}

impl DeliveryFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        ArtifactFormat::from(self).extension()
    }
}

impl FromStr for DeliveryFormat {
    type Err = FlyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" | "video" => Ok(Self::Mp4),
            "gif" | "image" => Ok(Self::Gif),
            other => Err(FlyPathError::validation(format!(
                "unknown export format '{other}' (expected mp4 or gif)"
            ))),
        }
    }
}

/// Format of the file actually produced.
///
/// Differs from the requested [`DeliveryFormat`] when the transcoder is unavailable and the
/// capture container is delivered as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// MP4 video.
    Mp4,
    /// Animated GIF.
    Gif,
    /// Raw YUV4MPEG2 capture.
    Y4m,
}

impl ArtifactFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Gif => "gif",
            Self::Y4m => "y4m",
        }
    }

    /// Media type for downloads.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Gif => "image/gif",
            Self::Y4m => "video/x-yuv4mpeg",
        }
    }

    /// Whether the file is a video container (as opposed to a looping image).
    pub fn is_video(self) -> bool {
        !matches!(self, Self::Gif)
    }
}

impl From<DeliveryFormat> for ArtifactFormat {
    fn from(f: DeliveryFormat) -> Self {
        match f {
            DeliveryFormat::Mp4 => Self::Mp4,
            DeliveryFormat::Gif => Self::Gif,
        }
    }
}

/// One transcoding job: captured container in, delivery file out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscodeRequest {
    /// Captured container.
    pub input: PathBuf,
    /// Output file, overwritten if present.
    pub output: PathBuf,
    /// Target format.
    pub format: DeliveryFormat,
    /// Output size.
    pub canvas: Canvas,
    /// Capture frame rate.
    pub fps: Fps,
    /// Capture duration, used to turn transcoder timestamps into progress.
    pub duration: Duration,
}

/// Converts a captured container into a delivery format.
pub trait Transcoder: Send {
    /// Whether the transcoder can run at all in this environment.
    fn is_available(&self) -> bool;

    /// Transcode `req`, reporting fractional progress in `[0, 1]` (possibly out of order or
    /// repeated).
    fn transcode(
        &mut self,
        req: &TranscodeRequest,
        progress: &mut dyn FnMut(f64),
    ) -> FlyPathResult<()>;
}
