use std::path::Path;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::render::raster::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
}

impl SinkConfig {
    pub(crate) fn validate(&self) -> FlyPathResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FlyPathError::validation("sink width/height must be non-zero"));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(FlyPathError::validation("fps must be non-zero"));
        }
        Ok(())
    }

    pub(crate) fn check_frame(&self, frame: &FrameRGBA) -> FlyPathResult<()> {
        if frame.width != self.width || frame.height != self.height {
            return Err(FlyPathError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.width, self.height
            )));
        }
        if frame.data.len() != (self.width as usize) * (self.height as usize) * 4 {
            return Err(FlyPathError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        Ok(())
    }
}

/// Consumer of composited frames in recording order.
///
/// `push_frame` is called with strictly increasing [`FrameIndex`] values between `begin` and
/// `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FlyPathResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FlyPathResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> FlyPathResult<()>;
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FlyPathResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FlyPathResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| FlyPathError::encode("in-memory sink not started"))?;
        cfg.check_frame(frame)?;
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(FlyPathError::encode("out-of-order frame index"));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FlyPathResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> FlyPathResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
