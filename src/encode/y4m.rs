use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig, ensure_parent_dir};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{FlyPathError, FlyPathResult};
use crate::foundation::math::flatten_premul_over_bg;
use crate::render::raster::FrameRGBA;

const FRAME_MARKER: &[u8] = b"FRAME\n";

/// Stream header line, including the trailing newline.
pub fn y4m_header(width: u32, height: u32, fps: Fps) -> String {
    format!(
        "YUV4MPEG2 W{width} H{height} F{}:{} Ip A1:1 C444 XYSCSS=444\n",
        fps.num, fps.den
    )
}

/// Exact size in bytes of a stream of `frames` frames.
///
/// Frames are stored uncompressed at 3 bytes per pixel, so a 1080p frame takes about 6 MB.
pub fn y4m_file_size(width: u32, height: u32, fps: Fps, frames: u64) -> u64 {
    let frame = FRAME_MARKER.len() as u64 + u64::from(width) * u64::from(height) * 3;
    y4m_header(width, height, fps).len() as u64 + frames.saturating_mul(frame)
}

/// Sink writing an uncompressed YUV4MPEG2 (`C444`) stream.
///
/// Colours are converted with BT.601 limited-range coefficients after flattening alpha over an
/// opaque background. The file is readable by ffmpeg and most players.
pub struct Y4mSink {
    path: PathBuf,
    bg_rgba: [u8; 4],
    writer: Option<BufWriter<File>>,
    cfg: Option<SinkConfig>,
    rgba: Vec<u8>,
    planes: Vec<u8>,
    last_idx: Option<FrameIndex>,
    frames: u64,
}

impl Y4mSink {
    /// Sink writing to `path` (created or truncated in `begin`).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bg_rgba: [0, 0, 0, 255],
            writer: None,
            cfg: None,
            rgba: Vec::new(),
            planes: Vec::new(),
            last_idx: None,
            frames: 0,
        }
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for Y4mSink {
    fn begin(&mut self, cfg: SinkConfig) -> FlyPathResult<()> {
        cfg.validate()?;
        ensure_parent_dir(&self.path)?;
        let file = File::create(&self.path)
            .with_context(|| format!("create capture file '{}'", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(y4m_header(cfg.width, cfg.height, cfg.fps).as_bytes())
            .context("write y4m header")?;

        let px = (cfg.width as usize) * (cfg.height as usize);
        self.rgba = vec![0u8; px * 4];
        self.planes = vec![0u8; px * 3];
        self.writer = Some(writer);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FlyPathResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| FlyPathError::encode("y4m sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(FlyPathError::encode(
                "y4m sink received out-of-order frame index",
            ));
        }
        cfg.check_frame(frame)?;
        self.last_idx = Some(idx);

        if frame.premultiplied {
            flatten_premul_over_bg(&mut self.rgba, &frame.data, self.bg_rgba);
        } else {
            for (d, s) in self.rgba.chunks_exact_mut(4).zip(frame.data.chunks_exact(4)) {
                d.copy_from_slice(s);
            }
        }
        rgba_to_yuv444_planes(&self.rgba, &mut self.planes);

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| FlyPathError::encode("y4m sink is already finalized"))?;
        writer
            .write_all(FRAME_MARKER)
            .and_then(|()| writer.write_all(&self.planes))
            .context("write y4m frame")?;
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> FlyPathResult<()> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| FlyPathError::encode("y4m sink not started"))?;
        writer.flush().context("flush y4m capture")?;
        self.cfg = None;
        tracing::debug!(frames = self.frames, path = %self.path.display(), "y4m capture closed");
        Ok(())
    }
}

/// Convert opaque RGBA8 to planar Y, Cb, Cr (BT.601, limited range).
fn rgba_to_yuv444_planes(rgba: &[u8], planes: &mut [u8]) {
    let px = rgba.len() / 4;
    let (y_plane, rest) = planes.split_at_mut(px);
    let (u_plane, v_plane) = rest.split_at_mut(px);
    for (i, p) in rgba.chunks_exact(4).enumerate() {
        let (r, g, b) = (i32::from(p[0]), i32::from(p[1]), i32::from(p[2]));
        y_plane[i] = (((66 * r + 129 * g + 25 * b + 128) >> 8) + 16) as u8;
        u_plane[i] = (((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128) as u8;
        v_plane[i] = (((112 * r - 94 * g - 18 * b + 128) >> 8) + 128) as u8;
    }
}

/// Stream parameters of a YUV4MPEG2 file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Y4mInfo {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
    /// Number of complete frames in the file.
    pub frames: u64,
}

impl Y4mInfo {
    /// Playback duration.
    pub fn duration(&self) -> std::time::Duration {
        self.fps.frames_to_duration(self.frames)
    }
}

/// Read the header of a `C444` YUV4MPEG2 file and count its frames.
pub fn probe_y4m(path: &Path) -> FlyPathResult<Y4mInfo> {
    let file =
        File::open(path).with_context(|| format!("open y4m file '{}'", path.display()))?;
    let file_len = file.metadata().context("stat y4m file")?.len();
    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .context("read y4m header")?;

    let mut tokens = header.trim_end().split(' ');
    if tokens.next() != Some("YUV4MPEG2") {
        return Err(FlyPathError::encode("not a YUV4MPEG2 stream"));
    }
    let (mut width, mut height, mut fps) = (0u32, 0u32, None);
    for tok in tokens {
        let Some(tag) = tok.get(..1) else {
            continue;
        };
        let val = &tok[1..];
        match tag {
            "W" => width = val.parse().unwrap_or(0),
            "H" => height = val.parse().unwrap_or(0),
            "F" => {
                fps = val
                    .split_once(':')
                    .and_then(|(n, d)| Some((n.parse().ok()?, d.parse().ok()?)))
                    .and_then(|(n, d)| Fps::new(n, d).ok());
            }
            "C" if val != "444" => {
                return Err(FlyPathError::encode(format!(
                    "unsupported y4m colourspace C{val}"
                )));
            }
            _ => {}
        }
    }
    let fps = fps.ok_or_else(|| FlyPathError::encode("y4m header has no frame rate"))?;
    if width == 0 || height == 0 {
        return Err(FlyPathError::encode("y4m header has no frame size"));
    }

    let frame_len = FRAME_MARKER.len() as u64 + 3 * u64::from(width) * u64::from(height);
    let body = file_len.saturating_sub(header.len() as u64);
    Ok(Y4mInfo {
        width,
        height,
        fps,
        frames: body / frame_len,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/y4m.rs"]
mod tests;
