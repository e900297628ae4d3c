use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use crate::encode::sink::ensure_parent_dir;
use crate::encode::transcode::{DeliveryFormat, TranscodeRequest, Transcoder};
use crate::foundation::error::{FlyPathError, FlyPathResult};

/// Environment variable overriding the ffmpeg executable.
pub const FFMPEG_ENV: &str = "FLYPATH_FFMPEG";

const GIF_FPS: u32 = 15;

/// [`Transcoder`] that runs the system `ffmpeg`.
#[derive(Clone, Debug)]
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::from_env()
    }
}

impl FfmpegTranscoder {
    /// Use `program` as the ffmpeg executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `$FLYPATH_FFMPEG`, falling back to `ffmpeg` on `PATH`.
    pub fn from_env() -> Self {
        let program = std::env::var_os(FFMPEG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("ffmpeg"));
        Self { program }
    }

    /// Executable that will be spawned.
    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl Transcoder for FfmpegTranscoder {
    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip_all, fields(format = ?req.format, output = %req.output.display()))]
    fn transcode(
        &mut self,
        req: &TranscodeRequest,
        progress: &mut dyn FnMut(f64),
    ) -> FlyPathResult<()> {
        ensure_parent_dir(&req.output)?;

        let mut cmd = Command::new(&self.program);
        cmd.args(ffmpeg_args(req))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let child = cmd.spawn().map_err(|e| {
            FlyPathError::encode(format!(
                "failed to spawn '{}' (is it installed?): {e}",
                self.program.display()
            ))
        })?;
        let mut child = ChildGuard(Some(child));

        let stdout = child
            .stdout()
            .ok_or_else(|| FlyPathError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr()
            .ok_or_else(|| FlyPathError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok::<_, std::io::Error>(stderr_bytes)
        });

        let total_us = req.duration.as_micros() as f64;
        for line in BufReader::new(stdout).lines() {
            let line =
                line.map_err(|e| FlyPathError::encode(format!("read ffmpeg progress: {e}")))?;
            if let Some(p) = parse_progress_line(&line, total_us) {
                progress(p);
            }
        }

        let status = child
            .wait()
            .map_err(|e| FlyPathError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = stderr_drain
            .join()
            .map_err(|_| FlyPathError::encode("ffmpeg stderr drain thread panicked"))?
            .map_err(|e| FlyPathError::encode(format!("ffmpeg stderr read failed: {e}")))?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(FlyPathError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        progress(1.0);
        Ok(())
    }
}

/// Kills and reaps the child unless it was already waited on.
struct ChildGuard(Option<Child>);

impl ChildGuard {
    fn stdout(&mut self) -> Option<std::process::ChildStdout> {
        self.0.as_mut()?.stdout.take()
    }

    fn stderr(&mut self) -> Option<std::process::ChildStderr> {
        self.0.as_mut()?.stderr.take()
    }

    fn wait(&mut self) -> std::io::Result<std::process::ExitStatus> {
        match self.0.take() {
            Some(mut child) => child.wait(),
            None => Err(std::io::Error::other("child already reaped")),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.0.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Command-line arguments for `req` (without the program name).
pub(crate) fn ffmpeg_args(req: &TranscodeRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-y",
        "-hide_banner",
        "-loglevel",
        "error",
        "-nostats",
        "-progress",
        "pipe:1",
        "-i",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(req.input.clone().into_os_string());

    match req.format {
        DeliveryFormat::Mp4 => {
            for a in [
                "-an",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ] {
                args.push(a.into());
            }
        }
        DeliveryFormat::Gif => {
            let filter = format!(
                "fps={GIF_FPS},scale={}:-1:flags=lanczos,split[a][b];[a]palettegen[p];[b][p]paletteuse",
                req.canvas.width
            );
            args.push("-vf".into());
            args.push(filter.into());
            args.push("-loop".into());
            args.push("0".into());
        }
    }
    args.push(req.output.clone().into_os_string());
    args
}

/// Parse one `-progress` key/value line into a fraction of `total_us`.
pub(crate) fn parse_progress_line(line: &str, total_us: f64) -> Option<f64> {
    let (key, value) = line.trim().split_once('=')?;
    match key {
        // `out_time_ms` is also microseconds in ffmpeg's progress output.
        "out_time_us" | "out_time_ms" => {
            let us: f64 = value.parse().ok()?;
            if total_us <= 0.0 || !us.is_finite() || us < 0.0 {
                return None;
            }
            Some((us / total_us).clamp(0.0, 1.0))
        }
        "progress" if value == "end" => Some(1.0),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
