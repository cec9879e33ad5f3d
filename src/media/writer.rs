use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::driver::sink::FrameSink;
use crate::foundation::core::Frame;
use crate::foundation::error::{VerditeError, VerditeResult};

/// Output configuration for [`Mp4Writer`].
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Output width; must be even for yuv420p.
    pub width: u32,
    /// Output height; must be even for yuv420p.
    pub height: u32,
    /// Integer output frame rate.
    pub fps: u32,
    /// Destination file.
    pub out_path: PathBuf,
    /// Whether to overwrite an existing destination.
    pub overwrite: bool,
    /// ffmpeg video codec name (see
    /// [`EncoderSettings::video_codec`](crate::EncoderSettings::video_codec)).
    pub codec: String,
}

impl EncodeConfig {
    /// Check the configuration before spawning an encoder.
    pub fn validate(&self) -> VerditeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(VerditeError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(VerditeError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // We target yuv420p output for maximum player compatibility.
            return Err(VerditeError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.codec.is_empty() {
            return Err(VerditeError::validation("encode codec must be non-empty"));
        }
        Ok(())
    }
}

/// An [`EncodeConfig`] with the software H.264 default.
pub fn default_mp4_config(
    out_path: impl Into<PathBuf>,
    width: u32,
    height: u32,
    fps: u32,
) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps,
        out_path: out_path.into(),
        overwrite: true,
        codec: "libx264".to_string(),
    }
}

/// Whether the system `ffmpeg` binary is callable.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of an output path if needed.
pub fn ensure_parent_dir(path: &Path) -> VerditeResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// MP4 encoder backed by the system `ffmpeg` binary.
///
/// Frames are piped as raw BGR24; the child encodes to yuv420p H.264 with
/// `+faststart`. We intentionally drive the binary rather than linking
/// native FFmpeg libraries, which keeps the build free of dev headers.
pub struct Mp4Writer {
    cfg: EncodeConfig,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl Mp4Writer {
    /// Validate the config and spawn the encoder process.
    pub fn new(cfg: EncodeConfig) -> VerditeResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(VerditeError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(VerditeError::media(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if cfg.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "bgr24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            &cfg.codec,
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            VerditeError::media(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VerditeError::media("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            cfg,
            child,
            stdin: Some(stdin),
        })
    }

    /// Close the pipe and wait for the encoder to finalize the file.
    pub fn finish(mut self) -> VerditeResult<()> {
        drop(self.stdin.take());

        let output = self
            .child
            .wait_with_output()
            .map_err(|e| VerditeError::media(format!("failed to wait for ffmpeg to finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VerditeError::media(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl FrameSink for Mp4Writer {
    fn write_frame(&mut self, frame: &Frame) -> VerditeResult<()> {
        if frame.width() != self.cfg.width || frame.height() != self.cfg.height {
            return Err(VerditeError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                self.cfg.width,
                self.cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(VerditeError::media("mp4 writer is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(frame.data())
            .map_err(|e| VerditeError::media(format!("failed to write frame to ffmpeg stdin: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/writer.rs"]
mod tests;
