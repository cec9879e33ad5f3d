use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::driver::source::FrameSource;
use crate::foundation::core::{Fps, Frame, checked_buffer_len};
use crate::foundation::error::{VerditeError, VerditeResult};
use crate::media::probe::{VideoInfo, probe_video};

/// Sequential video decoder backed by the system `ffmpeg` binary.
///
/// Frames stream as raw BGR24 over a pipe; `reset` restarts the decode
/// from frame 0 by respawning the process. The child is killed on drop, so
/// decoder handles release deterministically even on error paths.
pub struct VideoReader {
    info: VideoInfo,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    frame_len: usize,
}

impl VideoReader {
    /// Probe and open a video file for sequential decoding.
    pub fn open(path: &Path) -> VerditeResult<Self> {
        let info = probe_video(path)?;
        let frame_len = checked_buffer_len(info.width, info.height, 3)?;
        let mut reader = Self {
            info,
            child: None,
            stdout: None,
            frame_len,
        };
        reader.spawn()?;
        Ok(reader)
    }

    /// The probed properties of the underlying file.
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn spawn(&mut self) -> VerditeResult<()> {
        self.shutdown();
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(&self.info.path)
            .args(["-f", "rawvideo", "-pix_fmt", "bgr24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                VerditeError::media(format!("failed to spawn ffmpeg for video decode: {e}"))
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VerditeError::media("failed to open ffmpeg stdout (unexpected)"))?;
        self.child = Some(child);
        self.stdout = Some(stdout);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.stdout.take();
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl FrameSource for VideoReader {
    fn next_frame(&mut self) -> VerditeResult<Option<Frame>> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.frame_len];
        let mut filled = 0usize;
        while filled < buf.len() {
            match stdout.read(&mut buf[filled..]) {
                Ok(0) => {
                    // End of stream; a partial trailing frame is dropped.
                    return Ok(None);
                }
                Ok(n) => filled += n,
                Err(e) => {
                    return Err(VerditeError::media(format!(
                        "ffmpeg decode read failed for '{}': {e}",
                        self.info.path.display()
                    )));
                }
            }
        }
        Ok(Some(Frame::from_bgr8(
            self.info.width,
            self.info.height,
            buf,
        )?))
    }

    fn reset(&mut self) -> VerditeResult<()> {
        self.spawn()
    }

    fn frame_count(&self) -> u64 {
        self.info.frame_count
    }

    fn fps(&self) -> Fps {
        self.info.fps
    }
}

impl Drop for VideoReader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Decode a single frame at a given index by seeking with `ffmpeg -ss`.
/// Used for video-template cycling, where the driver re-reads rotating
/// frame indices instead of streaming.
pub fn decode_frame_at(info: &VideoInfo, index: u64) -> VerditeResult<Frame> {
    let time_sec = index as f64 / info.fps.as_f64();
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-ss", &format!("{time_sec:.9}")])
        .arg("-i")
        .arg(&info.path)
        .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "bgr24", "pipe:1"])
        .output()
        .map_err(|e| VerditeError::media(format!("failed to run ffmpeg for frame seek: {e}")))?;

    if !out.status.success() {
        return Err(VerditeError::media(format!(
            "ffmpeg frame seek failed for '{}': {}",
            info.path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let expected_len = checked_buffer_len(info.width, info.height, 3)?;
    if out.stdout.len() < expected_len {
        return Err(VerditeError::media(format!(
            "ffmpeg returned no frame at index {index} of '{}'",
            info.path.display()
        )));
    }

    Frame::from_bgr8(
        info.width,
        info.height,
        out.stdout[..expected_len].to_vec(),
    )
}
