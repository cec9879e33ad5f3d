use std::path::{Path, PathBuf};

use crate::foundation::core::Fps;
use crate::foundation::error::{VerditeError, VerditeResult};

/// Probed properties of a video container, via the system `ffprobe`.
#[derive(Clone, Debug)]
pub struct VideoInfo {
    /// The probed file.
    pub path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Rational frame rate.
    pub fps: Fps,
    /// Total frame count; taken from the stream metadata when present,
    /// otherwise estimated from duration and rate.
    pub frame_count: u64,
    /// Container duration in seconds (0 when unknown).
    pub duration_sec: f64,
}

/// Probe a video file with `ffprobe` (must be on `PATH`).
pub fn probe_video(path: &Path) -> VerditeResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        nb_frames: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| VerditeError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(VerditeError::media(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| VerditeError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| VerditeError::media("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| VerditeError::media("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| VerditeError::media("missing video height from ffprobe"))?;

    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| VerditeError::media("invalid video r_frame_rate"))?;
    let fps = Fps::new(fps_num, fps_den)
        .map_err(|e| VerditeError::media(format!("unusable frame rate from ffprobe: {e}")))?;

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let frame_count = video_stream
        .nb_frames
        .as_ref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| (duration_sec * fps.as_f64()).round().max(0.0) as u64);

    Ok(VideoInfo {
        path: path.to_path_buf(),
        width,
        height,
        fps,
        frame_count,
        duration_sec,
    })
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}
