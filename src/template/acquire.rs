use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;

use crate::foundation::core::Frame;
use crate::foundation::error::{VerditeError, VerditeResult};
use crate::media::probe::probe_video;
use crate::media::reader::decode_frame_at;
use crate::template::stream::{MIN_FRAME_MS, TemplateStream};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];
const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "avi", "mov"];

/// Normalize a template file into a stream of frames.
///
/// Dispatches on the file extension: static images become a single-frame
/// stream, GIFs decode fully with their native inter-frame delays (clamped
/// to a 50 ms floor), and video containers contribute their first frame.
/// Unreadable, empty, or unsupported sources fail with
/// [`VerditeError::Template`]; callers surface that to the user instead of
/// substituting a blank template.
pub fn acquire_template(path: &Path) -> VerditeResult<TemplateStream> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Ok(TemplateStream::from_frame(load_image_frame(path)?));
    }
    if ext == "gif" {
        return decode_gif_stream(path);
    }
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        let info = probe_video(path).map_err(|e| {
            VerditeError::template(format!(
                "could not probe video template '{}': {e}",
                path.display()
            ))
        })?;
        let first = decode_frame_at(&info, 0).map_err(|e| {
            VerditeError::template(format!(
                "could not decode first frame of '{}': {e}",
                path.display()
            ))
        })?;
        return Ok(TemplateStream::from_frame(first));
    }

    Err(VerditeError::template(format!(
        "unsupported template extension '{ext}' for '{}'",
        path.display()
    )))
}

fn load_image_frame(path: &Path) -> VerditeResult<Frame> {
    let img = image::open(path).map_err(|e| {
        VerditeError::template(format!(
            "could not load template image '{}': {e}",
            path.display()
        ))
    })?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut data = rgb.into_raw();
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    Frame::from_bgr8(width, height, data)
}

fn decode_gif_stream(path: &Path) -> VerditeResult<TemplateStream> {
    let file = File::open(path).map_err(|e| {
        VerditeError::template(format!(
            "could not open gif template '{}': {e}",
            path.display()
        ))
    })?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| {
        VerditeError::template(format!(
            "could not read gif template '{}': {e}",
            path.display()
        ))
    })?;

    let decoded = decoder.into_frames().collect_frames().map_err(|e| {
        VerditeError::template(format!(
            "could not decode gif frames of '{}': {e}",
            path.display()
        ))
    })?;
    if decoded.is_empty() {
        return Err(VerditeError::template(format!(
            "gif template '{}' has no frames",
            path.display()
        )));
    }

    let mut frames = Vec::with_capacity(decoded.len());
    let mut durations = Vec::with_capacity(decoded.len());
    for gif_frame in decoded {
        let (num_ms, den_ms) = gif_frame.delay().numer_denom_ms();
        let ms = if den_ms == 0 {
            MIN_FRAME_MS
        } else {
            ((f64::from(num_ms) / f64::from(den_ms)).round() as u32).max(MIN_FRAME_MS)
        };
        frames.push(flatten_rgba_over_white(gif_frame.buffer())?);
        durations.push(ms);
    }

    TemplateStream::new(frames, durations)
}

// GIF frames may carry transparency; flatten over white so the mask
// detector sees stable colors.
fn flatten_rgba_over_white(rgba: &image::RgbaImage) -> VerditeResult<Frame> {
    let (width, height) = rgba.dimensions();
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for px in rgba.pixels() {
        let a = u16::from(px[3]);
        let inv = 255 - a;
        let flatten = |c: u8| -> u8 { ((u16::from(c) * a + 255 * inv + 127) / 255) as u8 };
        // BGR order.
        data.push(flatten(px[2]));
        data.push(flatten(px[1]));
        data.push(flatten(px[0]));
    }
    Frame::from_bgr8(width, height, data)
}
