use crate::composition::settings::BlurSettings;
use crate::foundation::core::Frame;
use crate::foundation::error::VerditeResult;
use crate::raster::blur::{gaussian_blur_frame, odd_kernel};
use crate::raster::resize::{crop_rows, resize_frame};

/// Default Gaussian kernel size for the blurred background layer.
pub const DEFAULT_BLUR_STRENGTH: u32 = 51;

/// The kernel size actually used for a requested blur strength: even
/// values are bumped to the next odd value, zero becomes 1.
pub fn effective_blur_kernel(strength: u32) -> u32 {
    odd_kernel(strength)
}

/// Composite a source frame over a blurred, upscaled copy of itself.
///
/// The background layer is the whole source blurred at `blur_strength` and
/// stretched to the target raster. The foreground is the sharp source,
/// cropped top/bottom by the settings' percentages, fitted into the target
/// aspect without stretching, and pasted at the normalized position. Text
/// overlay is strictly a later, separate step.
pub fn composite_blur(
    source: &Frame,
    settings: &BlurSettings,
    target_w: u32,
    target_h: u32,
    blur_strength: u32,
) -> VerditeResult<Frame> {
    let blurred = gaussian_blur_frame(source, blur_strength)?;
    let mut out = resize_frame(&blurred, target_w, target_h)?;

    let cropped = crop_by_percent(source, settings.crop_top_pct, settings.crop_bottom_pct)?;
    let mut fitted = fit_to_aspect(&cropped, target_w, target_h)?;

    // The aspect fit keeps content within the target, but guard against
    // roundoff before computing offsets.
    if fitted.width() > target_w {
        fitted = resize_frame(&fitted, target_w, fitted.height())?;
    }
    if fitted.height() > target_h {
        fitted = resize_frame(&fitted, fitted.width(), target_h)?;
    }

    let max_x = target_w - fitted.width();
    let max_y = target_h - fitted.height();
    let x_offset = placement_offset(settings.x_position_pct, max_x);
    let y_offset = placement_offset(settings.y_position_pct, max_y);

    paste(&mut out, &fitted, x_offset, y_offset)?;
    Ok(out)
}

/// Suggested top/bottom crop percentages that bring a too-tall source near
/// the 9:16 target ratio, split evenly and capped at 20% per side. Sources
/// already wider than 9:16 need no crop.
pub fn optimal_crop(source: &Frame) -> (f64, f64) {
    let target_ratio = 9.0 / 16.0;
    let w = f64::from(source.width());
    let h = f64::from(source.height());
    let current_ratio = w / h;

    if current_ratio > target_ratio {
        return (0.0, 0.0);
    }

    let ideal_height = w / target_ratio;
    let excess = h - ideal_height;
    if excess > 0.0 {
        let per_side = ((excess / h) * 100.0 / 2.0).min(20.0);
        return (per_side, per_side);
    }
    (0.0, 0.0)
}

// Percent-of-height band crop. A combined crop that would consume the
// whole frame resets to no crop instead of producing a zero-height frame.
fn crop_by_percent(frame: &Frame, top_pct: f64, bottom_pct: f64) -> VerditeResult<Frame> {
    let h = frame.height();
    let mut top_px = (f64::from(h) * top_pct / 100.0) as u32;
    let mut bottom_px = (f64::from(h) * bottom_pct / 100.0) as u32;
    if top_px + bottom_px >= h {
        top_px = 0;
        bottom_px = 0;
    }
    if top_px == 0 && bottom_px == 0 {
        return Ok(frame.clone());
    }
    crop_rows(frame, top_px, bottom_px)
}

// Aspect-preserving fit into the target box: scale along the dominant
// axis first, then constrain the other axis if it still overflows.
fn fit_to_aspect(frame: &Frame, target_w: u32, target_h: u32) -> VerditeResult<Frame> {
    let w = f64::from(frame.width());
    let h = f64::from(frame.height());
    let target_ratio = f64::from(target_w) / f64::from(target_h);
    let current_ratio = w / h;

    let (new_w, new_h) = if current_ratio > target_ratio {
        let mut new_h = target_h;
        let mut new_w = (f64::from(new_h) * current_ratio) as u32;
        if new_w > target_w {
            new_w = target_w;
            new_h = (f64::from(new_w) / current_ratio) as u32;
        }
        (new_w, new_h)
    } else {
        let mut new_w = target_w;
        let mut new_h = (f64::from(new_w) / current_ratio) as u32;
        if new_h > target_h {
            new_h = target_h;
            new_w = (f64::from(new_h) * current_ratio) as u32;
        }
        (new_w, new_h)
    };

    resize_frame(frame, new_w.max(1), new_h.max(1))
}

// `offset = pct/100 * leftover`, floor-rounded and clamped to the valid
// placement range.
fn placement_offset(pct: f64, leftover: u32) -> u32 {
    if leftover == 0 {
        return 0;
    }
    let offset = (pct / 100.0 * f64::from(leftover)) as i64;
    offset.clamp(0, i64::from(leftover)) as u32
}

// Paste `src` into `dst` at the given offset, clipping to the destination
// and force-resizing when the available area is smaller than the content.
fn paste(dst: &mut Frame, src: &Frame, x_offset: u32, y_offset: u32) -> VerditeResult<()> {
    let end_x = (x_offset + src.width()).min(dst.width());
    let end_y = (y_offset + src.height()).min(dst.height());
    if end_x <= x_offset || end_y <= y_offset {
        return Ok(());
    }

    let actual_w = end_x - x_offset;
    let actual_h = end_y - y_offset;
    let resized;
    let content = if actual_w != src.width() || actual_h != src.height() {
        resized = resize_frame(src, actual_w, actual_h)?;
        &resized
    } else {
        src
    };

    let dst_w = dst.width() as usize;
    let dst_data = dst.data_mut();
    let src_data = content.data();
    let row_len = actual_w as usize * 3;
    for row in 0..actual_h as usize {
        let dst_start = ((y_offset as usize + row) * dst_w + x_offset as usize) * 3;
        let src_start = row * row_len;
        dst_data[dst_start..dst_start + row_len]
            .copy_from_slice(&src_data[src_start..src_start + row_len]);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur_background.rs"]
mod tests;
