use crate::chroma::fit::{fit_source, fit_to_mask};
use crate::chroma::mask::detect_mask;
use crate::foundation::core::{AlphaMatte, Frame, Region};
use crate::foundation::error::{VerditeError, VerditeResult};

/// Alpha-blend a fitted source into a background over a region's bounding
/// box: `out = src * a + bg * (1 - a)`, computed in floating point and
/// rounded back to 8 bits.
///
/// The output is a copy of the background everywhere else. The box is
/// clipped to the background bounds. No text or watermark is applied here;
/// overlays are layered strictly after compositing.
pub fn composite_region(
    background: &Frame,
    fitted: &Frame,
    region: &Region,
    matte: &AlphaMatte,
) -> VerditeResult<Frame> {
    let rect = region.rect;
    if fitted.width() != rect.w || fitted.height() != rect.h {
        return Err(VerditeError::composite(format!(
            "fitted frame {}x{} does not match region box {}x{}",
            fitted.width(),
            fitted.height(),
            rect.w,
            rect.h
        )));
    }
    if matte.width() != rect.w || matte.height() != rect.h {
        return Err(VerditeError::composite(format!(
            "matte {}x{} does not match region box {}x{}",
            matte.width(),
            matte.height(),
            rect.w,
            rect.h
        )));
    }

    let bg_w = background.width() as i32;
    let bg_h = background.height() as i32;
    let mut out = background.clone();
    let out_data = out.data_mut();
    let src_data = fitted.data();
    let weights = matte.data();

    for ly in 0..rect.h as i32 {
        let gy = rect.y + ly;
        if gy < 0 || gy >= bg_h {
            continue;
        }
        for lx in 0..rect.w as i32 {
            let gx = rect.x + lx;
            if gx < 0 || gx >= bg_w {
                continue;
            }
            let a = weights[(ly as usize) * (rect.w as usize) + lx as usize];
            if a <= 0.0 {
                continue;
            }
            let src_idx = ((ly as usize) * (rect.w as usize) + lx as usize) * 3;
            let dst_idx = ((gy as usize) * (bg_w as usize) + gx as usize) * 3;
            for c in 0..3 {
                let s = f32::from(src_data[src_idx + c]);
                let d = f32::from(out_data[dst_idx + c]);
                out_data[dst_idx + c] = (s * a + d * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(out)
}

/// Green-screen replacement against a precomputed region and matte.
///
/// This is the amortized path the frame-sequence driver uses for static
/// templates: detection ran once, only the per-frame fit and blend remain.
pub fn replace_with_region(
    template: &Frame,
    source: &Frame,
    region: &Region,
    matte: &AlphaMatte,
) -> VerditeResult<Frame> {
    let fitted = fit_source(source, region, matte)?;
    composite_region(template, &fitted, region, matte)
}

/// The green-screen replacement primitive: detect the template's mask, fit
/// the source to its largest blob, and blend.
pub fn replace_green_screen(template: &Frame, source: &Frame) -> VerditeResult<Frame> {
    let mask = detect_mask(template)?;
    let (fitted, region, matte) = fit_to_mask(source, &mask)?;
    composite_region(template, &fitted, &region, &matte)
}

#[cfg(test)]
#[path = "../../tests/unit/chroma/composite.rs"]
mod tests;
