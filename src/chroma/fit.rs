use crate::foundation::core::{AlphaMatte, Frame, Mask, Rect, Region};
use crate::foundation::error::{VerditeError, VerditeResult};
use crate::raster::contour::{find_blobs, largest_blob};
use crate::raster::resize::resize_frame;

/// Locate the largest green-screen blob of a mask and build its blend
/// matte.
///
/// Returns `None` when the mask holds no blob at all; callers fall back to
/// the degenerate full-frame region (see [`fit_to_mask`]). Blob selection
/// is by filled area, ties resolved by scan order, so the result is stable
/// for a given mask.
pub fn primary_region(mask: &Mask) -> VerditeResult<Option<(Region, AlphaMatte)>> {
    let blobs = find_blobs(mask);
    let Some(blob) = largest_blob(&blobs) else {
        return Ok(None);
    };
    blob_region(blob).map(Some)
}

pub(crate) fn blob_region(blob: &crate::raster::contour::Blob) -> VerditeResult<(Region, AlphaMatte)> {
    let region = Region {
        rect: blob.rect,
        contour: blob.contour.clone(),
    };
    let weights = blob
        .filled
        .iter()
        .map(|&v| f32::from(v) / 255.0)
        .collect::<Vec<_>>();
    let matte = AlphaMatte::from_weights(blob.rect.w, blob.rect.h, weights)?;
    Ok((region, matte))
}

/// Resize a source frame to a region's bounding box and zero it outside
/// the matte, so pixels beyond the exact blob shape never leak into the
/// blend. Aspect-ratio distortion from the resize is accepted behavior.
pub fn fit_source(source: &Frame, region: &Region, matte: &AlphaMatte) -> VerditeResult<Frame> {
    if matte.width() != region.rect.w || matte.height() != region.rect.h {
        return Err(VerditeError::validation(format!(
            "matte {}x{} does not match region box {}x{}",
            matte.width(),
            matte.height(),
            region.rect.w,
            region.rect.h
        )));
    }

    let mut fitted = resize_frame(source, region.rect.w, region.rect.h)?;
    let data = fitted.data_mut();
    for (px, &a) in data.chunks_exact_mut(3).zip(matte.data().iter()) {
        if a <= 0.0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
        }
    }
    Ok(fitted)
}

/// Fit a source frame to the shape of a green-screen mask.
///
/// The no-blob mask is not an error: the source is resized to the mask's
/// full dimensions with an opaque matte, so the caller still blends rather
/// than hard-cutting.
pub fn fit_to_mask(source: &Frame, mask: &Mask) -> VerditeResult<(Frame, Region, AlphaMatte)> {
    match primary_region(mask)? {
        Some((region, matte)) => {
            let fitted = fit_source(source, &region, &matte)?;
            Ok((fitted, region, matte))
        }
        None => {
            let region = Region {
                rect: Rect {
                    x: 0,
                    y: 0,
                    w: mask.width(),
                    h: mask.height(),
                },
                contour: Vec::new(),
            };
            let matte = AlphaMatte::opaque(mask.width(), mask.height())?;
            let fitted = resize_frame(source, mask.width(), mask.height())?;
            Ok((fitted, region, matte))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chroma/fit.rs"]
mod tests;
