use crate::foundation::core::{Frame, Mask};
use crate::foundation::error::VerditeResult;
use crate::raster::{blur, hsv, morph};

// Two overlapping green bands in 8-bit HSV (H in [0,180]). The tight band
// is the primary detector; the broad band catches washed-out or shadowed
// green that the tight band misses.
const TIGHT_LO: [u8; 3] = [35, 40, 40];
const TIGHT_HI: [u8; 3] = [85, 255, 255];
const BROAD_LO: [u8; 3] = [25, 30, 30];
const BROAD_HI: [u8; 3] = [95, 255, 255];

const MASK_EDGE_BLUR_KSIZE: u32 = 5;

/// Detect the green-screen pixels of a frame.
///
/// Converts to HSV, unions the tight and broad green range tests, cleans
/// the result with a morphological close then open (3x3), and softens the
/// edge with a 5x5 Gaussian so downstream alpha blending gets a gentle
/// falloff instead of a hard cut.
pub fn detect_mask(frame: &Frame) -> VerditeResult<Mask> {
    let hsv_buf = hsv::bgr_to_hsv(frame);

    let tight = hsv::in_range(&hsv_buf, frame.width(), frame.height(), TIGHT_LO, TIGHT_HI)?;
    let broad = hsv::in_range(&hsv_buf, frame.width(), frame.height(), BROAD_LO, BROAD_HI)?;

    let mut mask = tight;
    for (dst, &src) in mask.data_mut().iter_mut().zip(broad.data().iter()) {
        *dst = (*dst).max(src);
    }

    let mask = morph::open3(&morph::close3(&mask));
    blur::gaussian_blur_mask(&mask, MASK_EDGE_BLUR_KSIZE)
}

#[cfg(test)]
#[path = "../../tests/unit/chroma/mask.rs"]
mod tests;
