use crate::foundation::core::{Frame, Mask};
use crate::foundation::error::{VerditeError, VerditeResult};

/// Bump an even kernel size to the next odd value. Zero becomes 1.
pub(crate) fn odd_kernel(ksize: u32) -> u32 {
    if ksize == 0 {
        1
    } else if ksize.is_multiple_of(2) {
        ksize + 1
    } else {
        ksize
    }
}

/// Separable Gaussian blur over a BGR8 frame. Even `ksize` values are
/// bumped to the next odd value.
pub(crate) fn gaussian_blur_frame(frame: &Frame, ksize: u32) -> VerditeResult<Frame> {
    let blurred = gaussian_blur_channels(
        frame.data(),
        frame.width(),
        frame.height(),
        3,
        odd_kernel(ksize),
    )?;
    Frame::from_bgr8(frame.width(), frame.height(), blurred)
}

/// Separable Gaussian blur over a Gray8 mask. Even `ksize` values are
/// bumped to the next odd value.
pub(crate) fn gaussian_blur_mask(mask: &Mask, ksize: u32) -> VerditeResult<Mask> {
    let blurred = gaussian_blur_channels(
        mask.data(),
        mask.width(),
        mask.height(),
        1,
        odd_kernel(ksize),
    )?;
    Mask::from_gray8(mask.width(), mask.height(), blurred)
}

fn gaussian_blur_channels(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    ksize: u32,
) -> VerditeResult<Vec<u8>> {
    if ksize <= 1 {
        return Ok(src.to_vec());
    }
    let radius = (ksize - 1) / 2;
    let kernel = gaussian_kernel_q16(radius, default_sigma(ksize))?;

    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];
    horizontal_pass(src, &mut tmp, width, height, channels, &kernel);
    vertical_pass(&tmp, &mut out, width, height, channels, &kernel);
    Ok(out)
}

// The conventional kernel-size-to-sigma mapping used when no explicit sigma
// is supplied.
fn default_sigma(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> VerditeResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(VerditeError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(VerditeError::validation("gaussian kernel sum is zero"));
    }

    // Q16 fixed-point weights, renormalized so they sum to exactly 1<<16.
    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536i64 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        weights[mid] = (mid_val + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, ch: usize, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * ch;
                for c in 0..ch {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * ch;
            for c in 0..ch {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, ch: usize, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * ch;
                for c in 0..ch {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * ch;
            for c in 0..ch {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}
