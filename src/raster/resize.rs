use crate::foundation::core::{Frame, checked_buffer_len};
use crate::foundation::error::{VerditeError, VerditeResult};

/// Bilinear resize of a BGR8 frame to exact target dimensions. Aspect
/// ratio is the caller's concern.
pub(crate) fn resize_frame(frame: &Frame, dst_w: u32, dst_h: u32) -> VerditeResult<Frame> {
    if dst_w == frame.width() && dst_h == frame.height() {
        return Ok(frame.clone());
    }
    let data = resize_channels(
        frame.data(),
        frame.width(),
        frame.height(),
        3,
        dst_w,
        dst_h,
    )?;
    Frame::from_bgr8(dst_w, dst_h, data)
}

/// Cut a horizontal band out of a frame: drop `top_px` rows from the top
/// and `bottom_px` rows from the bottom.
pub(crate) fn crop_rows(frame: &Frame, top_px: u32, bottom_px: u32) -> VerditeResult<Frame> {
    let h = frame.height();
    if top_px + bottom_px >= h {
        return Err(VerditeError::validation(format!(
            "row crop {}+{} consumes the whole frame height {h}",
            top_px, bottom_px
        )));
    }
    let new_h = h - top_px - bottom_px;
    let row_len = frame.width() as usize * 3;
    let start = top_px as usize * row_len;
    let end = start + new_h as usize * row_len;
    Frame::from_bgr8(frame.width(), new_h, frame.data()[start..end].to_vec())
}

fn resize_channels(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    ch: usize,
    dst_w: u32,
    dst_h: u32,
) -> VerditeResult<Vec<u8>> {
    let out_len = checked_buffer_len(dst_w, dst_h, ch)?;
    let mut out = vec![0u8; out_len];

    let sx = f64::from(src_w) / f64::from(dst_w);
    let sy = f64::from(src_h) / f64::from(dst_h);
    let max_x = (src_w - 1) as f64;
    let max_y = (src_h - 1) as f64;

    for dy in 0..dst_h {
        let fy = ((f64::from(dy) + 0.5) * sy - 0.5).clamp(0.0, max_y);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(src_h as usize - 1);
        let ty = fy - y0 as f64;

        for dx in 0..dst_w {
            let fx = ((f64::from(dx) + 0.5) * sx - 0.5).clamp(0.0, max_x);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(src_w as usize - 1);
            let tx = fx - x0 as f64;

            let base00 = (y0 * src_w as usize + x0) * ch;
            let base01 = (y0 * src_w as usize + x1) * ch;
            let base10 = (y1 * src_w as usize + x0) * ch;
            let base11 = (y1 * src_w as usize + x1) * ch;
            let dst_base = (dy as usize * dst_w as usize + dx as usize) * ch;

            for c in 0..ch {
                let top = f64::from(src[base00 + c]) * (1.0 - tx) + f64::from(src[base01 + c]) * tx;
                let bot = f64::from(src[base10 + c]) * (1.0 - tx) + f64::from(src[base11 + c]) * tx;
                let v = top * (1.0 - ty) + bot * ty;
                out[dst_base + c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(out)
}
