use crate::foundation::core::{Mask, Rect};

/// Mask values at or above this count as foreground when extracting blobs.
/// The detector's edge-softening blur leaves a faint halo around each
/// region; thresholding at the midpoint keeps blob geometry invariant to it.
pub(crate) const FOREGROUND_THRESHOLD: u8 = 128;

/// One connected foreground component of a mask.
#[derive(Clone, Debug)]
pub(crate) struct Blob {
    /// Bounding box in mask coordinates.
    pub rect: Rect,
    /// Filled pixel count, holes included.
    pub area: u64,
    /// Box-local 0/255 coverage map with interior holes filled.
    pub filled: Vec<u8>,
    /// Outer boundary pixels in mask coordinates, clockwise.
    pub contour: Vec<(i32, i32)>,
}

// Clockwise in screen coordinates (y grows downward): E SE S SW W NW N NE.
const DIRS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Extract all 8-connected foreground components of `mask`, in row-major
/// scan order of their first pixel. Deterministic for a given mask.
pub(crate) fn find_blobs(mask: &Mask) -> Vec<Blob> {
    let w = mask.width() as usize;
    let h = mask.height() as usize;
    let fg: Vec<bool> = mask
        .data()
        .iter()
        .map(|&v| v >= FOREGROUND_THRESHOLD)
        .collect();

    let mut labels = vec![0u32; w * h];
    let mut blobs = Vec::new();
    let mut next_label = 1u32;

    for start in 0..w * h {
        if !fg[start] || labels[start] != 0 {
            continue;
        }
        let label = next_label;
        next_label += 1;

        let seed = ((start % w) as i32, (start / w) as i32);
        let (mut min_x, mut min_y) = seed;
        let (mut max_x, mut max_y) = seed;

        let mut stack = vec![start];
        labels[start] = label;
        while let Some(idx) = stack.pop() {
            let x = (idx % w) as i32;
            let y = (idx / w) as i32;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
            for (dx, dy) in DIRS {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= w as i32 || ny >= h as i32 {
                    continue;
                }
                let nidx = ny as usize * w + nx as usize;
                if fg[nidx] && labels[nidx] == 0 {
                    labels[nidx] = label;
                    stack.push(nidx);
                }
            }
        }

        let rect = Rect {
            x: min_x,
            y: min_y,
            w: (max_x - min_x + 1) as u32,
            h: (max_y - min_y + 1) as u32,
        };
        let filled = fill_holes(&labels, label, w, rect);
        let area = filled.iter().filter(|&&v| v != 0).count() as u64;
        let contour = trace_boundary(&labels, label, w, h, seed);
        blobs.push(Blob {
            rect,
            area,
            filled,
            contour,
        });
    }

    blobs
}

/// The blob with the largest filled area. Ties keep the first in scan
/// order, so selection is stable for a given mask.
pub(crate) fn largest_blob(blobs: &[Blob]) -> Option<&Blob> {
    let mut best: Option<&Blob> = None;
    for blob in blobs {
        match best {
            Some(b) if blob.area <= b.area => {}
            _ => best = Some(blob),
        }
    }
    best
}

// Box-local coverage of one labeled component with interior holes filled,
// the raster equivalent of filling its outer contour polygon.
fn fill_holes(labels: &[u32], label: u32, mask_w: usize, rect: Rect) -> Vec<u8> {
    let bw = rect.w as usize;
    let bh = rect.h as usize;
    let is_member = |lx: usize, ly: usize| -> bool {
        let gx = rect.x as usize + lx;
        let gy = rect.y as usize + ly;
        labels[gy * mask_w + gx] == label
    };

    // Flood the box-local background from the box border; anything the
    // flood cannot reach is an interior hole.
    let mut outside = vec![false; bw * bh];
    let mut stack = Vec::new();
    for lx in 0..bw {
        for ly in [0, bh - 1] {
            if !is_member(lx, ly) && !outside[ly * bw + lx] {
                outside[ly * bw + lx] = true;
                stack.push((lx, ly));
            }
        }
    }
    for ly in 0..bh {
        for lx in [0, bw - 1] {
            if !is_member(lx, ly) && !outside[ly * bw + lx] {
                outside[ly * bw + lx] = true;
                stack.push((lx, ly));
            }
        }
    }
    while let Some((lx, ly)) = stack.pop() {
        for (dx, dy) in [(1i32, 0i32), (-1, 0), (0, 1), (0, -1)] {
            let nx = lx as i32 + dx;
            let ny = ly as i32 + dy;
            if nx < 0 || ny < 0 || nx >= bw as i32 || ny >= bh as i32 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if !is_member(nx, ny) && !outside[ny * bw + nx] {
                outside[ny * bw + nx] = true;
                stack.push((nx, ny));
            }
        }
    }

    let mut filled = vec![0u8; bw * bh];
    for ly in 0..bh {
        for lx in 0..bw {
            if is_member(lx, ly) || !outside[ly * bw + lx] {
                filled[ly * bw + lx] = 255;
            }
        }
    }
    filled
}

// Radial-sweep boundary following over one labeled component, starting at
// its first scan-order pixel (whose west neighbor is guaranteed to be
// outside the component).
fn trace_boundary(
    labels: &[u32],
    label: u32,
    w: usize,
    h: usize,
    seed: (i32, i32),
) -> Vec<(i32, i32)> {
    let member = |x: i32, y: i32| -> bool {
        x >= 0 && y >= 0 && x < w as i32 && y < h as i32 && labels[y as usize * w + x as usize] == label
    };

    let mut contour = vec![seed];
    let mut cur = seed;
    let mut back_dir = 4usize; // direction from cur to its backtrack pixel (west)
    let mut first_move: Option<(usize, (i32, i32))> = None;

    let cap = 4 * (w + h).max(16) * 4;
    for _ in 0..cap {
        let mut found = None;
        for j in 1..=8 {
            let d = (back_dir + j) % 8;
            let n = (cur.0 + DIRS[d].0, cur.1 + DIRS[d].1);
            if member(n.0, n.1) {
                found = Some((d, n));
                break;
            }
        }
        let Some((d, n)) = found else {
            break; // isolated pixel
        };

        if cur == seed {
            match first_move {
                None => first_move = Some((d, n)),
                Some(fm) if fm == (d, n) => break,
                Some(_) => {}
            }
        }

        cur = n;
        if cur != seed {
            contour.push(cur);
        }
        back_dir = (d + 4) % 8;
    }

    contour
}

#[cfg(test)]
#[path = "../../tests/unit/raster/contour.rs"]
mod tests;
