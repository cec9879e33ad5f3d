use super::*;

fn mask_with_rects(w: u32, h: u32, rects: &[Rect]) -> Mask {
    let mut data = vec![0u8; (w * h) as usize];
    for r in rects {
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                data[(y as u32 * w + x as u32) as usize] = 255;
            }
        }
    }
    Mask::from_gray8(w, h, data).unwrap()
}

#[test]
fn empty_mask_has_no_blobs() {
    let blobs = find_blobs(&Mask::zeroed(8, 8).unwrap());
    assert!(blobs.is_empty());
    assert!(largest_blob(&blobs).is_none());
}

#[test]
fn single_rectangle_blob_geometry() {
    let rect = Rect {
        x: 2,
        y: 3,
        w: 4,
        h: 3,
    };
    let blobs = find_blobs(&mask_with_rects(10, 10, &[rect]));
    assert_eq!(blobs.len(), 1);

    let blob = &blobs[0];
    assert_eq!(blob.rect, rect);
    assert_eq!(blob.area, 12);
    assert!(blob.filled.iter().all(|&v| v == 255));
    assert!(!blob.contour.is_empty());
    for &(x, y) in &blob.contour {
        assert!(x >= rect.x && x < rect.right());
        assert!(y >= rect.y && y < rect.bottom());
    }
    // The contour walks the rectangle's perimeter, corners included.
    for corner in [
        (rect.x, rect.y),
        (rect.right() - 1, rect.y),
        (rect.right() - 1, rect.bottom() - 1),
        (rect.x, rect.bottom() - 1),
    ] {
        assert!(blob.contour.contains(&corner));
    }
}

#[test]
fn disjoint_blobs_come_back_in_scan_order() {
    let top = Rect {
        x: 5,
        y: 1,
        w: 3,
        h: 2,
    };
    let bottom = Rect {
        x: 1,
        y: 6,
        w: 5,
        h: 3,
    };
    let blobs = find_blobs(&mask_with_rects(12, 12, &[bottom, top]));
    assert_eq!(blobs.len(), 2);
    assert_eq!(blobs[0].rect, top);
    assert_eq!(blobs[1].rect, bottom);
}

#[test]
fn largest_blob_prefers_area_then_scan_order() {
    let small = Rect {
        x: 1,
        y: 1,
        w: 2,
        h: 2,
    };
    let big = Rect {
        x: 1,
        y: 6,
        w: 4,
        h: 4,
    };
    let blobs = find_blobs(&mask_with_rects(12, 12, &[small, big]));
    assert_eq!(largest_blob(&blobs).unwrap().rect, big);

    // Equal areas: the first in scan order wins.
    let twin = Rect {
        x: 6,
        y: 1,
        w: 2,
        h: 2,
    };
    let blobs = find_blobs(&mask_with_rects(12, 12, &[small, twin]));
    assert_eq!(blobs[0].area, blobs[1].area);
    assert_eq!(largest_blob(&blobs).unwrap().rect, blobs[0].rect);
}

#[test]
fn interior_holes_are_filled_into_the_area() {
    // A 5x5 ring: border pixels set, center 3x3 clear.
    let mut data = vec![0u8; 49];
    for y in 1..6 {
        for x in 1..6 {
            if x == 1 || x == 5 || y == 1 || y == 5 {
                data[y * 7 + x] = 255;
            }
        }
    }
    let blobs = find_blobs(&Mask::from_gray8(7, 7, data).unwrap());
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].area, 25);
    assert!(blobs[0].filled.iter().all(|&v| v == 255));
}

#[test]
fn soft_halo_below_threshold_is_background() {
    let mut data = vec![0u8; 25];
    data[12] = 255;
    data[11] = FOREGROUND_THRESHOLD - 1;
    data[13] = FOREGROUND_THRESHOLD;
    let blobs = find_blobs(&Mask::from_gray8(5, 5, data).unwrap());
    assert_eq!(blobs.len(), 1);
    assert_eq!(blobs[0].area, 2);
    assert_eq!(blobs[0].rect.x, 2);
    assert_eq!(blobs[0].rect.w, 2);
}

#[test]
fn isolated_pixel_contour_is_the_pixel_itself() {
    let mut data = vec![0u8; 25];
    data[12] = 255;
    let blobs = find_blobs(&Mask::from_gray8(5, 5, data).unwrap());
    assert_eq!(blobs[0].contour, vec![(2, 2)]);
}
