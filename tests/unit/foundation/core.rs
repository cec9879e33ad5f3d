use super::*;

#[test]
fn frame_rejects_bad_buffer_and_zero_dims() {
    assert!(Frame::from_bgr8(2, 2, vec![0; 11]).is_err());
    assert!(Frame::from_bgr8(0, 2, vec![]).is_err());
    assert!(Frame::from_bgr8(2, 0, vec![]).is_err());
    assert!(Frame::from_bgr8(2, 2, vec![0; 12]).is_ok());
}

#[test]
fn filled_frame_reads_back_its_color() {
    let frame = Frame::filled(3, 2, [7, 8, 9]).unwrap();
    assert_eq!(frame.width(), 3);
    assert_eq!(frame.height(), 2);
    for y in 0..2 {
        for x in 0..3 {
            assert_eq!(frame.pixel(x, y), [7, 8, 9]);
        }
    }
}

#[test]
fn black_frame_is_all_zero() {
    let frame = Frame::black(2, 2).unwrap();
    assert!(frame.data().iter().all(|&v| v == 0));
}

#[test]
fn mask_rejects_bad_buffer() {
    assert!(Mask::from_gray8(2, 2, vec![0; 3]).is_err());
    assert!(Mask::from_gray8(0, 1, vec![]).is_err());
    let mask = Mask::zeroed(4, 4).unwrap();
    assert!(mask.is_all_zero());
}

#[test]
fn rect_edges_are_exclusive() {
    let r = Rect {
        x: 3,
        y: -2,
        w: 10,
        h: 4,
    };
    assert_eq!(r.right(), 13);
    assert_eq!(r.bottom(), 2);
}

#[test]
fn matte_weight_sum_counts_filled_pixels() {
    let matte = AlphaMatte::from_weights(2, 2, vec![1.0, 0.0, 1.0, 1.0]).unwrap();
    assert_eq!(matte.weight_sum(), 3.0);
    assert!(AlphaMatte::from_weights(2, 2, vec![1.0]).is_err());

    let opaque = AlphaMatte::opaque(3, 3).unwrap();
    assert_eq!(opaque.weight_sum(), 9.0);
}

#[test]
fn fps_validates_and_converts() {
    assert!(Fps::new(30, 0).is_err());
    assert!(Fps::new(0, 1).is_err());

    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.as_f64(), 30.0);
    assert_eq!(fps.secs_to_frames_floor(2.5), 75);
    assert_eq!(fps.secs_to_frames_floor(0.0), 0);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.secs_to_frames_floor(1.0), 29);
}
