use super::*;

#[test]
fn even_blur_strength_bumps_to_next_odd() {
    assert_eq!(effective_blur_kernel(50), 51);
    assert_eq!(effective_blur_kernel(51), 51);
    assert_eq!(effective_blur_kernel(0), 1);
    assert_eq!(effective_blur_kernel(DEFAULT_BLUR_STRENGTH), 51);
}

#[test]
fn output_always_matches_the_target_raster() {
    let source = Frame::filled(64, 48, [10, 20, 30]).unwrap();
    let out = composite_blur(&source, &BlurSettings::default(), 90, 160, 5).unwrap();
    assert_eq!((out.width(), out.height()), (90, 160));
}

#[test]
fn matching_aspect_covers_the_whole_target() {
    // A 9:16 source fitted into a 9:16 target leaves no leftover space, so
    // the sharp layer hides the blurred background completely.
    let mut source = Frame::filled(90, 160, [40, 80, 120]).unwrap();
    source.data_mut()[0] = 200; // make it non-uniform so blur would differ
    let out = composite_blur(&source, &BlurSettings::default(), 90, 160, 9).unwrap();
    assert_eq!(out, source);
}

#[test]
fn centered_placement_splits_leftover_space() {
    assert_eq!(placement_offset(50.0, 100), 50);
    assert_eq!(placement_offset(0.0, 100), 0);
    assert_eq!(placement_offset(100.0, 100), 100);
    assert_eq!(placement_offset(50.0, 101), 50); // floor-rounded
    assert_eq!(placement_offset(50.0, 0), 0);
    assert_eq!(placement_offset(150.0, 100), 100); // clamped
}

#[test]
fn full_crop_resets_to_no_crop() {
    let source = Frame::filled(4, 10, [1, 2, 3]).unwrap();
    let out = crop_by_percent(&source, 60.0, 60.0).unwrap();
    assert_eq!(out.height(), 10);
}

#[test]
fn partial_crop_drops_the_requested_rows() {
    let source = Frame::filled(4, 10, [1, 2, 3]).unwrap();
    let out = crop_by_percent(&source, 10.0, 20.0).unwrap();
    assert_eq!(out.height(), 7);
}

#[test]
fn aspect_fit_never_stretches() {
    // Wider than 9:16: width pins to the target, height shrinks below it.
    let wide = Frame::filled(200, 100, [0, 0, 0]).unwrap();
    let fitted = fit_to_aspect(&wide, 90, 160).unwrap();
    assert_eq!(fitted.width(), 90);
    assert!(fitted.height() <= 160);
    let ratio = f64::from(fitted.width()) / f64::from(fitted.height());
    assert!((ratio - 2.0).abs() < 0.1);

    // Taller than 9:16: height pins to the target.
    let tall = Frame::filled(100, 400, [0, 0, 0]).unwrap();
    let fitted = fit_to_aspect(&tall, 90, 160).unwrap();
    assert_eq!(fitted.height(), 160);
    assert!(fitted.width() <= 90);
}

#[test]
fn square_source_centers_vertically() {
    let source = Frame::filled(100, 100, [30, 60, 90]).unwrap();
    let settings = BlurSettings::default(); // x=50, y=50, no crop
    let out = composite_blur(&source, &settings, 100, 200, 5).unwrap();

    // The sharp 100x100 content sits at y offset (200-100)/2 = 50. The
    // constant source makes blur and sharp identical in color, so verify
    // geometry through the full output being the constant color.
    assert_eq!((out.width(), out.height()), (100, 200));
    assert_eq!(out.pixel(50, 100), [30, 60, 90]);
}

#[test]
fn optimal_crop_suggests_nothing_for_wide_sources() {
    let wide = Frame::filled(1920, 1080, [0, 0, 0]).unwrap();
    assert_eq!(optimal_crop(&wide), (0.0, 0.0));

    let exact = Frame::filled(1080, 1920, [0, 0, 0]).unwrap();
    assert_eq!(optimal_crop(&exact), (0.0, 0.0));
}

#[test]
fn optimal_crop_caps_each_side_at_20_percent() {
    let very_tall = Frame::filled(1000, 3000, [0, 0, 0]).unwrap();
    let (top, bottom) = optimal_crop(&very_tall);
    assert_eq!(top, 20.0);
    assert_eq!(bottom, 20.0);

    let slightly_tall = Frame::filled(1000, 2000, [0, 0, 0]).unwrap();
    let (top, bottom) = optimal_crop(&slightly_tall);
    assert!(top > 0.0 && top < 20.0);
    assert_eq!(top, bottom);
}
