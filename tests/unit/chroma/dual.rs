use super::*;
use crate::foundation::core::Rect;

const GREEN: [u8; 3] = [0, 255, 0];
const BLUE: [u8; 3] = [255, 0, 0];
const RED: [u8; 3] = [0, 0, 255];
const YELLOW: [u8; 3] = [0, 255, 255];

fn paint_rect(frame: &mut Frame, rect: Rect, bgr: [u8; 3]) {
    let w = frame.width();
    let data = frame.data_mut();
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let idx = ((y as u32 * w + x as u32) * 3) as usize;
            data[idx..idx + 3].copy_from_slice(&bgr);
        }
    }
}

fn dual_template() -> (Frame, Rect, Rect) {
    let mut template = Frame::filled(40, 80, BLUE).unwrap();
    let top = Rect {
        x: 8,
        y: 10,
        w: 16,
        h: 12,
    };
    let bottom = Rect {
        x: 8,
        y: 50,
        w: 16,
        h: 12,
    };
    paint_rect(&mut template, top, GREEN);
    paint_rect(&mut template, bottom, GREEN);
    (template, top, bottom)
}

#[test]
fn two_blobs_are_assigned_by_vertical_position() {
    let (template, top, bottom) = dual_template();
    let assignment = detect_dual_regions(&template).unwrap().unwrap();

    assert!(assignment.top.rect.y < assignment.bottom.rect.y);
    assert!((assignment.top.rect.y - top.y).abs() <= 1);
    assert!((assignment.bottom.rect.y - bottom.y).abs() <= 1);
}

#[test]
fn fewer_than_two_blobs_is_none() {
    let plain = Frame::filled(40, 80, BLUE).unwrap();
    assert!(detect_dual_regions(&plain).unwrap().is_none());

    let mut single = Frame::filled(40, 80, BLUE).unwrap();
    paint_rect(
        &mut single,
        Rect {
            x: 8,
            y: 10,
            w: 16,
            h: 12,
        },
        GREEN,
    );
    assert!(detect_dual_regions(&single).unwrap().is_none());
}

#[test]
fn more_than_two_blobs_keeps_the_two_largest() {
    let (mut template, top, bottom) = dual_template();
    // A small third blob between the two main regions.
    paint_rect(
        &mut template,
        Rect {
            x: 2,
            y: 35,
            w: 3,
            h: 3,
        },
        GREEN,
    );

    let assignment = detect_dual_regions(&template).unwrap().unwrap();
    assert!((assignment.top.rect.y - top.y).abs() <= 1);
    assert!((assignment.bottom.rect.y - bottom.y).abs() <= 1);
}

#[test]
fn both_sources_land_in_their_regions() {
    let (template, top, bottom) = dual_template();
    let assignment = detect_dual_regions(&template).unwrap().unwrap();
    let source_a = Frame::filled(6, 6, RED).unwrap();
    let source_b = Frame::filled(6, 6, YELLOW).unwrap();

    let out = composite_dual(&template, Some(&source_a), Some(&source_b), &assignment);
    let top_center = out.pixel((top.x + 8) as u32, (top.y + 6) as u32);
    let bottom_center = out.pixel((bottom.x + 8) as u32, (bottom.y + 6) as u32);
    assert_eq!(top_center, RED);
    assert_eq!(bottom_center, YELLOW);
    assert_eq!(out.pixel(2, 2), BLUE);
}

#[test]
fn absent_source_leaves_template_showing() {
    let (template, top, bottom) = dual_template();
    let assignment = detect_dual_regions(&template).unwrap().unwrap();
    let source_a = Frame::filled(6, 6, RED).unwrap();

    let out = composite_dual(&template, Some(&source_a), None, &assignment);
    assert_eq!(out.pixel((top.x + 8) as u32, (top.y + 6) as u32), RED);
    assert_eq!(
        out.pixel((bottom.x + 8) as u32, (bottom.y + 6) as u32),
        GREEN
    );
}

#[test]
fn blend_failure_fails_closed_to_the_bare_template() {
    let (template, _, _) = dual_template();
    let mut assignment = detect_dual_regions(&template).unwrap().unwrap();
    // Corrupt the bottom matte so its blend must fail.
    assignment.bottom_matte = AlphaMatte::opaque(1, 1).unwrap();

    let source_a = Frame::filled(6, 6, RED).unwrap();
    let source_b = Frame::filled(6, 6, YELLOW).unwrap();
    let out = composite_dual(&template, Some(&source_a), Some(&source_b), &assignment);
    assert_eq!(out, template);
}

#[test]
fn validation_report_fails_for_missing_file() {
    let report = validate_dual_template(Path::new("no_such_template.png"));
    assert!(!report.passed);
    assert!(report.message.contains("could not load template"));
}
