use super::*;

fn solid(bgr: [u8; 3]) -> Frame {
    Frame::filled(2, 2, bgr).unwrap()
}

#[test]
fn rejects_empty_and_mismatched_inputs() {
    assert!(TemplateStream::new(vec![], vec![]).is_err());
    assert!(TemplateStream::new(vec![solid([1, 1, 1])], vec![100, 100]).is_err());
}

#[test]
fn single_frame_stream_is_static() {
    let stream = TemplateStream::from_frame(solid([5, 5, 5]));
    assert_eq!(stream.len(), 1);
    assert!(stream.is_static());
    assert!(!stream.is_empty());
    assert_eq!(stream.cycle_duration_ms(0), STATIC_FRAME_MS);
}

#[test]
fn cycle_frame_wraps_modulo_length() {
    let frames = vec![solid([0, 0, 0]), solid([1, 1, 1]), solid([2, 2, 2])];
    let stream = TemplateStream::new(frames, vec![50, 60, 70]).unwrap();
    assert!(!stream.is_static());

    for index in 0..9u64 {
        let expected = (index % 3) as u8;
        assert_eq!(stream.cycle_frame(index).pixel(0, 0), [expected; 3]);
    }
    assert_eq!(stream.cycle_duration_ms(4), 60);
    assert_eq!(stream.frame(2).unwrap().pixel(0, 0), [2, 2, 2]);
    assert!(stream.frame(3).is_none());
}
