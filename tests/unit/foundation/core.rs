use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
    assert_eq!(r.len_frames(), 3);
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
}

#[test]
fn budget_range_iterates_every_frame_once() {
    let frames: Vec<u64> = FrameRange::budget(4).iter().map(|f| f.0).collect();
    assert_eq!(frames, vec![0, 1, 2, 3]);
}

#[test]
fn canvas_center_is_half_extent() {
    let c = Canvas::default();
    assert_eq!(c.center(), Point::new(400.0, 300.0));
}

#[test]
fn hex_colors_parse() {
    assert_eq!(Rgba8::from_hex("#e0f2fe").unwrap(), Rgba8::rgb(0xe0, 0xf2, 0xfe));
    assert_eq!(Rgba8::from_hex("#11223380").unwrap().a, 0x80);
    assert!(Rgba8::from_hex("e0f2fe").is_err());
    assert!(Rgba8::from_hex("#e0f2").is_err());
    assert!(Rgba8::from_hex("#zzzzzz").is_err());
}

#[test]
fn premultiply_scales_channels() {
    let c = Rgba8 {
        r: 255,
        g: 128,
        b: 0,
        a: 128,
    };
    assert_eq!(c.premultiplied(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::rgb(1, 2, 3).premultiplied(), [1, 2, 3, 255]);
}

#[test]
fn fps_validates_and_converts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
    let fps = Fps::new(50, 1).unwrap();
    assert_eq!(fps.frame_duration(), std::time::Duration::from_millis(20));
}
