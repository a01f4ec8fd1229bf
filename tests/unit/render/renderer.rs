use super::*;
use crate::foundation::core::Canvas;
use crate::render::backend::FrameRGBA;

fn renderer(canvas: Canvas) -> FrameRenderer {
    let config = GeneratorConfig {
        canvas,
        ..GeneratorConfig::default()
    };
    FrameRenderer::new(&config).unwrap()
}

#[test]
fn missing_surface_is_silent() {
    let mut r = renderer(Canvas::default());
    let mut surface = Surface::new(Canvas {
        width: 0,
        height: 0,
    });
    let painted = r
        .render_frame(&mut surface, FrameIndex(0), 120, &["hi".to_string()])
        .unwrap();
    assert!(!painted);
}

#[test]
fn frames_differ_as_the_character_moves() {
    let canvas = Canvas {
        width: 160,
        height: 120,
    };
    let mut r = renderer(canvas);
    let words = vec!["bounce".to_string()];
    let mut surface = Surface::new(canvas);

    assert!(r.render_frame(&mut surface, FrameIndex(0), 120, &words).unwrap());
    let a = surface.snapshot().unwrap();
    assert!(r.render_frame(&mut surface, FrameIndex(15), 120, &words).unwrap());
    let b = surface.snapshot().unwrap();
    assert_ne!(a.data, b.data);
}

#[test]
fn same_frame_is_deterministic() {
    let canvas = Canvas {
        width: 96,
        height: 96,
    };
    let mut r = renderer(canvas);
    let words = vec!["same".to_string()];
    let mut s1 = Surface::new(canvas);
    let mut s2 = Surface::new(canvas);
    r.render_frame(&mut s1, FrameIndex(42), 120, &words).unwrap();
    r.render_frame(&mut s2, FrameIndex(42), 120, &words).unwrap();
    assert_eq!(s1.snapshot(), s2.snapshot());
}

#[test]
fn missing_font_file_is_a_config_error() {
    let config = GeneratorConfig {
        font_path: Some("definitely/not/here.ttf".into()),
        ..GeneratorConfig::default()
    };
    assert!(matches!(
        FrameRenderer::new(&config),
        Err(crate::foundation::error::ToonError::Config(_))
    ));
}

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

/// Bounding box `(x0, y0, x1, y1)` of pixels that differ between `a` and `b`.
fn diff_bounds(a: &FrameRGBA, b: &FrameRGBA) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..a.height {
        for x in 0..a.width {
            if a.pixel(x, y) == b.pixel(x, y) {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

fn last_frame(r: &mut FrameRenderer, canvas: Canvas, text: &str) -> FrameRGBA {
    let mut surface = Surface::new(canvas);
    assert!(r.render_frame(&mut surface, FrameIndex(119), 120, &words(text)).unwrap());
    surface.snapshot().unwrap()
}

#[test]
fn default_config_draws_a_centered_subtitle_on_the_first_baseline() {
    let canvas = Canvas::default();
    let mut r = renderer(canvas);
    let with_text = last_frame(&mut r, canvas, "Hello world this is a test");
    let without_text = last_frame(&mut r, canvas, "");

    let (x0, y0, x1, y1) =
        diff_bounds(&with_text, &without_text).expect("subtitle pixels were painted");
    // First baseline sits at height - 100; glyphs span roughly one em above it.
    assert!(y0 >= 500 - 26, "top {y0}");
    assert!(y1 <= 500 + 8, "bottom {y1}");
    let mid = f64::from(x0 + x1) / 2.0;
    assert!((mid - 400.0).abs() <= 6.0, "subtitle centered at {mid}");
}

#[test]
fn long_subtitles_wrap_onto_following_lines() {
    let canvas = Canvas {
        width: 320,
        height: 240,
    };
    let mut r = renderer(canvas);
    let text = "Once upon a time a bouncing circle told a story about sparkles";
    let plan = r.plan_frame(FrameIndex(119), 120, &words(text));
    let lines: Vec<&str> = plan.subtitle_lines().collect();
    assert!(lines.len() >= 2, "{lines:?}");

    let with_text = last_frame(&mut r, canvas, text);
    let without_text = last_frame(&mut r, canvas, "");
    let (_, _, _, y1) = diff_bounds(&with_text, &without_text).unwrap();
    // Painted below the first baseline (140), i.e. on a following line.
    assert!(y1 > 140 + 8, "bottom {y1}");
}

#[test]
fn configured_font_replaces_the_bundled_one() {
    let canvas = Canvas {
        width: 320,
        height: 240,
    };
    let mut bundled = renderer(canvas);
    let mut mono = FrameRenderer::new(&GeneratorConfig {
        canvas,
        font_path: Some(
            concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/fonts/DejaVuSansMono.ttf").into(),
        ),
        ..GeneratorConfig::default()
    })
    .unwrap();

    let a = last_frame(&mut bundled, canvas, "Hello world");
    let b = last_frame(&mut mono, canvas, "Hello world");
    assert_ne!(a, b);
}
