//! Frame compilation: resolves one frame of the animation into an ordered list of draw
//! operations. Compilation is pure, so frames can be inspected without rasterizing.

use crate::animation::motion::{CharacterPose, MotionParams};
use crate::foundation::core::{Canvas, FrameIndex, Point, Rgba8};
use crate::script::words::revealed_count;
use crate::text::wrap::{SubtitleLayout, TextMeasure};

/// Colors used by the frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Flat fill painted before the gradient.
    pub background: Rgba8,
    /// Gradient color at the top-left corner.
    pub gradient_start: Rgba8,
    /// Gradient color at the bottom-right corner.
    pub gradient_end: Rgba8,
    /// Character body.
    pub body: Rgba8,
    /// Eyes, smile, arms and subtitle text.
    pub ink: Rgba8,
    /// Sparkles.
    pub sparkle: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba8::rgb(0xe0, 0xf2, 0xfe),
            gradient_start: Rgba8::rgb(0xba, 0xe6, 0xfd),
            gradient_end: Rgba8::rgb(0x7d, 0xd3, 0xfc),
            body: Rgba8::rgb(0xfb, 0xbf, 0x24),
            ink: Rgba8::rgb(0x1f, 0x29, 0x37),
            sparkle: Rgba8::rgb(0xfc, 0xd3, 0x4d),
        }
    }
}

/// Stroke width of the smile arc.
const SMILE_WIDTH: f64 = 3.0;
/// Stroke width of the arms.
const ARM_WIDTH: f64 = 8.0;

/// One backend-agnostic drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill the whole surface with a flat color.
    Fill {
        /// Fill color.
        color: Rgba8,
    },
    /// Fill the whole surface with a two-stop linear gradient.
    LinearGradient {
        /// Point where `from` applies.
        start: Point,
        /// Point where `to` applies.
        end: Point,
        /// Start color.
        from: Rgba8,
        /// End color.
        to: Rgba8,
    },
    /// Filled circle.
    Circle {
        /// Circle center.
        center: Point,
        /// Circle radius.
        radius: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// Open stroked arc, angles in radians, y pointing down.
    Arc {
        /// Arc center.
        center: Point,
        /// Arc radius.
        radius: f64,
        /// Start angle.
        start_angle: f64,
        /// Sweep angle.
        sweep_angle: f64,
        /// Stroke width.
        width: f64,
        /// Stroke color.
        color: Rgba8,
    },
    /// Round-capped line segment.
    Line {
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
        /// Stroke width.
        width: f64,
        /// Stroke color.
        color: Rgba8,
    },
    /// One line of text centered on `center_x`.
    Text {
        /// Text content.
        text: String,
        /// Horizontal center of the line.
        center_x: f64,
        /// Alphabetic baseline.
        baseline_y: f64,
        /// Text color.
        color: Rgba8,
    },
}

/// Every parameter a frame depends on apart from the frame index and the words.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SceneParams {
    /// Surface size.
    pub canvas: Canvas,
    /// Character and sparkle motion.
    pub motion: MotionParams,
    /// Subtitle placement.
    pub layout: SubtitleLayout,
    /// Colors.
    pub palette: Palette,
}

/// Draw operations for one frame in painter's order.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Frame the plan was compiled for.
    pub frame: FrameIndex,
    /// Number of words revealed in this frame.
    pub revealed_words: usize,
    /// Operations, back to front.
    pub ops: Vec<DrawOp>,
}

impl FramePlan {
    /// Subtitle lines in top-to-bottom order.
    pub fn subtitle_lines(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Compile frame `frame` of a `max_frames` run over `words`.
pub fn compile_frame<M: TextMeasure + ?Sized>(
    scene: &SceneParams,
    frame: FrameIndex,
    max_frames: u64,
    words: &[String],
    measure: &mut M,
) -> FramePlan {
    let SceneParams {
        canvas,
        motion,
        layout,
        palette,
    } = scene;
    let t = frame.as_f64();
    let center = canvas.center();
    let mut ops = Vec::with_capacity(24);

    ops.push(DrawOp::Fill {
        color: palette.background,
    });
    ops.push(DrawOp::LinearGradient {
        start: Point::ORIGIN,
        end: Point::new(f64::from(canvas.width), f64::from(canvas.height)),
        from: palette.gradient_start,
        to: palette.gradient_end,
    });

    let pose = CharacterPose::at(motion, center, t);
    ops.push(DrawOp::Circle {
        center: pose.body,
        radius: motion.body_radius,
        color: palette.body,
    });
    for eye in [pose.eye_left, pose.eye_right] {
        ops.push(DrawOp::Circle {
            center: eye,
            radius: motion.eye_radius,
            color: palette.ink,
        });
    }
    ops.push(DrawOp::Arc {
        center: pose.smile,
        radius: motion.smile_radius,
        start_angle: 0.0,
        sweep_angle: std::f64::consts::PI,
        width: SMILE_WIDTH,
        color: palette.ink,
    });
    for (from, to) in [pose.arm_left, pose.arm_right] {
        ops.push(DrawOp::Line {
            from,
            to,
            width: ARM_WIDTH,
            color: palette.ink,
        });
    }

    let revealed = revealed_count(frame, max_frames, words.len());
    let lines = layout.wrap(*canvas, &words[..revealed], measure);
    for (i, line) in lines.into_iter().enumerate() {
        ops.push(DrawOp::Text {
            text: line,
            center_x: center.x,
            baseline_y: f64::from(layout.baseline_y(*canvas, i)),
            color: palette.ink,
        });
    }

    for i in 0..motion.sparkle_count {
        let (pos, radius) = motion.sparkle(center, t, i);
        ops.push(DrawOp::Circle {
            center: pos,
            radius,
            color: palette.sparkle,
        });
    }

    FramePlan {
        frame,
        revealed_words: revealed,
        ops,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
