use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape as _;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{ToonError, ToonResult};
use crate::render::backend::{Raster, Surface};
use crate::render::plan::{DrawOp, FramePlan};
use crate::text::shaping::{FontBytes, ShapedLine, TextShaper};

/// Flattening tolerance for circles and arcs.
const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    points: [u64; 4],
    start: [u8; 4],
    end: [u8; 4],
    w: u32,
    h: u32,
}

struct GlyphSource {
    shaper: TextShaper,
    font: vello_cpu::peniko::FontData,
}

/// CPU rasterizer for [`FramePlan`]s, powered by `vello_cpu`.
///
/// Text is drawn only when a font was provided; without one, text ops are skipped.
pub struct CpuRasterizer {
    glyphs: Option<GlyphSource>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

impl CpuRasterizer {
    /// Rasterizer that cannot draw glyphs.
    pub fn without_text() -> Self {
        Self {
            glyphs: None,
            gradient_cache: HashMap::new(),
        }
    }

    /// Rasterizer that draws text with `font` at `size_px`.
    pub fn with_font(font: &FontBytes, size_px: f32) -> ToonResult<Self> {
        let shaper = TextShaper::new(font, size_px)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.as_bytes().to_vec()),
            0,
        );
        Ok(Self {
            glyphs: Some(GlyphSource { shaper, font }),
            gradient_cache: HashMap::new(),
        })
    }

    /// Shaper used for measuring, when a font is loaded.
    pub fn shaper_mut(&mut self) -> Option<&mut TextShaper> {
        self.glyphs.as_mut().map(|g| &mut g.shaper)
    }

    /// Paint `plan` onto `surface`. Returns `false` when the surface had no context.
    pub fn execute(&mut self, plan: &FramePlan, surface: &mut Surface) -> ToonResult<bool> {
        let canvas = surface.canvas();
        let Some(Raster { ctx, pixmap }) = surface.raster_mut() else {
            return Ok(false);
        };

        ctx.reset();
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let full = vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
        );

        for op in &plan.ops {
            match op {
                DrawOp::Fill { color } => {
                    ctx.set_paint(cpu_color(*color));
                    ctx.fill_rect(&full);
                }
                DrawOp::LinearGradient {
                    start,
                    end,
                    from,
                    to,
                } => {
                    let img =
                        self.gradient_paint(*start, *end, *from, *to, canvas.width, canvas.height)?;
                    ctx.set_paint(img);
                    ctx.fill_rect(&full);
                }
                DrawOp::Circle {
                    center,
                    radius,
                    color,
                } => {
                    if *radius <= 0.0 {
                        continue;
                    }
                    let path = kurbo::Circle::new(*center, *radius).to_path(PATH_TOLERANCE);
                    ctx.set_paint(cpu_color(*color));
                    ctx.fill_path(&bezpath_to_cpu(&path));
                }
                DrawOp::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep_angle,
                    width,
                    color,
                } => {
                    let arc = kurbo::Arc::new(
                        *center,
                        (*radius, *radius),
                        *start_angle,
                        *sweep_angle,
                        0.0,
                    );
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                    ctx.set_paint(cpu_color(*color));
                    ctx.stroke_path(&bezpath_to_cpu(&arc.to_path(PATH_TOLERANCE)));
                }
                DrawOp::Line {
                    from,
                    to,
                    width,
                    color,
                } => {
                    let mut path = vello_cpu::kurbo::BezPath::new();
                    path.move_to(cpu_point(*from));
                    path.line_to(cpu_point(*to));
                    let stroke = vello_cpu::kurbo::Stroke::new(*width)
                        .with_caps(vello_cpu::kurbo::Cap::Round);
                    ctx.set_stroke(stroke);
                    ctx.set_paint(cpu_color(*color));
                    ctx.stroke_path(&path);
                }
                DrawOp::Text {
                    text,
                    center_x,
                    baseline_y,
                    color,
                } => {
                    let Some(glyphs) = self.glyphs.as_mut() else {
                        continue;
                    };
                    let line = glyphs.shaper.shape_line(text, *color);
                    draw_line(ctx, &glyphs.font, &line, *center_x, *baseline_y);
                    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                }
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(pixmap);
        Ok(true)
    }

    fn gradient_paint(
        &mut self,
        start: Point,
        end: Point,
        from: Rgba8,
        to: Rgba8,
        w: u32,
        h: u32,
    ) -> ToonResult<vello_cpu::Image> {
        let key = GradientKey {
            points: [
                start.x.to_bits(),
                start.y.to_bits(),
                end.x.to_bits(),
                end.y.to_bits(),
            ],
            start: from.premultiplied(),
            end: to.premultiplied(),
            w,
            h,
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let bytes = linear_gradient_rgba8_premul(start, end, from, to, w, h);
        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }
}

fn draw_line(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    line: &ShapedLine,
    center_x: f64,
    baseline_y: f64,
) {
    let x = center_x - f64::from(line.width) / 2.0;
    let y = baseline_y - f64::from(line.baseline);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
    for layout_line in line.layout.lines() {
        for item in layout_line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

/// Rasterize a two-stop linear gradient: each pixel center is projected onto `start -> end`
/// and the projection is clamped to `[0, 1]`.
pub(crate) fn linear_gradient_rgba8_premul(
    start: Point,
    end: Point,
    from: Rgba8,
    to: Rgba8,
    w: u32,
    h: u32,
) -> Vec<u8> {
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let d = end - start;
    let len2 = d.hypot2();
    let a = from.premultiplied();
    let b = to.premultiplied();
    for y in 0..h {
        for x in 0..w {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let t = if len2 <= f64::EPSILON {
                0.0
            } else {
                ((p - start).dot(d) / len2).clamp(0.0, 1.0)
            };
            let lerp = |a: u8, b: u8| -> u8 {
                let af = f64::from(a);
                let bf = f64::from(b);
                (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
            };
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&[
                lerp(a[0], b[0]),
                lerp(a[1], b[1]),
                lerp(a[2], b[2]),
                lerp(a[3], b[3]),
            ]);
        }
    }
    bytes
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(cpu_point(p)),
            PathEl::LineTo(p) => out.line_to(cpu_point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(cpu_point(p1), cpu_point(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(cpu_point(p1), cpu_point(p2), cpu_point(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ToonResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ToonError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ToonError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ToonError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> ToonResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
