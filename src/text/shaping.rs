use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ToonError, ToonResult};
use crate::text::wrap::TextMeasure;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Subtitle font used when none is configured (DejaVu Sans Bold).
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Raw font file bytes shared between the shaper and the rasterizer.
#[derive(Clone, Debug)]
pub struct FontBytes(Arc<Vec<u8>>);

impl FontBytes {
    /// Wrap already-loaded font bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    /// The bundled bold sans-serif subtitle font.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_FONT.to_vec())
    }

    /// Read a TTF/OTF file.
    pub fn load(path: &Path) -> ToonResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ToonError::config(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Ok(Self::new(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// One shaped subtitle line ready to rasterize.
pub(crate) struct ShapedLine {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    /// Advance width of the visible text.
    pub(crate) width: f32,
    /// Baseline offset from the top of the layout box.
    pub(crate) baseline: f32,
}

/// Stateful helper for shaping lines with a single registered font.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    size_px: f32,
}

impl TextShaper {
    /// Register `font` and shape at `size_px`.
    pub fn new(font: &FontBytes, size_px: f32) -> ToonResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ToonError::validation("text size_px must be finite and > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.as_bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ToonError::config("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ToonError::config("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            size_px,
        })
    }

    /// Font size used for every line.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    fn layout(&mut self, text: &str, brush: TextBrushRgba8) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    pub(crate) fn shape_line(&mut self, text: &str, color: Rgba8) -> ShapedLine {
        let layout = self.layout(text, color.into());
        let width = layout.width();
        let baseline = layout
            .lines()
            .next()
            .map(|l| l.metrics().baseline)
            .unwrap_or(self.size_px);
        ShapedLine {
            layout,
            width,
            baseline,
        }
    }
}

impl TextMeasure for TextShaper {
    fn measure(&mut self, text: &str) -> f32 {
        self.layout(text, TextBrushRgba8::default()).full_width()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaping.rs"]
mod tests;
