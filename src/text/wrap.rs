use smallvec::SmallVec;

use crate::foundation::core::Canvas;

/// Wrapped subtitle lines. Subtitles rarely exceed a handful of lines.
pub type WrappedLines = SmallVec<[String; 4]>;

/// Measures the rendered advance width of a string in pixels.
pub trait TextMeasure {
    /// Advance width of `text`, trailing whitespace included.
    fn measure(&mut self, text: &str) -> f32;
}

/// Font-free estimate: every character advances by the same amount.
///
/// Used when no font is configured, and in tests where exact widths matter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    /// Advance per character in pixels.
    pub advance_px: f32,
}

impl FixedAdvance {
    /// Average advance of a bold sans face at `font_size_px`.
    pub fn for_font_size(font_size_px: f32) -> Self {
        Self {
            advance_px: font_size_px * 0.55,
        }
    }
}

impl TextMeasure for FixedAdvance {
    fn measure(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance_px
    }
}

/// Placement of the subtitle block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SubtitleLayout {
    /// Pixels subtracted from the surface width to get the line budget.
    pub margin_px: f32,
    /// Vertical distance between consecutive baselines.
    pub line_step_px: f32,
    /// Distance from the bottom edge to the first baseline.
    pub bottom_offset_px: f32,
    /// Hard cap on words considered for wrapping per frame.
    pub max_wrap_words: usize,
    /// Font size in pixels.
    pub font_size_px: f32,
}

impl Default for SubtitleLayout {
    fn default() -> Self {
        Self {
            margin_px: 40.0,
            line_step_px: 30.0,
            bottom_offset_px: 100.0,
            max_wrap_words: 15,
            font_size_px: 24.0,
        }
    }
}

impl SubtitleLayout {
    /// Line width budget for `canvas`.
    pub fn max_width(&self, canvas: Canvas) -> f32 {
        (canvas.width as f32 - self.margin_px).max(0.0)
    }

    /// Baseline y of line `line` (0-based).
    pub fn baseline_y(&self, canvas: Canvas, line: usize) -> f32 {
        canvas.height as f32 - self.bottom_offset_px + self.line_step_px * line as f32
    }

    /// Wrap the revealed words for `canvas`.
    pub fn wrap<M: TextMeasure + ?Sized>(
        &self,
        canvas: Canvas,
        words: &[String],
        measure: &mut M,
    ) -> WrappedLines {
        wrap_words(words, self.max_wrap_words, self.max_width(canvas), measure)
    }
}

/// Greedy wrap of the first `max_words` words into lines no wider than `max_width`.
///
/// The candidate `line + word + " "` is measured; when it overflows and the word is not the first
/// one, the current line is emitted and the word starts a new line. A word that alone exceeds the
/// budget therefore ends up on a line of its own. Emitted lines carry no trailing space.
pub fn wrap_words<M: TextMeasure + ?Sized>(
    words: &[String],
    max_words: usize,
    max_width: f32,
    measure: &mut M,
) -> WrappedLines {
    let mut lines = WrappedLines::new();
    let mut line = String::new();

    for (n, word) in words.iter().take(max_words).enumerate() {
        let candidate = format!("{line}{word} ");
        if n > 0 && measure.measure(&candidate) > max_width {
            lines.push(line.trim_end().to_owned());
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(line.trim_end().to_owned());
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
