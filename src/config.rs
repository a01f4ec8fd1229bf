//! Generator configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config file. Environment variables
//! override file values: `TOONREEL_FONT` (font path) and `TOONREEL_REFRESH_HZ`.

use std::path::{Path, PathBuf};

use crate::animation::motion::MotionParams;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ToonError, ToonResult};
use crate::render::plan::{Palette, SceneParams};
use crate::text::wrap::SubtitleLayout;

/// Environment variable overriding [`GeneratorConfig::font_path`].
pub const ENV_FONT: &str = "TOONREEL_FONT";
/// Environment variable overriding [`GeneratorConfig::refresh_hz`].
pub const ENV_REFRESH_HZ: &str = "TOONREEL_REFRESH_HZ";

/// Full configuration of a generation run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Drawing surface size.
    pub canvas: Canvas,
    /// Frame budget of one run.
    pub max_frames: u64,
    /// Display refresh rate pacing the realtime clock.
    pub refresh_hz: u32,
    /// TTF/OTF font for subtitles, replacing the bundled DejaVu Sans Bold.
    pub font_path: Option<PathBuf>,
    /// Character and sparkle motion.
    pub motion: MotionParams,
    /// Subtitle placement and size.
    pub layout: SubtitleLayout,
    /// Colors.
    pub palette: Palette,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            max_frames: 120,
            refresh_hz: 60,
            font_path: None,
            motion: MotionParams::default(),
            layout: SubtitleLayout::default(),
            palette: Palette::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a JSON config.
    pub fn from_json_str(s: &str) -> ToonResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| ToonError::config(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> ToonResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            ToonError::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Apply environment overrides from the process environment.
    pub fn with_env_overrides(self) -> ToonResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ToonResult<Self> {
        if let Some(font) = lookup(ENV_FONT).filter(|v| !v.trim().is_empty()) {
            self.font_path = Some(PathBuf::from(font));
        }
        if let Some(hz) = lookup(ENV_REFRESH_HZ) {
            self.refresh_hz = hz.trim().parse::<u32>().map_err(|_| {
                ToonError::config(format!("{ENV_REFRESH_HZ} must be a positive integer"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject configurations the renderer cannot honor.
    pub fn validate(&self) -> ToonResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ToonError::config("canvas width/height must be non-zero"));
        }
        if self.max_frames == 0 {
            return Err(ToonError::config("max_frames must be > 0"));
        }
        if self.refresh_hz == 0 {
            return Err(ToonError::config("refresh_hz must be > 0"));
        }
        if !self.layout.font_size_px.is_finite() || self.layout.font_size_px <= 0.0 {
            return Err(ToonError::config("layout.font_size_px must be finite and > 0"));
        }
        if !self.motion.bounce_speed.is_finite() || self.motion.bounce_speed == 0.0 {
            return Err(ToonError::config("motion.bounce_speed must be finite and non-zero"));
        }
        Ok(())
    }

    /// Display refresh rate as a frame rate.
    pub fn refresh_rate(&self) -> ToonResult<Fps> {
        Fps::new(self.refresh_hz, 1)
    }

    /// Scene parameters for the renderer.
    pub fn scene(&self) -> SceneParams {
        SceneParams {
            canvas: self.canvas,
            motion: self.motion,
            layout: self.layout,
            palette: self.palette,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
