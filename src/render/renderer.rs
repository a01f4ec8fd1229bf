use crate::config::GeneratorConfig;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ToonResult;
use crate::render::backend::Surface;
use crate::render::cpu::CpuRasterizer;
use crate::render::plan::{FramePlan, SceneParams, compile_frame};
use crate::text::shaping::FontBytes;
use crate::text::wrap::{FixedAdvance, TextMeasure};

/// Paints animation frames onto a [`Surface`].
pub struct FrameRenderer {
    scene: SceneParams,
    raster: CpuRasterizer,
    fallback: FixedAdvance,
}

impl FrameRenderer {
    /// Renderer for `config`, using the configured font or the bundled one.
    ///
    /// A configured font that cannot be loaded is a configuration error.
    pub fn new(config: &GeneratorConfig) -> ToonResult<Self> {
        let font = match config.font_path.as_deref() {
            Some(path) => FontBytes::load(path)?,
            None => {
                tracing::debug!("no font configured, using the bundled subtitle font");
                FontBytes::bundled()
            }
        };
        let raster = CpuRasterizer::with_font(&font, config.layout.font_size_px)?;
        Ok(Self::with_rasterizer(config.scene(), raster))
    }

    /// Renderer using an already-built rasterizer.
    pub fn with_rasterizer(scene: SceneParams, raster: CpuRasterizer) -> Self {
        Self {
            fallback: FixedAdvance::for_font_size(scene.layout.font_size_px),
            scene,
            raster,
        }
    }

    /// Scene parameters the renderer paints with.
    pub fn scene(&self) -> &SceneParams {
        &self.scene
    }

    /// Compile frame `frame` without painting it.
    pub fn plan_frame(
        &mut self,
        frame: FrameIndex,
        max_frames: u64,
        words: &[String],
    ) -> FramePlan {
        let measure: &mut dyn TextMeasure = match self.raster.shaper_mut() {
            Some(shaper) => shaper,
            None => &mut self.fallback,
        };
        compile_frame(&self.scene, frame, max_frames, words, measure)
    }

    /// Paint frame `frame` of a `max_frames` run.
    ///
    /// Returns `Ok(false)` without drawing when the surface has no drawing context.
    pub fn render_frame(
        &mut self,
        surface: &mut Surface,
        frame: FrameIndex,
        max_frames: u64,
        words: &[String],
    ) -> ToonResult<bool> {
        if !surface.is_available() {
            tracing::trace!(frame = frame.0, "surface unavailable, frame skipped");
            return Ok(false);
        }
        let plan = self.plan_frame(frame, max_frames, words);
        self.raster.execute(&plan, surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
