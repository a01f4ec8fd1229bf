//! Batch rendering of a frame range into a [`FrameSink`], without realtime pacing.
//!
//! Frames are a pure function of the frame index, so ranges may be rendered on a rayon pool;
//! results are reordered per chunk before reaching the sink.

use rayon::prelude::*;

use crate::config::GeneratorConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{ToonError, ToonResult};
use crate::render::backend::{FrameRGBA, Surface};
use crate::render::renderer::FrameRenderer;
use crate::script::words::Script;

/// Options for [`render_sequence`].
#[derive(Clone, Copy, Debug)]
pub struct SequenceOpts {
    /// Render frames on a rayon pool.
    pub parallel: bool,
    /// Frames rendered per parallel chunk.
    pub chunk_size: usize,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for SequenceOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

/// Counters of a finished sequence render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceStats {
    /// Frames in the requested range.
    pub frames_total: u64,
    /// Frames pushed to the sink.
    pub frames_rendered: u64,
}

/// Render a single frame into a fresh surface.
pub fn render_frame(
    config: &GeneratorConfig,
    script: &Script,
    frame: FrameIndex,
) -> ToonResult<FrameRGBA> {
    if frame.0 >= config.max_frames {
        return Err(ToonError::validation("frame must be within the frame budget"));
    }
    let mut renderer = FrameRenderer::new(config)?;
    let mut surface = Surface::new(config.canvas);
    paint_one(&mut renderer, &mut surface, config.max_frames, script, frame)
}

/// Render `range` of the run and stream it into `sink` in increasing frame order.
#[tracing::instrument(skip(config, script, sink), fields(words = script.word_count()))]
pub fn render_sequence(
    config: &GeneratorConfig,
    script: &Script,
    range: FrameRange,
    sink: &mut dyn FrameSink,
    opts: SequenceOpts,
) -> ToonResult<SequenceStats> {
    if range.is_empty() {
        return Err(ToonError::validation("sequence range must be non-empty"));
    }
    if range.end.0 > config.max_frames {
        return Err(ToonError::validation("sequence range must be within the frame budget"));
    }

    sink.begin(SinkConfig {
        canvas: config.canvas,
        frames: range.len_frames(),
    })?;

    let frames: Vec<FrameIndex> = range.iter().collect();
    let mut stats = SequenceStats {
        frames_total: range.len_frames(),
        frames_rendered: 0,
    };

    if opts.parallel {
        let pool = build_pool(opts.threads)?;
        for chunk in frames.chunks(opts.chunk_size.max(1)) {
            let rendered: Vec<ToonResult<FrameRGBA>> = pool.install(|| {
                chunk
                    .par_iter()
                    .map_init(
                        || FrameRenderer::new(config).map(|r| (r, Surface::new(config.canvas))),
                        |worker, &f| {
                            let (renderer, surface) = worker.as_mut().map_err(|e| {
                                ToonError::render(format!("worker renderer setup failed: {e}"))
                            })?;
                            paint_one(renderer, surface, config.max_frames, script, f)
                        },
                    )
                    .collect()
            });
            for (&f, frame) in chunk.iter().zip(rendered) {
                sink.push_frame(f, &frame?)?;
                stats.frames_rendered += 1;
            }
        }
    } else {
        let mut renderer = FrameRenderer::new(config)?;
        let mut surface = Surface::new(config.canvas);
        for f in frames {
            let frame = paint_one(&mut renderer, &mut surface, config.max_frames, script, f)?;
            sink.push_frame(f, &frame)?;
            stats.frames_rendered += 1;
        }
    }

    sink.end()?;
    Ok(stats)
}

fn paint_one(
    renderer: &mut FrameRenderer,
    surface: &mut Surface,
    max_frames: u64,
    script: &Script,
    frame: FrameIndex,
) -> ToonResult<FrameRGBA> {
    renderer.render_frame(surface, frame, max_frames, script.words())?;
    surface
        .snapshot()
        .ok_or_else(|| ToonError::render("drawing surface unavailable"))
}

fn build_pool(threads: Option<usize>) -> ToonResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n.max(1));
    }
    builder
        .build()
        .map_err(|e| ToonError::render(format!("failed to build render thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
