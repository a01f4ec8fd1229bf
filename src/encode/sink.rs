use std::path::PathBuf;

use crate::encode::png::encode_png;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{ToonError, ToonResult};
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame size.
    pub canvas: Canvas,
    /// Frames the run will push.
    pub frames: u64,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ToonResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ToonResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ToonResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ToonResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ToonResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ToonResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes each frame to `<dir>/frame_00000.png`, `<dir>/frame_00001.png`, ...
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            last_idx: None,
            written: 0,
        }
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", idx.0))
    }

    /// Number of files written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> ToonResult<()> {
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(ToonError::validation("png sequence width/height must be non-zero"));
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ToonError::encode(format!(
                "failed to create frames directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ToonResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| ToonError::encode("png sequence sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ToonError::encode("png sequence sink received out-of-order frame index"));
        }
        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(ToonError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        self.last_idx = Some(idx);

        let path = self.frame_path(idx);
        let png = encode_png(frame)?;
        std::fs::write(&path, png)
            .map_err(|e| ToonError::encode(format!("failed to write '{}': {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ToonResult<()> {
        if self.cfg.take().is_none() {
            return Err(ToonError::encode("png sequence sink not started"));
        }
        tracing::debug!(dir = %self.dir.display(), frames = self.written, "png sequence written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
