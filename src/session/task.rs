//! Cancellable render task.
//!
//! A task owns its drawing surface and frame loop on a dedicated worker thread. Frames are paced
//! by a [`FrameClock`]; the worker reports through one `mpsc` channel and checks its
//! [`CancelToken`] before every frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::config::GeneratorConfig;
use crate::encode::png::Artifact;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ToonError, ToonResult};
use crate::render::backend::Surface;
use crate::render::frame_loop::{FrameLoop, Step};
use crate::render::renderer::FrameRenderer;
use crate::script::words::Script;

/// Identifier of one render task within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once [`cancel`](Self::cancel) was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Source of frame pacing for a render task.
pub trait FrameClock: Send {
    /// Block until the next frame is due.
    fn wait_next_frame(&mut self);
}

/// Paces frames at a fixed refresh rate, like a display's repaint callback.
///
/// The first frame is due immediately. A late frame re-anchors the schedule instead of
/// bursting to catch up.
#[derive(Debug)]
pub struct IntervalClock {
    period: Duration,
    next_due: Option<Instant>,
}

impl IntervalClock {
    /// Clock ticking at `rate`.
    pub fn new(rate: Fps) -> Self {
        Self {
            period: rate.frame_duration(),
            next_due: None,
        }
    }

    /// Time between two frames.
    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FrameClock for IntervalClock {
    fn wait_next_frame(&mut self) {
        let now = Instant::now();
        let due = match self.next_due {
            Some(due) if due > now => {
                std::thread::sleep(due - now);
                due
            }
            _ => now,
        };
        self.next_due = Some(due + self.period);
    }
}

/// Never waits. Used for headless export and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateClock;

impl FrameClock for ImmediateClock {
    fn wait_next_frame(&mut self) {}
}

/// Message from a render task to its owner.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderEvent {
    /// The worker is running and about to paint frame 0.
    Started {
        /// Emitting task.
        task: TaskId,
    },
    /// Frame `frame` was painted.
    Progress {
        /// Emitting task.
        task: TaskId,
        /// Frame just painted.
        frame: FrameIndex,
        /// Completed share of the frame budget, `0..=100`.
        percent: u8,
    },
    /// Every frame was painted and the last one captured.
    Finished {
        /// Emitting task.
        task: TaskId,
        /// Snapshot of the final frame.
        artifact: Artifact,
    },
    /// The task stopped early on request.
    Cancelled {
        /// Emitting task.
        task: TaskId,
    },
    /// The task stopped on an error.
    Failed {
        /// Emitting task.
        task: TaskId,
        /// Rendered error.
        message: String,
    },
}

impl RenderEvent {
    /// Task that emitted the event.
    pub fn task(&self) -> TaskId {
        match self {
            Self::Started { task }
            | Self::Progress { task, .. }
            | Self::Finished { task, .. }
            | Self::Cancelled { task }
            | Self::Failed { task, .. } => *task,
        }
    }

    /// `true` for the last event a task sends.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished { .. } | Self::Cancelled { .. } | Self::Failed { .. }
        )
    }
}

/// Everything a worker needs to render one run.
pub struct RenderJob {
    /// Task identity reported in every event.
    pub id: TaskId,
    /// Renderer configuration.
    pub config: GeneratorConfig,
    /// Script whose words are revealed.
    pub script: Script,
    /// Frame pacing.
    pub clock: Box<dyn FrameClock>,
    /// Optional consumer of every painted frame.
    pub sink: Option<Box<dyn FrameSink>>,
}

impl std::fmt::Debug for RenderJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderJob")
            .field("id", &self.id)
            .field("words", &self.script.word_count())
            .field("max_frames", &self.config.max_frames)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

/// Owner's handle on a running task. Dropping it cancels and joins the worker.
#[derive(Debug)]
pub struct RenderHandle {
    id: TaskId,
    token: CancelToken,
    worker: Option<JoinHandle<()>>,
}

impl RenderHandle {
    /// Task identity.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Cancellation token shared with the worker.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Request cancellation without waiting.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// `true` once the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the worker to exit.
    pub fn join(mut self) -> ToonResult<()> {
        self.join_worker()
    }

    fn join_worker(&mut self) -> ToonResult<()> {
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| ToonError::render(format!("render worker for {} panicked", self.id))),
            None => Ok(()),
        }
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.token.cancel();
            if let Err(e) = self.join_worker() {
                tracing::warn!(task = self.id.0, "{e}");
            }
        }
    }
}

/// Start `job` on a new worker thread, reporting to `events`.
pub fn spawn(job: RenderJob, events: Sender<RenderEvent>) -> ToonResult<RenderHandle> {
    let id = job.id;
    let token = CancelToken::new();
    let worker_token = token.clone();
    let worker = std::thread::Builder::new()
        .name(format!("toonreel-render-{}", id.0))
        .spawn(move || run(job, &worker_token, &events))
        .map_err(|e| ToonError::render(format!("failed to spawn render worker: {e}")))?;
    tracing::debug!(task = id.0, "render task spawned");
    Ok(RenderHandle {
        id,
        token,
        worker: Some(worker),
    })
}

/// Drive `job` to completion on the calling thread, emitting exactly one terminal event.
#[tracing::instrument(skip_all, fields(task = job.id.0, words = job.script.word_count()))]
pub fn run(mut job: RenderJob, token: &CancelToken, events: &Sender<RenderEvent>) {
    let task = job.id;
    // A closed channel means the owner is gone; the worker keeps its terminal-event contract.
    let _ = events.send(RenderEvent::Started { task });
    let terminal = match render_all(&mut job, token, events) {
        Ok(Some(artifact)) => {
            tracing::debug!(bytes = artifact.png.len(), "render task finished");
            RenderEvent::Finished { task, artifact }
        }
        Ok(None) => {
            tracing::debug!("render task cancelled");
            RenderEvent::Cancelled { task }
        }
        Err(e) => {
            tracing::warn!(error = %e, "render task failed");
            RenderEvent::Failed {
                task,
                message: e.to_string(),
            }
        }
    };
    let _ = events.send(terminal);
}

fn render_all(
    job: &mut RenderJob,
    token: &CancelToken,
    events: &Sender<RenderEvent>,
) -> ToonResult<Option<Artifact>> {
    let max_frames = job.config.max_frames;
    let mut renderer = FrameRenderer::new(&job.config)?;
    let mut surface = Surface::new(job.config.canvas);
    let mut frames = FrameLoop::new(max_frames);

    if let Some(sink) = job.sink.as_mut() {
        sink.begin(SinkConfig {
            canvas: job.config.canvas,
            frames: frames.max_frames(),
        })?;
    }

    frames.start();
    loop {
        if token.is_cancelled() {
            return Ok(None);
        }
        job.clock.wait_next_frame();
        if token.is_cancelled() {
            return Ok(None);
        }

        let mut painted = FrameIndex(0);
        let step = frames.tick(|f| -> ToonResult<()> {
            renderer.render_frame(&mut surface, f, max_frames, job.script.words())?;
            if let Some(sink) = job.sink.as_mut() {
                let frame = surface
                    .snapshot()
                    .ok_or_else(|| ToonError::render("drawing surface unavailable"))?;
                sink.push_frame(f, &frame)?;
            }
            painted = f;
            Ok(())
        })?;

        let _ = events.send(RenderEvent::Progress {
            task: job.id,
            frame: painted,
            percent: frames.progress_percent(),
        });
        if step == Step::Done {
            break;
        }
    }

    if let Some(sink) = job.sink.as_mut() {
        sink.end()?;
    }
    let last = surface
        .snapshot()
        .ok_or_else(|| ToonError::render("drawing surface unavailable, nothing to capture"))?;
    Artifact::from_frame(&last).map(Some)
}

#[cfg(test)]
#[path = "../../tests/unit/session/task.rs"]
mod tests;
