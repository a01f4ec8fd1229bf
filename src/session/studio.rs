//! The studio: one explicit state object for a generation session.
//!
//! All mutation goes through the entry points on [`Studio`]. Render workers only talk back
//! through [`RenderEvent`]s, which the studio applies in order in [`Studio::poll`] and
//! [`Studio::wait`]; events from superseded tasks are dropped.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::config::GeneratorConfig;
use crate::encode::png::Artifact;
use crate::encode::sink::FrameSink;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::ToonResult;
use crate::script::options::{AnimationStyle, VideoDetails, VoiceStyle};
use crate::script::words::Script;
use crate::session::task::{
    self, FrameClock, ImmediateClock, IntervalClock, RenderEvent, RenderHandle, RenderJob, TaskId,
};

const WAIT_SLICE: Duration = Duration::from_millis(50);

/// How a generation's frames are paced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pacing {
    /// One frame per display refresh (`refresh_hz`).
    #[default]
    Realtime,
    /// As fast as frames can be painted.
    Immediate,
}

/// Where the session stands.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Nothing generated yet.
    #[default]
    Idle,
    /// A task is rendering.
    Generating {
        /// Running task.
        task: TaskId,
        /// Last painted frame, `None` before the first one.
        frame: Option<FrameIndex>,
        /// Completed share of the frame budget, `0..=100`.
        progress: u8,
    },
    /// The last task painted every frame; the artifact is available.
    Complete {
        /// Finished task.
        task: TaskId,
    },
    /// The last task was cancelled.
    Cancelled {
        /// Cancelled task.
        task: TaskId,
    },
    /// The last task failed.
    Failed {
        /// Failed task.
        task: TaskId,
        /// Rendered error.
        message: String,
    },
}

impl GenerationStatus {
    /// `true` while a task is rendering.
    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Generating { .. })
    }
}

/// A generation session: the script, the cosmetic selections, and at most one render task.
pub struct Studio {
    config: GeneratorConfig,
    pacing: Pacing,
    script: String,
    style: AnimationStyle,
    voice: VoiceStyle,
    status: GenerationStatus,
    artifact: Option<Artifact>,
    details: Option<VideoDetails>,
    pending_details: Option<VideoDetails>,
    next_task: u64,
    current: Option<RenderHandle>,
    tx: Sender<RenderEvent>,
    rx: Receiver<RenderEvent>,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("pacing", &self.pacing)
            .field("style", &self.style)
            .field("voice", &self.voice)
            .field("status", &self.status)
            .field("has_artifact", &self.artifact.is_some())
            .finish()
    }
}

impl Studio {
    /// Session rendering with `config`, paced in realtime.
    pub fn new(config: GeneratorConfig) -> ToonResult<Self> {
        config.validate()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            config,
            pacing: Pacing::Realtime,
            script: String::new(),
            style: AnimationStyle::default(),
            voice: VoiceStyle::default(),
            status: GenerationStatus::Idle,
            artifact: None,
            details: None,
            pending_details: None,
            next_task: 1,
            current: None,
            tx,
            rx,
        })
    }

    /// Use `pacing` for generations started from now on.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Renderer configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Replace the script text.
    pub fn set_script(&mut self, text: impl Into<String>) {
        self.script = text.into();
    }

    /// Current script text.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Select the animation style.
    pub fn set_style(&mut self, style: AnimationStyle) {
        self.style = style;
    }

    /// Selected animation style.
    pub fn style(&self) -> AnimationStyle {
        self.style
    }

    /// Select the voice style.
    pub fn set_voice(&mut self, voice: VoiceStyle) {
        self.voice = voice;
    }

    /// Selected voice style.
    pub fn voice(&self) -> VoiceStyle {
        self.voice
    }

    /// Session status, as of the last applied event.
    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    /// Progress percentage, derived from the running task's frame counter.
    pub fn progress(&self) -> u8 {
        match self.status {
            GenerationStatus::Generating { progress, .. } => progress,
            GenerationStatus::Complete { .. } => 100,
            _ => 0,
        }
    }

    /// Start a generation of the current script.
    ///
    /// An empty script is rejected and nothing changes. A task already in flight is cancelled
    /// and joined first.
    pub fn generate(&mut self) -> ToonResult<TaskId> {
        self.start(None)
    }

    /// Like [`generate`](Self::generate), also streaming every frame into `sink`.
    pub fn generate_into(&mut self, sink: Box<dyn FrameSink>) -> ToonResult<TaskId> {
        self.start(Some(sink))
    }

    fn start(&mut self, sink: Option<Box<dyn FrameSink>>) -> ToonResult<TaskId> {
        let script = Script::parse_non_empty(&self.script)?;
        self.stop_current();

        let id = TaskId(self.next_task);
        self.next_task += 1;
        let clock: Box<dyn FrameClock> = match self.pacing {
            Pacing::Realtime => Box::new(IntervalClock::new(self.config.refresh_rate()?)),
            Pacing::Immediate => Box::new(ImmediateClock),
        };

        self.artifact = None;
        self.details = None;
        self.pending_details = Some(VideoDetails::new(
            &script,
            self.style,
            self.voice,
            self.config.canvas,
        ));

        let job = RenderJob {
            id,
            config: self.config.clone(),
            script,
            clock,
            sink,
        };
        self.current = Some(task::spawn(job, self.tx.clone())?);
        self.status = GenerationStatus::Generating {
            task: id,
            frame: None,
            progress: 0,
        };
        tracing::debug!(
            task = id.0,
            style = self.style.id(),
            voice = self.voice.id(),
            "generation started"
        );
        Ok(id)
    }

    /// Apply every event received so far. Returns the number of events applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Block until the current task (if any) ends, applying its events on the way.
    pub fn wait(&mut self) -> &GenerationStatus {
        while self.status.is_generating() {
            match self.rx.recv_timeout(WAIT_SLICE) {
                Ok(event) => {
                    self.apply(event);
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.current.as_ref().is_none_or(RenderHandle::is_finished) {
                        self.poll();
                        self.fail_if_vanished();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        &self.status
    }

    /// Cancel the current task. Returns `true` if a running task was stopped.
    pub fn cancel(&mut self) -> bool {
        self.poll();
        if !self.status.is_generating() {
            return false;
        }
        self.stop_current();
        true
    }

    /// The captured snapshot, only once a generation has completed.
    pub fn download(&self) -> Option<&Artifact> {
        match self.status {
            GenerationStatus::Complete { .. } => self.artifact.as_ref(),
            _ => None,
        }
    }

    /// Summary of the completed generation.
    pub fn details(&self) -> Option<&VideoDetails> {
        match self.status {
            GenerationStatus::Complete { .. } => self.details.as_ref(),
            _ => None,
        }
    }

    fn current_task(&self) -> Option<TaskId> {
        match self.status {
            GenerationStatus::Generating { task, .. } => Some(task),
            _ => None,
        }
    }

    fn apply(&mut self, event: RenderEvent) -> bool {
        let Some(current) = self.current_task() else {
            tracing::trace!(task = event.task().0, "event without a running task dropped");
            return false;
        };
        if event.task() != current {
            tracing::trace!(task = event.task().0, "stale event dropped");
            return false;
        }
        match event {
            RenderEvent::Started { .. } => {}
            RenderEvent::Progress {
                task,
                frame,
                percent,
            } => {
                self.status = GenerationStatus::Generating {
                    task,
                    frame: Some(frame),
                    progress: percent,
                };
            }
            RenderEvent::Finished { task, artifact } => {
                self.artifact = Some(artifact);
                self.details = self.pending_details.take();
                self.status = GenerationStatus::Complete { task };
                self.release_worker();
                tracing::info!(task = task.0, "generation complete");
            }
            RenderEvent::Cancelled { task } => {
                self.status = GenerationStatus::Cancelled { task };
                self.release_worker();
            }
            RenderEvent::Failed { task, message } => {
                tracing::warn!(task = task.0, %message, "generation failed");
                self.status = GenerationStatus::Failed { task, message };
                self.release_worker();
            }
        }
        true
    }

    fn fail_if_vanished(&mut self) {
        if let GenerationStatus::Generating { task, .. } = self.status {
            self.status = GenerationStatus::Failed {
                task,
                message: "render worker exited without reporting".to_owned(),
            };
            self.release_worker();
        }
    }

    fn release_worker(&mut self) {
        if let Some(handle) = self.current.take()
            && let Err(e) = handle.join()
        {
            tracing::warn!("{e}");
        }
    }

    fn stop_current(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
            if let Err(e) = handle.join() {
                tracing::warn!("{e}");
            }
        }
        // The superseded task's remaining events are in the channel now; drain them.
        while self.rx.try_recv().is_ok() {}
        self.pending_details = None;
        if let GenerationStatus::Generating { task, .. } = self.status {
            self.status = GenerationStatus::Cancelled { task };
            tracing::debug!(task = task.0, "generation cancelled");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio.rs"]
mod tests;
