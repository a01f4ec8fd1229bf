use crate::foundation::core::FrameIndex;

/// Lifecycle of one animation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoopState {
    /// No run in progress.
    #[default]
    Idle,
    /// Frame `frame` is the next one to paint; always `< max_frames`.
    Running {
        /// Next frame to paint.
        frame: FrameIndex,
    },
}

/// Outcome of one [`FrameLoop::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A frame was painted and another one is due.
    Continue,
    /// The last frame was painted (or the loop was idle); the loop is idle now.
    Done,
}

/// Owned frame counter driving a run from frame 0 to the frame budget.
///
/// `Idle -> Running(0)` on [`start`](Self::start), `Running(i) -> Running(i + 1)` per tick, and
/// `Running(max - 1) -> Idle` on the last tick.
#[derive(Clone, Debug)]
pub struct FrameLoop {
    max_frames: u64,
    state: LoopState,
    completed: u64,
}

impl FrameLoop {
    /// Idle loop with a budget of `max_frames` (at least one frame).
    pub fn new(max_frames: u64) -> Self {
        Self {
            max_frames: max_frames.max(1),
            state: LoopState::Idle,
            completed: 0,
        }
    }

    /// Frame budget.
    pub fn max_frames(&self) -> u64 {
        self.max_frames
    }

    /// Current state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// `true` while frames remain.
    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// Enter `Running` at frame 0, discarding any run in progress.
    pub fn start(&mut self) -> FrameIndex {
        self.state = LoopState::Running {
            frame: FrameIndex(0),
        };
        self.completed = 0;
        FrameIndex(0)
    }

    /// Frames painted in the current (or last) run.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Completed fraction as a percentage in `0..=100`.
    pub fn progress_percent(&self) -> u8 {
        ((self.completed.min(self.max_frames) * 100) / self.max_frames) as u8
    }

    /// Paint the current frame through `paint`, then advance.
    pub fn tick<E>(
        &mut self,
        paint: impl FnOnce(FrameIndex) -> Result<(), E>,
    ) -> Result<Step, E> {
        let LoopState::Running { frame } = self.state else {
            return Ok(Step::Done);
        };
        paint(frame)?;
        self.completed += 1;
        let next = frame.next();
        if next.0 < self.max_frames {
            self.state = LoopState::Running { frame: next };
            Ok(Step::Continue)
        } else {
            self.state = LoopState::Idle;
            Ok(Step::Done)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame_loop.rs"]
mod tests;
