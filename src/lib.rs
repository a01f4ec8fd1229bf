//! Toonreel is a headless cartoon animation generator.
//!
//! A script is revealed word by word as subtitles under a bouncing circle character, painted on
//! the CPU for a fixed frame budget. The public API is session-oriented:
//!
//! - Configure a [`GeneratorConfig`] (or use the defaults)
//! - Drive a [`Studio`]: set the script and selections, [`Studio::generate`], then poll or wait
//! - [`Studio::download`] the PNG snapshot of the last frame once complete
//!
//! Single frames and frame ranges can also be rendered directly through [`render_frame`] and
//! [`render_sequence`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Character and sparkle motion curves.
pub mod animation;
/// Generator configuration.
pub mod config;
/// PNG encoding and frame sinks.
pub mod encode;
/// Frame planning and CPU rendering.
pub mod render;
/// Script parsing and cosmetic selections.
pub mod script;
/// Generation session and render task.
pub mod session;
/// Subtitle wrapping and text shaping.
pub mod text;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point, Rgba8, Vec2};
pub use crate::foundation::error::{ToonError, ToonResult};

pub use crate::animation::motion::{CharacterPose, MotionParams};
pub use crate::config::GeneratorConfig;
pub use crate::encode::png::{ARTIFACT_FILE_NAME, Artifact, encode_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::render::backend::{FrameRGBA, Surface};
pub use crate::render::frame_loop::{FrameLoop, LoopState, Step};
pub use crate::render::pipeline::{SequenceOpts, SequenceStats, render_frame, render_sequence};
pub use crate::render::renderer::FrameRenderer;
pub use crate::script::options::{AnimationStyle, VideoDetails, VoiceStyle};
pub use crate::script::words::{Script, revealed_count};
pub use crate::session::studio::{GenerationStatus, Pacing, Studio};
pub use crate::session::task::{
    CancelToken, FrameClock, ImmediateClock, IntervalClock, RenderEvent, RenderHandle, TaskId,
};
