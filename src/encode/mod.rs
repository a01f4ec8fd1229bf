//! Export of rendered frames.
//!
//! The download artifact is a single PNG snapshot. Sinks receive every frame of a run in order
//! and can write the full sequence as numbered PNG files.

/// PNG encoding and the downloadable artifact.
pub mod png;
/// Frame sink trait and built-in sinks.
pub mod sink;
