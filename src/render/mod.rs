//! Frame rendering: draw-op plans, the CPU rasterizer and the frame loop.

/// Rendered frames and the drawing surface.
pub mod backend;
/// `vello_cpu` rasterizer executing frame plans.
pub mod cpu;
/// Owned frame counter of one run.
pub mod frame_loop;
pub mod pipeline;
pub mod plan;
/// Plan-and-paint glue over a surface.
pub mod renderer;
