/// Font loading, measuring and line shaping with Parley.
pub mod shaping;
/// Greedy subtitle wrapping.
pub mod wrap;
