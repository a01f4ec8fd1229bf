//! Generation session: the cancellable render task and the studio state object driving it.

pub mod studio;
pub mod task;
