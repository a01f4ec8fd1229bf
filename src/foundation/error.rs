/// Convenience alias used across the crate.
pub type ToonResult<T> = Result<T, ToonError>;

/// Errors surfaced by the generator.
///
/// A missing drawing surface is not an error: the renderer skips the frame.
#[derive(thiserror::Error, Debug)]
pub enum ToonError {
    /// The script contained no words after trimming.
    #[error("Please enter a script for your video!")]
    EmptyScript,

    /// Invalid input value (dimensions, frame indices, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Rendering failed for a reason other than a missing surface.
    #[error("render error: {0}")]
    Render(String),

    /// Image encoding or frame sink failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Any other error, preserving its source.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToonError {
    /// Build a [`ToonError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ToonError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ToonError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ToonError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
