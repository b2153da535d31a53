/// Convenience result alias used across the public API.
pub type StickerResult<T> = Result<T, StickerError>;

/// Top-level error type for sticker synthesis.
///
/// Only [`StickerError::Encode`], [`StickerError::Io`], [`StickerError::Validation`] and
/// [`StickerError::Cancelled`] ever escape a render job. Glyph fetch and background load errors are
/// produced by their providers and recovered locally by the compositor.
#[derive(thiserror::Error, Debug)]
pub enum StickerError {
    /// Invalid configuration or call arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A pictographic glyph could not be fetched or decoded.
    #[error("glyph fetch error: {0}")]
    Fetch(String),

    /// A background image could not be loaded or decoded.
    #[error("background load error: {0}")]
    Background(String),

    /// The external encoder failed or could not be started.
    #[error("encode error: {0}")]
    Encode(String),

    /// A directory or file write failed.
    #[error("io error: {0}")]
    Io(String),

    /// The job deadline passed before the artifact was complete.
    #[error("render job cancelled: {0}")]
    Cancelled(String),

    /// Any other error (source preserved).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StickerError {
    /// Build a [`StickerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StickerError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`StickerError::Background`] value.
    pub fn background(msg: impl Into<String>) -> Self {
        Self::Background(msg.into())
    }

    /// Build a [`StickerError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`StickerError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Build a [`StickerError::Cancelled`] value.
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Return `true` when the error should never reach a caller of a render job.
    pub fn is_locally_recoverable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Background(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
