/// Convenience result type used across slidereel.
pub type SlideResult<T> = Result<T, SlideError>;

/// Top-level error taxonomy used by compositor APIs.
#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    /// Invalid user-provided configuration (empty input, non-positive timing, bad overrides).
    #[error("validation error: {0}")]
    Validation(String),

    /// An effect name that is not part of the registry.
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),

    /// No input image could be read, so no frame size can be inferred.
    #[error("unrenderable input: {0}")]
    Unrenderable(String),

    /// A single image failed to decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// The frame sink failed to start, accept a frame, or finalize.
    #[error("encode error: {0}")]
    Encode(String),

    /// Compositor misuse or an internal rendering failure.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlideError {
    /// Build a [`SlideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlideError::UnknownEffect`] value.
    pub fn unknown_effect(name: impl Into<String>) -> Self {
        Self::UnknownEffect(name.into())
    }

    /// Build a [`SlideError::Unrenderable`] value.
    pub fn unrenderable(msg: impl Into<String>) -> Self {
        Self::Unrenderable(msg.into())
    }

    /// Build a [`SlideError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SlideError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SlideError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Return `true` for errors raised before any frame could be produced.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::UnknownEffect(_) | Self::Unrenderable(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
