/// Result alias used throughout the crate.
pub type FlyPathResult<T> = Result<T, FlyPathError>;

/// Crate-wide error type.
///
/// Preconditions that are simply not met (too few destinations, a view that is not ready yet) are
/// not errors; those operations report `false`/`None` instead.
#[derive(thiserror::Error, Debug)]
pub enum FlyPathError {
    /// Invalid input value (settings, coordinates, export options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure while driving an animation run.
    #[error("animation error: {0}")]
    Animation(String),

    /// Failure while rasterizing a map view or composited frame.
    #[error("render error: {0}")]
    Render(String),

    /// Failure while capturing or transcoding an export.
    #[error("encode error: {0}")]
    Encode(String),

    /// Failure while (de)serializing route documents or settings.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, usually I/O with attached context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlyPathError {
    /// Build a [`FlyPathError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlyPathError::Animation`].
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`FlyPathError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FlyPathError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`FlyPathError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FlyPathError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
