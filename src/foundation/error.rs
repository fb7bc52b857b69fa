/// Convenience result type used across the engine.
pub type SpiroResult<T> = Result<T, SpiroError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is terminal for the render session it occurs in; there is no transient/permanent
/// split. Callers recover by resetting or reconstructing the engine.
#[derive(thiserror::Error, Debug)]
pub enum SpiroError {
    /// Invalid user-provided configuration or geometry.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure acquiring, using or releasing a drawing device/surface.
    #[error("device error: {0}")]
    Device(String),

    /// The target surface never became visible within the startup window.
    #[error("visibility error: {0}")]
    Visibility(String),

    /// Failure while drawing a curve step.
    #[error("render error: {0}")]
    Render(String),

    /// Failure persisting a captured frame.
    #[error("capture error: {0}")]
    Capture(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SpiroError {
    /// Build a [`SpiroError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SpiroError::Device`] value.
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Build a [`SpiroError::Visibility`] value.
    pub fn visibility(msg: impl Into<String>) -> Self {
        Self::Visibility(msg.into())
    }

    /// Build a [`SpiroError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SpiroError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`SpiroError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
