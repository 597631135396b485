/// Convenience result type used across drillanim.
pub type DrillResult<T> = Result<T, DrillError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Continuity authoring mistakes never surface here; they are reported as
/// [`crate::ErrorMarker`]s on a best-effort animation. A `DrillError` means the input
/// itself cannot be processed.
#[derive(thiserror::Error, Debug)]
pub enum DrillError {
    /// Structurally invalid show data or an out-of-range sheet/point index.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal compiler invariant violations.
    #[error("compile error: {0}")]
    Compile(String),

    /// Out-of-range playback queries.
    #[error("playback error: {0}")]
    Playback(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DrillError {
    /// Build a [`DrillError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DrillError::Compile`] value.
    pub fn compile(msg: impl Into<String>) -> Self {
        Self::Compile(msg.into())
    }

    /// Build a [`DrillError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`DrillError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
