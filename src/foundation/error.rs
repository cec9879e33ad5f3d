/// Convenience result type used across Verdite.
pub type VerditeResult<T> = Result<T, VerditeError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum VerditeError {
    /// Invalid user-provided parameters, frames, or pre-flight state
    /// (including a dual template with fewer than two regions).
    #[error("validation error: {0}")]
    Validation(String),

    /// Template file unreadable, corrupt, or empty. Fatal for the job being
    /// set up, never for the surrounding batch.
    #[error("template error: {0}")]
    Template(String),

    /// A per-frame compositor failure. The frame-sequence driver absorbs
    /// these and degrades the frame instead of aborting the file.
    #[error("composite error: {0}")]
    Composite(String),

    /// Decoder, prober, or encoder subprocess failure.
    #[error("media error: {0}")]
    Media(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VerditeError {
    /// Build a [`VerditeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VerditeError::Template`] value.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    /// Build a [`VerditeError::Composite`] value.
    pub fn composite(msg: impl Into<String>) -> Self {
        Self::Composite(msg.into())
    }

    /// Build a [`VerditeError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
