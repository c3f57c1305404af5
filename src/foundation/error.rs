/// Convenience result type used across memeforge.
pub type MemeResult<T> = Result<T, MemeError>;

/// Top-level error taxonomy used by compositor, optimizer and gallery APIs.
///
/// Every failure is recoverable by the caller retrying with different input; nothing in this
/// crate retries on its own.
#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// The source image could not be fetched or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Drawing into a surface failed (surface too large, bad geometry).
    #[error("render error: {0}")]
    Render(String),

    /// Surface-to-blob or surface-to-data-URL conversion failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// An uploaded file could not be optimized.
    #[error("optimize error: {0}")]
    Optimize(String),

    /// Invalid user-provided options or files.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable caption font.
    #[error("font error: {0}")]
    Font(String),

    /// The blob storage collaborator rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// The persistence collaborator rejected an operation.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A record lookup found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    /// Build a [`MemeError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`MemeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MemeError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MemeError::Optimize`] value.
    pub fn optimize(msg: impl Into<String>) -> Self {
        Self::Optimize(msg.into())
    }

    /// Build a [`MemeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemeError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`MemeError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`MemeError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`MemeError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
