/// Convenience result type used across Lekha.
pub type LekhaResult<T> = Result<T, LekhaError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Degradable conditions (font load failures, math-render failures, missing
/// optional config keys, undecodable question images) are absorbed where they
/// occur and never surface through this type; see [`crate::render`] for the
/// fallback rules.
#[derive(thiserror::Error, Debug)]
pub enum LekhaError {
    /// Invalid user-provided data (malformed question records, bad option values).
    #[error("validation error: {0}")]
    Validation(String),

    /// The supplied background image could not be decoded. Surfaced distinctly
    /// so callers can present a specific user-facing message.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LekhaError {
    /// Build a [`LekhaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LekhaError::InvalidImage`] value.
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Build a [`LekhaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
