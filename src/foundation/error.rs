/// Convenience result type used across the crate.
pub type LineageResult<T> = Result<T, LineageError>;

/// Top-level error taxonomy used by diagram APIs.
#[derive(thiserror::Error, Debug)]
pub enum LineageError {
    /// Invalid builder input or diagram description.
    #[error("validation error: {0}")]
    Validation(String),

    /// A queried entity is unknown, or is not where the query expected it.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Geometry could not be produced for a request.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LineageError {
    /// Build a [`LineageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LineageError::Lookup`] value.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Build a [`LineageError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`LineageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for failures the compile pass recovers from with an approximation.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
