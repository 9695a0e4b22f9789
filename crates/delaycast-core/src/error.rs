//! Error types for Delaycast

/// Result type alias using Delaycast's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Delaycast operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model source missing or unreadable
    #[error("io error: {0}")]
    Io(String),

    /// Bytes or stored payload that do not decode into a valid model
    #[error("decode error: {0}")]
    Decode(String),

    /// A requested record (usually the current model) does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Prediction input rejected by the schema or by the model
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new io error
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a new decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Short machine readable kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Decode(_) => "decode",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_validation_is_a_client_error() {
        assert!(Error::validation("bad").is_client_error());
        assert!(!Error::io("missing").is_client_error());
        assert!(!Error::decode("corrupt").is_client_error());
        assert!(!Error::not_found("model").is_client_error());
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), "io");
        assert_eq!(err.to_string(), "io error: gone");
    }
}
