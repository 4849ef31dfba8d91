//! Core error type for APDU exchange operations
//!
//! All error variants are consolidated here to simplify error handling and
//! facilitate better error bubbling up through the call stack.

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    //
    // Text codec errors
    //
    /// Hex or decimal text could not be parsed
    #[error("Invalid format: {0}")]
    InvalidFormat(&'static str),

    //
    // Command/response codec errors
    //
    /// Command shorter than the five-byte header
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),

    /// Response shorter than the two status bytes
    #[error("Incomplete response: {0} bytes")]
    IncompleteResponse(usize),

    //
    // Session errors
    //
    /// Failure reported by the card session during an exchange
    #[error("Transmit failed: {0}")]
    Transmit(String),

    /// Transmit attempted while the session is not connected
    #[error("Card session is not connected")]
    Disconnected,

    //
    // General errors
    //
    /// Context error with message and source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },

    /// Other error with static message
    #[error("{0}")]
    Other(&'static str),

    /// Generic dynamic error with string message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a new error with a static message
    pub const fn other(message: &'static str) -> Self {
        Self::Other(message)
    }

    /// Create a new error with a dynamic message
    pub fn message<S: Into<String>>(message: S) -> Self {
        Self::Message(message.into())
    }

    /// Create a new transmit error carrying the session's message
    pub fn transmit<S: Into<String>>(message: S) -> Self {
        Self::Transmit(message.into())
    }
}

/// Result type alias using the core [`Error`]
pub type Result<T> = core::result::Result<T, Error>;

/// Extension trait for Result with APDU Errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context<S: Into<String>>(self, context: S) -> Self {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain() {
        let err = Error::Disconnected.with_context("while transmitting");
        assert_eq!(
            err.to_string(),
            "while transmitting: Card session is not connected"
        );
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(Error::other("boom"));
        let err = result.context("outer").unwrap_err();
        assert!(matches!(err, Error::Context { .. }));
        assert_eq!(err.to_string(), "outer: boom");
    }
}
