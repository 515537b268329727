//! Error types for handler invocation.

/// Result type alias for awaiting a dispatched invocation.
pub type DispatchResult = std::result::Result<serde_json::Value, DispatchError>;

/// A failure reported by a subscriber's handler.
///
/// Handlers return this to signal that processing a notification failed.
/// Its display is the raw failure message, without any adaptor framing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler failure with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The raw failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// The single failure shape delivered through a [`PendingResult`].
///
/// Every recoverable failure crosses the adaptor boundary in this form: a
/// handler that ran and failed, a dispatch for a kind with no registered
/// handler, and a handler task that died before delivering an outcome all
/// produce this same wrapped error. The display is
/// `"service method invocation failed: "` followed by the original message,
/// and [`std::error::Error::source`] yields the original failure.
///
/// [`PendingResult`]: crate::PendingResult
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("service method invocation failed: {cause}")]
pub struct DispatchError {
    #[source]
    cause: HandlerError,
}

impl DispatchError {
    /// Wraps a handler failure.
    #[must_use]
    pub const fn new(cause: HandlerError) -> Self {
        Self { cause }
    }

    /// The original failure this error wraps.
    #[must_use]
    pub const fn cause(&self) -> &HandlerError {
        &self.cause
    }
}

impl From<HandlerError> for DispatchError {
    fn from(cause: HandlerError) -> Self {
        Self::new(cause)
    }
}
