//! Bridge error type

use thiserror::Error;

/// Errors raised by the bridge adapter.
///
/// Only the first two variants are part of the user-visible failure policy;
/// the rest describe environment problems that are logged and otherwise
/// leave the adapter inert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The `QWebChannel` constructor or its transport is missing
    #[error("QWebChannel not available")]
    ChannelUnavailable,

    /// The named remote handler object is absent
    #[error("{0} not available")]
    HandlerUnavailable(String),

    /// A DOM element the adapter needs does not exist
    #[error("element #{0} not found")]
    MissingElement(String),

    /// Invoking a remote method failed on the JS side
    #[error("remote call {method} failed: {message}")]
    Remote { method: String, message: String },

    /// Configuration could not be decoded
    #[error("invalid bridge configuration: {0}")]
    Config(String),
}

impl BridgeError {
    /// Shorthand for a failed remote invocation
    pub fn remote(method: impl Into<String>, message: impl Into<String>) -> Self {
        BridgeError::Remote {
            method: method.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            BridgeError::HandlerUnavailable("pythonHandler".into()).to_string(),
            "pythonHandler not available"
        );
        assert_eq!(
            BridgeError::MissingElement("response".into()).to_string(),
            "element #response not found"
        );
        assert_eq!(
            BridgeError::remote("show_dialog", "TypeError").to_string(),
            "remote call show_dialog failed: TypeError"
        );
    }
}
