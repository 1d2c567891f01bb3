//! Error types for the session codec

use thiserror::Error;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A frame must be a JSON array of command objects
    #[error("frame is not a JSON array (found {found})")]
    NotAnArray {
        /// JSON type actually received
        found: &'static str,
    },
}

impl ProtocolError {
    /// Whether the peer sent something this codec can never accept, as
    /// opposed to an encoding failure on our side.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::NotAnArray { .. })
            || matches!(self, Self::Json(e) if e.is_syntax() || e.is_eof())
    }
}
