//! Error types for the sync client.
//!
//! All errors use thiserror. Runtime faults inside the poll loop and relay
//! are absorbed and logged where they occur; only configuration, artifact
//! and bind failures surface to the binary.

use std::path::PathBuf;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Output artifact errors.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Failed to read the artifact file
    #[error("Failed to read artifact {path}: {source}")]
    ReadFailed {
        /// Path to the artifact
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Artifact is not valid JSON or is missing required fields
    #[error("Invalid artifact JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Artifact was produced by an incompatible generator
    #[error("Unsupported artifact version {major}.{minor}.{build} (expected 1.x.x)")]
    UnsupportedVersion {
        /// Major version
        major: u32,
        /// Minor version
        minor: u32,
        /// Build number
        build: u32,
    },

    /// Invalid field value
    #[error("Invalid {field} in artifact: {reason}")]
    InvalidField {
        /// Field name that failed validation
        field: &'static str,
        /// Reason for validation failure
        reason: String,
    },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid bind address
    #[error("Invalid relay bind address '{address}': {reason}")]
    InvalidBindAddress {
        /// The rejected address
        address: String,
        /// Reason for invalidity
        reason: String,
    },

    /// An interval was zero
    #[error("{name} must be greater than zero")]
    ZeroInterval {
        /// Flag name
        name: &'static str,
    },

    /// Missing required configuration value
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

/// Local relay errors.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Failed to bind the relay listener
    #[error("Failed to bind relay to {addr}: {source}")]
    BindFailed {
        /// Address that failed to bind
        addr: std::net::SocketAddr,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Socket error on the local peer connection
    #[error("Relay I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket protocol error on the local peer connection
    #[error("Relay WebSocket error: {0}")]
    WebSocket(#[source] Box<tungstenite::Error>),

    /// Frame could not be encoded or decoded
    #[error("Relay codec error: {0}")]
    Codec(#[from] chibi_protocol::ProtocolError),
}

impl From<tungstenite::Error> for RelayError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Remote session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Could not reach the session server
    #[error("Failed to connect to session at {server}: {source}")]
    ConnectFailed {
        /// Server address as configured
        server: String,
        /// Underlying error
        #[source]
        source: Box<tungstenite::Error>,
    },

    /// Session server closed the connection
    #[error("Session closed by server")]
    Closed,

    /// Server refused our credentials
    #[error("Connection refused by session: {}", .0.join(", "))]
    Refused(Vec<String>),

    /// WebSocket error on the session connection
    #[error("Session WebSocket error: {0}")]
    WebSocket(#[source] Box<tungstenite::Error>),

    /// Frame could not be encoded or decoded
    #[error("Session codec error: {0}")]
    Codec(#[from] chibi_protocol::ProtocolError),
}

impl From<tungstenite::Error> for SessionError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Top-level client error.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Artifact error
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Relay error
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}
