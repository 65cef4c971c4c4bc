//! Shared error type across lnbridge crates.

use thiserror::Error;

/// Stable error codes (used for generic failure text in the UI layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Native module unreachable or replied malformed.
    Transport,
    /// Payload does not match the expected schema.
    Decode,
    /// Payload carries an unknown schema version byte.
    UnsupportedVersion,
    /// Caller cancelled the stream.
    Cancelled,
    /// Stream already terminated.
    StreamClosed,
    /// Node reported an error on a stream.
    Node,
    /// Invalid configuration.
    Config,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and host-facing replies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::Decode => "DECODE",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Cancelled => "CANCELLED",
            ErrorCode::StreamClosed => "STREAM_CLOSED",
            ErrorCode::Node => "NODE",
            ErrorCode::Config => "CONFIG",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Local schema mismatches. Never retried.
    pub fn is_decode_class(self) -> bool {
        matches!(self, ErrorCode::Decode | ErrorCode::UnsupportedVersion)
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type used by core and node crates.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("unsupported schema version")]
    UnsupportedVersion,
    #[error("stream cancelled")]
    Cancelled,
    #[error("stream closed: {0}")]
    StreamClosed(String),
    #[error("node error: {0}")]
    Node(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            BridgeError::Transport(_) => ErrorCode::Transport,
            BridgeError::Decode(_) => ErrorCode::Decode,
            BridgeError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            BridgeError::Cancelled => ErrorCode::Cancelled,
            BridgeError::StreamClosed(_) => ErrorCode::StreamClosed,
            BridgeError::Node(_) => ErrorCode::Node,
            BridgeError::Config(_) => ErrorCode::Config,
            BridgeError::Internal(_) => ErrorCode::Internal,
        }
    }
}
