//! Request envelope and stream correlation id.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::protocol::codec;

/// Correlation id tying stream events back to the call that opened the stream.
///
/// Cheap to clone; used as the registry key in the multiplexer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(Arc<str>);

impl StreamId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for StreamId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&str> for StreamId {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

/// One encoded request, created per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    /// Remote operation name (e.g. `RouterSendPaymentV2`).
    pub method: String,
    /// Version byte + encoded request body.
    pub payload: Bytes,
}

impl RequestEnvelope {
    /// Transport-safe text form of the payload.
    pub fn to_text(&self) -> String {
        codec::to_text(&self.payload)
    }
}
