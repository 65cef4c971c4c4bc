//! Stream event notifications.
//!
//! The native module emits one JSON notification per stream event on a single
//! shared feed:
//! `{"streamId": "...", "type": "data|error|end|status", "data": "<base64>", "error": "..."}`.
//! `data` carries the base64 payload for `data`/`end`, `error` carries the
//! node's message for `error`. `status` carries free text in either field.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::protocol::codec;
use crate::protocol::envelope::StreamId;

/// Event type on the shared feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Data,
    Error,
    End,
    Status,
}

impl EventKind {
    /// `Error` and `End` close the stream.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventKind::Error | EventKind::End)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Data => "data",
            EventKind::Error => "error",
            EventKind::End => "end",
            EventKind::Status => "status",
        }
    }
}

/// Raw notification as emitted by the native module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventNotification {
    #[serde(rename = "streamId")]
    pub stream_id: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Event payload after the text lane is stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Versioned binary body.
    Bytes(Bytes),
    /// Error or status text.
    Text(String),
    Empty,
}

/// One event on the shared feed, tagged with its correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub stream_id: StreamId,
    pub kind: EventKind,
    pub payload: EventPayload,
}

impl StreamEvent {
    pub fn data(stream_id: impl Into<StreamId>, payload: Bytes) -> Self {
        Self {
            stream_id: stream_id.into(),
            kind: EventKind::Data,
            payload: EventPayload::Bytes(payload),
        }
    }

    pub fn end(stream_id: impl Into<StreamId>) -> Self {
        Self {
            stream_id: stream_id.into(),
            kind: EventKind::End,
            payload: EventPayload::Empty,
        }
    }

    pub fn error(stream_id: impl Into<StreamId>, msg: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            kind: EventKind::Error,
            payload: EventPayload::Text(msg.into()),
        }
    }

    pub fn status(stream_id: impl Into<StreamId>, msg: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            kind: EventKind::Status,
            payload: EventPayload::Text(msg.into()),
        }
    }

    /// Parse a JSON notification from the native module.
    pub fn from_json(s: &str) -> Result<Self> {
        let n: EventNotification = serde_json::from_str(s)
            .map_err(|e| BridgeError::Transport(format!("invalid event notification: {e}")))?;
        Self::try_from(n)
    }

    /// Text carried by `error`/`status` events.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            EventPayload::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl TryFrom<EventNotification> for StreamEvent {
    type Error = BridgeError;

    fn try_from(n: EventNotification) -> Result<Self> {
        if n.stream_id.is_empty() {
            return Err(BridgeError::Transport("event notification without streamId".into()));
        }

        let payload = match n.kind {
            EventKind::Data => EventPayload::Bytes(codec::from_text(n.data.as_deref().unwrap_or(""))?),
            EventKind::End => match n.data.as_deref() {
                Some(d) if !d.is_empty() => EventPayload::Bytes(codec::from_text(d)?),
                _ => EventPayload::Empty,
            },
            EventKind::Error => EventPayload::Text(
                n.error
                    .or(n.data)
                    .unwrap_or_else(|| "unknown stream error".to_string()),
            ),
            EventKind::Status => match n.data.or(n.error) {
                Some(s) => EventPayload::Text(s),
                None => EventPayload::Empty,
            },
        };

        Ok(Self {
            stream_id: StreamId::from(n.stream_id),
            kind: n.kind,
            payload,
        })
    }
}
