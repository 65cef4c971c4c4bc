//! Message codec (panic-free).
//!
//! Binary layout of every request/response payload:
//! `[schema version: u8][bincode body (varint ints, no trailing bytes)]`.
//!
//! Parsing rules:
//! - Never index (`buf[0]`); always go through `Buf` with `remaining()` checks.
//! - Never `unwrap()` / `expect()` / `panic!()` in production paths.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use bincode::Options;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BridgeError, Result};
use crate::protocol::envelope::RequestEnvelope;
use crate::rpc::RpcMethod;

/// Current schema version for all method bodies.
pub const SCHEMA_VERSION: u8 = 1;

/// Encode a typed request for method `M`.
pub fn encode<M: RpcMethod>(request: &M::Request) -> Result<RequestEnvelope> {
    Ok(RequestEnvelope {
        method: M::NAME.to_string(),
        payload: encode_message(request)?,
    })
}

/// Encode any schema message (requests, bidi frames, fixtures).
pub fn encode_message<T: Serialize + ?Sized>(msg: &T) -> Result<Bytes> {
    let body = bincode::DefaultOptions::new()
        .serialize(msg)
        .map_err(|e| BridgeError::Internal(format!("encode failed: {e}")))?;

    let mut buf = BytesMut::with_capacity(1 + body.len());
    buf.put_u8(SCHEMA_VERSION);
    buf.put_slice(&body);
    Ok(buf.freeze())
}

/// Decode a versioned payload into `T`.
pub fn decode<T: DeserializeOwned>(mut buf: Bytes) -> Result<T> {
    if !buf.has_remaining() {
        return Err(BridgeError::Decode("empty payload".into()));
    }

    let v = buf.get_u8();
    if v != SCHEMA_VERSION {
        return Err(BridgeError::UnsupportedVersion);
    }

    bincode::DefaultOptions::new()
        .deserialize(buf.chunk())
        .map_err(|e| BridgeError::Decode(e.to_string()))
}

/// Transport-safe text form of a binary payload.
pub fn to_text(payload: &[u8]) -> String {
    BASE64_STANDARD.encode(payload)
}

/// Parse the text form back into bytes. A bad envelope is a malformed reply.
pub fn from_text(text: &str) -> Result<Bytes> {
    BASE64_STANDARD
        .decode(text.trim())
        .map(Bytes::from)
        .map_err(|e| BridgeError::Transport(format!("malformed base64 envelope: {e}")))
}

/// Decode a text envelope straight into `T`.
pub fn decode_text<T: DeserializeOwned>(text: &str) -> Result<T> {
    decode(from_text(text)?)
}
