//! Typed RPC method schemas.
//!
//! Every remote operation is a zero-sized marker implementing [`RpcMethod`]
//! (wire name + request/response bodies) plus one of [`Unary`],
//! [`Streaming`] or [`Bidi`]. The node client only accepts markers of the
//! matching kind, so a streaming method can never be invoked as a one-shot
//! call.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Wire name and body schemas of one remote operation.
pub trait RpcMethod: Send + Sync + 'static {
    /// Method name sent over the bridge (service prefix + operation).
    const NAME: &'static str;
    type Request: Serialize + Send + Sync + 'static;
    type Response: DeserializeOwned + Send + 'static;
}

/// One request, one response.
pub trait Unary: RpcMethod {}

/// One request, zero or more `Response` events, then `end` or `error`.
pub trait Streaming: RpcMethod {}

/// Streaming method that accepts further client frames after the request.
pub trait Bidi: Streaming {
    type Frame: Serialize + Send + Sync + 'static;
}

macro_rules! unary {
    ($(#[$meta:meta])* $marker:ident = $wire:expr, $req:ty => $resp:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $marker;

        impl $crate::rpc::RpcMethod for $marker {
            const NAME: &'static str = $wire;
            type Request = $req;
            type Response = $resp;
        }

        impl $crate::rpc::Unary for $marker {}
    };
}

macro_rules! streaming {
    ($(#[$meta:meta])* $marker:ident = $wire:expr, $req:ty => $resp:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $marker;

        impl $crate::rpc::RpcMethod for $marker {
            const NAME: &'static str = $wire;
            type Request = $req;
            type Response = $resp;
        }

        impl $crate::rpc::Streaming for $marker {}
    };
}

pub mod chain;
pub mod channel;
pub mod lightning;
pub mod router;
pub mod state;
pub mod wallet;
