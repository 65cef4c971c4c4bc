//! Typed command wrappers, one per remote method, grouped by node service.
//!
//! Every wrapper is a thin `impl LndClient` method over [`LndClient::unary`],
//! [`LndClient::stream`] or [`LndClient::consume`]; request shaping (defaults
//! from config, optional fields) is the only logic allowed here.

pub mod chain;
pub mod channel;
pub mod lightning;
pub mod router;
pub mod state;
pub mod wallet;
