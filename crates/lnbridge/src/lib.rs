//! Top-level facade crate for lnbridge.
//!
//! Re-exports the protocol core and the node runtime so hosts can depend on a single crate.

pub mod core {
    pub use lnbridge_core::*;
}

pub mod node {
    pub use lnbridge_node::*;
}

pub use lnbridge_core::{BridgeError, ErrorCode, Result};
pub use lnbridge_node::{LndClient, PaymentService, SendPaymentOptions};
