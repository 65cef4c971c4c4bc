//! lnbridge node runtime.
//!
//! Wires the bridge transport, the correlation multiplexer, the typed command
//! facade and the payment retry engine into one client. Hosts provide a
//! [`transport::NativeBridge`] implementation and push event notifications
//! through the [`transport::EventSink`].

pub mod client;
pub mod commands;
pub mod config;
pub mod mux;
pub mod obs;
pub mod payment;
pub mod transport;

pub use client::LndClient;
pub use commands::lightning::InvoiceParams;
pub use mux::{CancelHandle, RawStream, StreamHandle};
pub use payment::{PaymentReport, PaymentService, SendPaymentOptions};
