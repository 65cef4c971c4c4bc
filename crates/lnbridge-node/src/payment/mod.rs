//! Payment resilience: SendPaymentV2 wrapped in a bounded retry tree.
//!
//! Only the terminal result leaves this module; intermediate attempts are
//! visible through tracing and `BridgeMetrics::payment_steps`.

pub mod attempt;
pub mod collaborators;
pub mod engine;

use std::sync::Arc;

use lnbridge_core::error::Result;
use lnbridge_core::rpc::lightning::PayReq;

use crate::client::LndClient;

pub use attempt::PaymentAttempt;
pub use collaborators::{CatalogChannel, ChannelCatalog, PaymentNode};
pub use engine::{PaymentEngine, PaymentOutcome};

/// Per-call options. `None` flags fall back to `payment.retry`.
#[derive(Debug, Clone, Default)]
pub struct SendPaymentOptions {
    pub amount_sats: Option<i64>,
    pub with_reset: Option<bool>,
    pub with_edge_update: Option<bool>,
}

/// Terminal payment result plus the decoded invoice, when available.
#[derive(Debug, Clone)]
pub struct PaymentReport {
    pub outcome: PaymentOutcome,
    pub invoice: Option<PayReq>,
}

pub struct PaymentService {
    client: LndClient,
    engine: PaymentEngine,
}

impl PaymentService {
    /// Uses the node's own channel list as the edge catalog.
    pub fn new(client: LndClient) -> Self {
        let catalog: Arc<dyn ChannelCatalog> = Arc::new(client.clone());
        Self::with_catalog(client, catalog)
    }

    pub fn with_catalog(client: LndClient, catalog: Arc<dyn ChannelCatalog>) -> Self {
        let engine = PaymentEngine::new(
            Arc::new(client.clone()),
            catalog,
            client.cfg().payment.retry.clone(),
            client.metrics(),
        );
        Self { client, engine }
    }

    pub fn engine(&self) -> &PaymentEngine {
        &self.engine
    }

    /// Pay a BOLT11 invoice.
    ///
    /// Fails only on transport, decode or stream errors of the payment call;
    /// a payment the node gives up on is `Ok` with a `Failed` outcome.
    pub async fn send_payment(&self, bolt11: &str, options: SendPaymentOptions) -> Result<PaymentReport> {
        let retry = &self.client.cfg().payment.retry;
        let attempt = PaymentAttempt::initial(
            self.client.payment_request(bolt11, options.amount_sats),
            options.with_reset.unwrap_or(retry.reset_routing_data),
            options.with_edge_update.unwrap_or(retry.refresh_edges),
        );

        let outcome = self.engine.run(attempt).await?;

        let invoice = match self.engine.node().decode_payment_request(bolt11).await {
            Ok(pay_req) => Some(pay_req),
            Err(e) => {
                tracing::warn!(error = %e, "payment request decode failed; invoice details omitted");
                None
            }
        };

        Ok(PaymentReport { outcome, invoice })
    }
}
