//! Payment retry state machine.
//!
//! ```text
//! Attempting(s) --Succeeded--------------------------------> Succeeded
//! Attempting(s) --Failed(non-retryable)--------------------> Failed
//! Attempting(s) --Failed(retryable), s.allow_reset---------> reset, Attempting(s - reset)
//! Attempting(s) --Failed(retryable), s.allow_edge_refresh--> refresh, Attempting(s - refresh)
//! Attempting(s) --Failed(retryable), leaf------------------> Failed
//! ```
//!
//! A side effect that fails (or an empty channel catalog) ends the machine in
//! `Failed` with the payment's own reason; the side-effect error is only
//! logged.

use std::sync::Arc;

use lnbridge_core::error::{BridgeError, Result};
use lnbridge_core::rpc::lightning::{Payment, PaymentFailureReason, PaymentStatus};

use crate::config::RetrySection;
use crate::obs::BridgeMetrics;
use crate::payment::attempt::PaymentAttempt;
use crate::payment::collaborators::{ChannelCatalog, PaymentNode};

/// Terminal state of the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded(Payment),
    Failed {
        payment: Payment,
        reason: PaymentFailureReason,
    },
}

impl PaymentOutcome {
    pub fn payment(&self) -> &Payment {
        match self {
            PaymentOutcome::Succeeded(p) => p,
            PaymentOutcome::Failed { payment, .. } => payment,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentOutcome::Succeeded(_))
    }

    /// `None` on success.
    pub fn failure_reason(&self) -> Option<PaymentFailureReason> {
        match self {
            PaymentOutcome::Succeeded(_) => None,
            PaymentOutcome::Failed { reason, .. } => Some(*reason),
        }
    }
}

enum Refresh {
    Marked(usize),
    NoEdges,
}

pub struct PaymentEngine {
    node: Arc<dyn PaymentNode>,
    catalog: Arc<dyn ChannelCatalog>,
    retry: RetrySection,
    metrics: Arc<BridgeMetrics>,
}

impl PaymentEngine {
    pub fn new(
        node: Arc<dyn PaymentNode>,
        catalog: Arc<dyn ChannelCatalog>,
        retry: RetrySection,
        metrics: Arc<BridgeMetrics>,
    ) -> Self {
        Self {
            node,
            catalog,
            retry,
            metrics,
        }
    }

    pub fn node(&self) -> &Arc<dyn PaymentNode> {
        &self.node
    }

    /// Run attempts until a terminal state.
    ///
    /// Errors are transport/decode/stream failures of the payment call
    /// itself; payment failures come back as `Ok(PaymentOutcome::Failed)`.
    pub async fn run(&self, initial: PaymentAttempt) -> Result<PaymentOutcome> {
        let mut attempt = initial;
        let mut round: u32 = 0;

        loop {
            round += 1;
            self.step("attempt");
            tracing::debug!(
                round,
                allow_reset = attempt.allow_reset,
                allow_edge_refresh = attempt.allow_edge_refresh,
                "payment attempt"
            );

            let payment = self.node.send_payment(&attempt.request).await?;

            if payment.status == PaymentStatus::Succeeded {
                tracing::info!(round, payment_hash = %payment.payment_hash, "payment succeeded");
                return Ok(self.finish(PaymentOutcome::Succeeded(payment)));
            }

            let reason = payment.failure_reason;
            if !self.retry.is_retryable(reason) {
                tracing::info!(round, reason = reason.as_str(), "payment failed; not retryable");
                return Ok(self.failed(payment, reason));
            }

            if attempt.allow_reset {
                tracing::debug!(round, reason = reason.as_str(), "payment failure, resetting routing data");
                self.step("reset");
                if let Err(e) = self.node.reset_routing_data().await {
                    self.step("side_effect_failed");
                    tracing::error!(error = %e, "routing data reset failed");
                    return Ok(self.failed(payment, reason));
                }
                attempt = attempt.without_reset();
                continue;
            }

            if attempt.allow_edge_refresh {
                tracing::debug!(round, reason = reason.as_str(), "payment failure, forcing edge update");
                self.step("edge_refresh");
                match self.refresh_edges().await {
                    Ok(Refresh::Marked(n)) => {
                        tracing::debug!(round, edges = n, "edges marked live");
                        attempt = attempt.without_edge_refresh();
                        continue;
                    }
                    Ok(Refresh::NoEdges) => return Ok(self.failed(payment, reason)),
                    Err(e) => {
                        self.step("side_effect_failed");
                        tracing::error!(error = %e, "error updating edges");
                        return Ok(self.failed(payment, reason));
                    }
                }
            }

            tracing::info!(round, reason = reason.as_str(), "payment failed; retries exhausted");
            return Ok(self.failed(payment, reason));
        }
    }

    async fn refresh_edges(&self) -> Result<Refresh> {
        let channels = self.catalog.list_channels().await?;
        tracing::debug!(edges = channels.len(), "edges received");
        if channels.is_empty() {
            return Ok(Refresh::NoEdges);
        }

        let ids = channels
            .iter()
            .map(|c| {
                c.channel_id
                    .parse::<u64>()
                    .map_err(|_| BridgeError::Decode(format!("invalid channel id: {}", c.channel_id)))
            })
            .collect::<Result<Vec<u64>>>()?;

        self.step("mark_edges_live");
        self.node.mark_edges_live(&ids).await?;
        Ok(Refresh::Marked(ids.len()))
    }

    fn failed(&self, payment: Payment, reason: PaymentFailureReason) -> PaymentOutcome {
        self.finish(PaymentOutcome::Failed { payment, reason })
    }

    fn finish(&self, outcome: PaymentOutcome) -> PaymentOutcome {
        let label = match &outcome {
            PaymentOutcome::Succeeded(_) => "succeeded",
            PaymentOutcome::Failed { reason, .. } => reason.as_str(),
        };
        self.metrics.payment_results.inc(&[("outcome", label)]);
        outcome
    }

    fn step(&self, step: &str) {
        self.metrics.payment_steps.inc(&[("step", step)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use lnbridge_core::rpc::lightning::PayReq;
    use lnbridge_core::rpc::router::SendPaymentRequest;

    use crate::payment::collaborators::CatalogChannel;

    #[derive(Default)]
    struct Script {
        payments: Mutex<VecDeque<Payment>>,
        channels: Mutex<Vec<CatalogChannel>>,
        fail_reset: bool,
        fail_catalog: bool,
        sends: Mutex<u32>,
        resets: Mutex<u32>,
        lists: Mutex<u32>,
        marked: Mutex<Vec<Vec<u64>>>,
    }

    #[async_trait]
    impl PaymentNode for Script {
        async fn send_payment(&self, _request: &SendPaymentRequest) -> Result<Payment> {
            *self.sends.lock().unwrap() += 1;
            self.payments
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| BridgeError::Internal("script exhausted".into()))
        }

        async fn reset_routing_data(&self) -> Result<()> {
            *self.resets.lock().unwrap() += 1;
            if self.fail_reset {
                return Err(BridgeError::Transport("node unreachable".into()));
            }
            Ok(())
        }

        async fn mark_edges_live(&self, channel_ids: &[u64]) -> Result<()> {
            self.marked.lock().unwrap().push(channel_ids.to_vec());
            Ok(())
        }

        async fn decode_payment_request(&self, _bolt11: &str) -> Result<PayReq> {
            Ok(PayReq::default())
        }
    }

    #[async_trait]
    impl ChannelCatalog for Script {
        async fn list_channels(&self) -> Result<Vec<CatalogChannel>> {
            *self.lists.lock().unwrap() += 1;
            if self.fail_catalog {
                return Err(BridgeError::Decode("bad catalog reply".into()));
            }
            Ok(self.channels.lock().unwrap().clone())
        }
    }

    fn failed(reason: PaymentFailureReason) -> Payment {
        Payment {
            status: PaymentStatus::Failed,
            failure_reason: reason,
            ..Payment::default()
        }
    }

    fn succeeded() -> Payment {
        Payment {
            status: PaymentStatus::Succeeded,
            payment_preimage: "00ff".into(),
            ..Payment::default()
        }
    }

    fn channels(ids: &[&str]) -> Vec<CatalogChannel> {
        ids.iter()
            .map(|id| CatalogChannel { channel_id: id.to_string() })
            .collect()
    }

    fn engine(script: &Arc<Script>) -> (PaymentEngine, Arc<BridgeMetrics>) {
        let metrics = Arc::new(BridgeMetrics::default());
        let engine = PaymentEngine::new(
            Arc::clone(script) as Arc<dyn PaymentNode>,
            Arc::clone(script) as Arc<dyn ChannelCatalog>,
            RetrySection::default(),
            Arc::clone(&metrics),
        );
        (engine, metrics)
    }

    fn attempt() -> PaymentAttempt {
        PaymentAttempt::initial(SendPaymentRequest::default(), true, true)
    }

    #[tokio::test]
    async fn success_after_reset() {
        let script = Arc::new(Script::default());
        script.payments.lock().unwrap().extend([failed(PaymentFailureReason::NoRoute), succeeded()]);
        let (engine, metrics) = engine(&script);

        let out = engine.run(attempt()).await.unwrap();
        assert!(out.is_success());
        assert_eq!(*script.resets.lock().unwrap(), 1);
        assert_eq!(*script.lists.lock().unwrap(), 0);
        assert!(script.marked.lock().unwrap().is_empty());
        assert_eq!(metrics.payment_results.get(&[("outcome", "succeeded")]), 1);
    }

    #[tokio::test]
    async fn empty_catalog_fails_with_original_reason() {
        let script = Arc::new(Script::default());
        script.payments.lock().unwrap().extend([
            failed(PaymentFailureReason::NoRoute),
            failed(PaymentFailureReason::NoRoute),
        ]);
        let (engine, _) = engine(&script);

        let out = engine.run(attempt()).await.unwrap();
        assert_eq!(out.failure_reason(), Some(PaymentFailureReason::NoRoute));
        assert_eq!(*script.sends.lock().unwrap(), 2);
        assert_eq!(*script.resets.lock().unwrap(), 1);
        assert_eq!(*script.lists.lock().unwrap(), 1);
        assert!(script.marked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let script = Arc::new(Script::default());
        script.payments.lock().unwrap().extend([
            failed(PaymentFailureReason::InsufficientBalance),
            failed(PaymentFailureReason::InsufficientBalance),
            failed(PaymentFailureReason::InsufficientBalance),
            failed(PaymentFailureReason::InsufficientBalance),
        ]);
        *script.channels.lock().unwrap() = channels(&["770495967390531585", "12"]);
        let (engine, metrics) = engine(&script);

        let out = engine.run(attempt()).await.unwrap();
        assert_eq!(out.failure_reason(), Some(PaymentFailureReason::InsufficientBalance));
        assert_eq!(*script.sends.lock().unwrap(), 3);
        assert_eq!(*script.resets.lock().unwrap(), 1);
        assert_eq!(*script.marked.lock().unwrap(), vec![vec![770495967390531585, 12]]);
        assert_eq!(script.payments.lock().unwrap().len(), 1);
        assert_eq!(metrics.payment_steps.get(&[("step", "attempt")]), 3);
    }

    #[tokio::test]
    async fn non_retryable_has_no_side_effects() {
        let script = Arc::new(Script::default());
        script.payments.lock().unwrap().push_back(failed(PaymentFailureReason::IncorrectPaymentDetails));
        let (engine, _) = engine(&script);

        let out = engine.run(attempt()).await.unwrap();
        assert_eq!(out.failure_reason(), Some(PaymentFailureReason::IncorrectPaymentDetails));
        assert_eq!(*script.resets.lock().unwrap(), 0);
        assert_eq!(*script.lists.lock().unwrap(), 0);
        assert!(script.marked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_error_does_not_mask_payment_failure() {
        let script = Arc::new(Script {
            fail_catalog: true,
            ..Script::default()
        });
        script.payments.lock().unwrap().push_back(failed(PaymentFailureReason::NoRoute));
        let (engine, metrics) = engine(&script);

        let out = engine
            .run(PaymentAttempt::initial(SendPaymentRequest::default(), false, true))
            .await
            .unwrap();
        assert_eq!(out.failure_reason(), Some(PaymentFailureReason::NoRoute));
        assert_eq!(*script.lists.lock().unwrap(), 1);
        assert_eq!(metrics.payment_steps.get(&[("step", "side_effect_failed")]), 1);
    }

    #[tokio::test]
    async fn reset_error_does_not_mask_payment_failure() {
        let script = Arc::new(Script {
            fail_reset: true,
            ..Script::default()
        });
        script.payments.lock().unwrap().push_back(failed(PaymentFailureReason::NoRoute));
        let (engine, _) = engine(&script);

        let out = engine.run(attempt()).await.unwrap();
        assert_eq!(out.failure_reason(), Some(PaymentFailureReason::NoRoute));
        assert_eq!(*script.sends.lock().unwrap(), 1);
        assert_eq!(*script.lists.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn bad_channel_id_counts_as_refresh_failure() {
        let script = Arc::new(Script::default());
        script.payments.lock().unwrap().push_back(failed(PaymentFailureReason::NoRoute));
        *script.channels.lock().unwrap() = channels(&["not-a-number"]);
        let (engine, _) = engine(&script);

        let out = engine
            .run(PaymentAttempt::initial(SendPaymentRequest::default(), false, true))
            .await
            .unwrap();
        assert_eq!(out.failure_reason(), Some(PaymentFailureReason::NoRoute));
        assert!(script.marked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn payment_call_errors_propagate() {
        let script = Arc::new(Script::default());
        let (engine, _) = engine(&script);

        let err = engine.run(attempt()).await.unwrap_err();
        assert_eq!(err.code().as_str(), "INTERNAL");
    }
}
