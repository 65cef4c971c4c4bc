//! Collaborators of the payment engine.
//!
//! `LndClient` implements both traits; tests substitute scripted doubles.

use async_trait::async_trait;

use lnbridge_core::error::{BridgeError, Result};
use lnbridge_core::rpc::channel::ListChannelsRequest;
use lnbridge_core::rpc::lightning::{PayReq, Payment, PaymentStatus};
use lnbridge_core::rpc::router::SendPaymentRequest;

use crate::client::LndClient;

/// A channel as listed by the catalog. Ids are decimal short channel ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogChannel {
    pub channel_id: String,
}

#[async_trait]
pub trait ChannelCatalog: Send + Sync {
    async fn list_channels(&self) -> Result<Vec<CatalogChannel>>;
}

#[async_trait]
pub trait PaymentNode: Send + Sync {
    /// Run one payment attempt until it reports `Succeeded` or `Failed`.
    async fn send_payment(&self, request: &SendPaymentRequest) -> Result<Payment>;

    async fn reset_routing_data(&self) -> Result<()>;

    async fn mark_edges_live(&self, channel_ids: &[u64]) -> Result<()>;

    async fn decode_payment_request(&self, bolt11: &str) -> Result<PayReq>;
}

fn is_final(status: PaymentStatus) -> bool {
    matches!(status, PaymentStatus::Succeeded | PaymentStatus::Failed)
}

#[async_trait]
impl PaymentNode for LndClient {
    async fn send_payment(&self, request: &SendPaymentRequest) -> Result<Payment> {
        let mut updates = self.send_payment_v2(request).await?;
        let stream_id = updates.id().clone();

        while let Some(update) = updates.next().await {
            let payment = update?;
            if is_final(payment.status) {
                // The node ends the stream on its own; stop listening now.
                updates.cancel().await;
                return Ok(payment);
            }
            tracing::debug!(%stream_id, payment_hash = %payment.payment_hash, status = ?payment.status, "payment update");
        }

        match updates.take_completion().transpose()? {
            Some(payment) if is_final(payment.status) => Ok(payment),
            _ => Err(BridgeError::StreamClosed(stream_id.to_string())),
        }
    }

    async fn reset_routing_data(&self) -> Result<()> {
        self.reset_mission_control().await
    }

    async fn mark_edges_live(&self, channel_ids: &[u64]) -> Result<()> {
        self.mark_edge_live(channel_ids).await
    }

    async fn decode_payment_request(&self, bolt11: &str) -> Result<PayReq> {
        self.decode_pay_req(bolt11).await
    }
}

#[async_trait]
impl ChannelCatalog for LndClient {
    async fn list_channels(&self) -> Result<Vec<CatalogChannel>> {
        let channels = LndClient::list_channels(self, &ListChannelsRequest::default()).await?;
        Ok(channels
            .into_iter()
            .map(|c| CatalogChannel {
                channel_id: c.chan_id.to_string(),
            })
            .collect())
    }
}
