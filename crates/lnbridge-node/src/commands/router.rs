use lnbridge_core::error::Result;
use lnbridge_core::rpc::lightning::Payment;
use lnbridge_core::rpc::router::*;

use crate::client::LndClient;
use crate::mux::StreamHandle;

impl LndClient {
    /// SendPaymentV2 request for a BOLT11 invoice with the configured limits.
    pub fn payment_request(&self, bolt11: &str, amount_sats: Option<i64>) -> SendPaymentRequest {
        let p = &self.cfg().payment;
        SendPaymentRequest {
            dest: None,
            amt: amount_sats,
            payment_hash: None,
            payment_request: Some(bolt11.to_string()),
            timeout_seconds: p.timeout_seconds,
            fee_limit_sat: p.fee_limit_sat,
            cltv_limit: p.cltv_limit,
            max_parts: p.max_parts,
            amp: false,
        }
    }

    pub async fn send_payment_v2(&self, req: &SendPaymentRequest) -> Result<StreamHandle<SendPaymentV2>> {
        self.stream::<SendPaymentV2>(req).await
    }

    /// Drive SendPaymentV2 to the end of its stream, reporting every update.
    pub async fn send_payment_v2_with<F>(&self, req: &SendPaymentRequest, on_update: F) -> Result<Option<Payment>>
    where
        F: FnMut(Payment),
    {
        self.consume::<SendPaymentV2, _>(req, on_update).await
    }

    pub async fn mark_edge_live(&self, channel_ids: &[u64]) -> Result<()> {
        self.unary::<MarkEdgeLive>(&MarkEdgeLiveRequest {
            channel_ids: channel_ids.to_vec(),
        })
        .await
        .map(drop)
    }

    pub async fn reset_mission_control(&self) -> Result<()> {
        self.unary::<ResetMissionControl>(&ResetMissionControlRequest {})
            .await
            .map(drop)
    }
}
