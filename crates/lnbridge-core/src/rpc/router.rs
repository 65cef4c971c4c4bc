//! Router service (`Router` prefix).

use serde::{Deserialize, Serialize};

use crate::rpc::lightning::Payment;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendPaymentRequest {
    pub dest: Option<Vec<u8>>,
    pub amt: Option<i64>,
    pub payment_hash: Option<Vec<u8>>,
    pub payment_request: Option<String>,
    pub timeout_seconds: i32,
    pub fee_limit_sat: i64,
    pub cltv_limit: i32,
    pub max_parts: u32,
    pub amp: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkEdgeLiveRequest {
    pub channel_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkEdgeLiveResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetMissionControlRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetMissionControlResponse {}

streaming!(
    /// Emits `Payment` updates until the payment reaches a final status.
    SendPaymentV2 = "RouterSendPaymentV2", SendPaymentRequest => Payment
);
unary!(MarkEdgeLive = "RouterMarkEdgeLive", MarkEdgeLiveRequest => MarkEdgeLiveResponse);
unary!(
    /// Clears path-finding penalties (mission control).
    ResetMissionControl = "RouterResetMissionControl",
    ResetMissionControlRequest => ResetMissionControlResponse
);
