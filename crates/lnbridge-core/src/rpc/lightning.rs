//! Lightning service (no method prefix).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetInfoRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetInfoResponse {
    pub identity_pubkey: String,
    pub alias: String,
    pub num_active_channels: u32,
    pub num_peers: u32,
    pub block_height: u32,
    pub synced_to_chain: bool,
    pub synced_to_graph: bool,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HopHint {
    pub node_id: String,
    pub chan_id: u64,
    pub fee_base_msat: u32,
    pub fee_proportional_millionths: u32,
    pub cltv_expiry_delta: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteHint {
    pub hop_hints: Vec<HopHint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddInvoiceRequest {
    pub memo: String,
    pub value: Option<i64>,
    pub value_msat: Option<i64>,
    /// Seconds.
    pub expiry: i64,
    pub r_preimage: Option<Vec<u8>>,
    pub payment_addr: Option<Vec<u8>>,
    pub private: bool,
    pub route_hints: Vec<RouteHint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddInvoiceResponse {
    pub r_hash: Vec<u8>,
    pub payment_request: String,
    pub add_index: u64,
    pub payment_addr: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayReqString {
    pub pay_req: String,
}

/// Decoded BOLT11 payment request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayReq {
    pub destination: String,
    pub payment_hash: String,
    pub num_satoshis: i64,
    pub num_msat: i64,
    pub timestamp: i64,
    /// Seconds after `timestamp`.
    pub expiry: i64,
    pub description: String,
    pub cltv_expiry: i64,
    pub payment_addr: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetNodeInfoRequest {
    pub pub_key: String,
    pub include_channels: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeInfo {
    pub pub_key: String,
    pub alias: String,
    pub num_channels: u32,
    pub total_capacity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectPeerRequest {
    pub pubkey: String,
    pub host: String,
    pub perm: bool,
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectPeerResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisconnectPeerRequest {
    pub pub_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisconnectPeerResponse {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unknown,
    InFlight,
    Succeeded,
    Failed,
}

/// Failure classification reported by the node for a failed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFailureReason {
    #[default]
    None,
    Timeout,
    NoRoute,
    Error,
    IncorrectPaymentDetails,
    InsufficientBalance,
}

impl PaymentFailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFailureReason::None => "none",
            PaymentFailureReason::Timeout => "timeout",
            PaymentFailureReason::NoRoute => "no_route",
            PaymentFailureReason::Error => "error",
            PaymentFailureReason::IncorrectPaymentDetails => "incorrect_payment_details",
            PaymentFailureReason::InsufficientBalance => "insufficient_balance",
        }
    }
}

/// Payment record / payment status update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Payment {
    pub payment_hash: String,
    pub value_msat: i64,
    pub fee_msat: i64,
    pub payment_preimage: String,
    pub payment_request: String,
    pub status: PaymentStatus,
    pub failure_reason: PaymentFailureReason,
    pub creation_time_ns: i64,
    pub payment_index: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListPaymentsRequest {
    pub include_incomplete: bool,
    pub index_offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListPaymentsResponse {
    pub payments: Vec<Payment>,
    pub first_index_offset: u64,
    pub last_index_offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignMessageRequest {
    pub msg: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignMessageResponse {
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerifyMessageRequest {
    pub msg: Vec<u8>,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerifyMessageResponse {
    pub valid: bool,
    pub pubkey: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceSubscription {
    pub add_index: u64,
    pub settle_index: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InvoiceState {
    #[default]
    Open,
    Settled,
    Canceled,
    Accepted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Invoice {
    pub memo: String,
    pub r_hash: Vec<u8>,
    pub value_msat: i64,
    pub state: InvoiceState,
    pub payment_request: String,
    pub add_index: u64,
    pub settle_index: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeerEventSubscription {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PeerEventType {
    #[default]
    PeerOnline,
    PeerOffline,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeerEvent {
    pub pub_key: String,
    pub kind: PeerEventType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetTransactionsRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_hash: String,
    pub amount: i64,
    pub num_confirmations: i32,
    pub block_height: i32,
    pub time_stamp: i64,
}

unary!(GetInfo = "GetInfo", GetInfoRequest => GetInfoResponse);
unary!(AddInvoice = "AddInvoice", AddInvoiceRequest => AddInvoiceResponse);
unary!(DecodePayReq = "DecodePayReq", PayReqString => PayReq);
unary!(GetNodeInfo = "GetNodeInfo", GetNodeInfoRequest => NodeInfo);
unary!(ConnectPeer = "ConnectPeer", ConnectPeerRequest => ConnectPeerResponse);
unary!(DisconnectPeer = "DisconnectPeer", DisconnectPeerRequest => DisconnectPeerResponse);
unary!(ListPayments = "ListPayments", ListPaymentsRequest => ListPaymentsResponse);
unary!(SignMessage = "SignMessage", SignMessageRequest => SignMessageResponse);
unary!(VerifyMessage = "VerifyMessage", VerifyMessageRequest => VerifyMessageResponse);

streaming!(SubscribeInvoices = "SubscribeInvoices", InvoiceSubscription => Invoice);
streaming!(SubscribePeerEvents = "SubscribePeerEvents", PeerEventSubscription => PeerEvent);
streaming!(SubscribeTransactions = "SubscribeTransactions", GetTransactionsRequest => Transaction);
