//! Channel management methods.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListChannelsRequest {
    pub active_only: bool,
    pub inactive_only: bool,
    pub public_only: bool,
    pub private_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Channel {
    pub active: bool,
    pub remote_pubkey: String,
    pub channel_point: String,
    pub chan_id: u64,
    pub capacity: i64,
    pub local_balance: i64,
    pub remote_balance: i64,
    pub private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListChannelsResponse {
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelBalanceRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelBalanceResponse {
    pub local_balance_msat: u64,
    pub remote_balance_msat: u64,
    pub pending_open_local_balance_msat: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpenChannelRequest {
    pub node_pubkey: Vec<u8>,
    pub local_funding_amount: i64,
    pub push_sat: i64,
    pub private: bool,
    pub target_conf: Option<i32>,
    pub sat_per_vbyte: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenUpdate {
    ChanPending { txid: Vec<u8>, output_index: u32 },
    ChanOpen { channel_point: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenStatusUpdate {
    pub pending_chan_id: Vec<u8>,
    pub update: OpenUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CloseChannelRequest {
    pub channel_point: String,
    pub force: bool,
    pub target_conf: Option<i32>,
    pub sat_per_vbyte: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseStatusUpdate {
    ClosePending { txid: Vec<u8> },
    ChanClose { closing_txid: Vec<u8>, success: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelEventSubscription {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelEventType {
    #[default]
    Open,
    Closed,
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelEventUpdate {
    pub kind: ChannelEventType,
    pub channel_point: String,
}

/// Opening frame of the acceptor stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcceptorSubscription {}

/// Pushed by the node for every inbound channel proposal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelAcceptRequest {
    pub node_pubkey: Vec<u8>,
    pub pending_chan_id: Vec<u8>,
    pub funding_amt: u64,
    pub push_amt: u64,
    pub private: bool,
}

/// Written back by the caller, one per proposal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelAcceptResponse {
    pub accept: bool,
    pub pending_chan_id: Vec<u8>,
    pub error: String,
}

unary!(ListChannels = "ListChannels", ListChannelsRequest => ListChannelsResponse);
unary!(ChannelBalance = "ChannelBalance", ChannelBalanceRequest => ChannelBalanceResponse);
streaming!(OpenChannel = "OpenChannel", OpenChannelRequest => OpenStatusUpdate);
streaming!(CloseChannel = "CloseChannel", CloseChannelRequest => CloseStatusUpdate);
streaming!(
    SubscribeChannelEvents = "SubscribeChannelEvents",
    ChannelEventSubscription => ChannelEventUpdate
);
streaming!(
    ChannelAcceptor = "ChannelAcceptor",
    AcceptorSubscription => ChannelAcceptRequest
);

impl crate::rpc::Bidi for ChannelAcceptor {
    type Frame = ChannelAcceptResponse;
}
