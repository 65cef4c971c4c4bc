//! Wallet state service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WalletState {
    #[default]
    NonExisting,
    Locked,
    Unlocked,
    RpcActive,
    ServerActive,
    WaitingToStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetStateRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetStateResponse {
    pub state: WalletState,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscribeStateRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscribeStateResponse {
    pub state: WalletState,
}

unary!(GetState = "GetState", GetStateRequest => GetStateResponse);
streaming!(SubscribeState = "SubscribeState", SubscribeStateRequest => SubscribeStateResponse);
