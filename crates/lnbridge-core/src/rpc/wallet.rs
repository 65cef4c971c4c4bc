//! On-chain wallet and seed methods.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenSeedRequest {
    pub aezeed_passphrase: Option<Vec<u8>>,
    pub seed_entropy: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenSeedResponse {
    pub cipher_seed_mnemonic: Vec<String>,
    pub enciphered_seed: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WalletBalanceRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WalletBalanceResponse {
    pub total_balance: i64,
    pub confirmed_balance: i64,
    pub unconfirmed_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendCoinsRequest {
    pub addr: String,
    pub amount: Option<i64>,
    /// Sweep the whole wallet; set when no amount is given.
    pub send_all: bool,
    pub target_conf: Option<i32>,
    pub sat_per_vbyte: Option<u64>,
    pub min_confs: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendCoinsResponse {
    pub txid: String,
}

unary!(GenSeed = "GenSeed", GenSeedRequest => GenSeedResponse);
unary!(WalletBalance = "WalletBalance", WalletBalanceRequest => WalletBalanceResponse);
unary!(SendCoins = "SendCoins", SendCoinsRequest => SendCoinsResponse);
