use lnbridge_core::error::Result;
use lnbridge_core::rpc::wallet::*;

use crate::client::LndClient;

impl LndClient {
    pub async fn gen_seed(&self, passphrase: Option<Vec<u8>>) -> Result<GenSeedResponse> {
        self.unary::<GenSeed>(&GenSeedRequest {
            aezeed_passphrase: passphrase,
            seed_entropy: None,
        })
        .await
    }

    pub async fn wallet_balance(&self) -> Result<WalletBalanceResponse> {
        self.unary::<WalletBalance>(&WalletBalanceRequest {}).await
    }

    /// On-chain send. Without an amount the whole wallet balance is swept.
    pub async fn send_coins(&self, addr: &str, amount_sats: Option<i64>) -> Result<String> {
        let req = SendCoinsRequest {
            addr: addr.to_string(),
            amount: amount_sats,
            send_all: amount_sats.is_none(),
            target_conf: None,
            sat_per_vbyte: None,
            min_confs: None,
        };
        Ok(self.unary::<SendCoins>(&req).await?.txid)
    }
}
