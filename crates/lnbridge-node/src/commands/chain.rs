use lnbridge_core::error::Result;
use lnbridge_core::rpc::chain::*;

use crate::client::LndClient;
use crate::mux::StreamHandle;

impl LndClient {
    /// New block notifications. Pass the best known block to replay missed epochs.
    pub async fn register_block_epoch_ntfn(&self, from: BlockEpoch) -> Result<StreamHandle<RegisterBlockEpochNtfn>> {
        self.stream::<RegisterBlockEpochNtfn>(&from).await
    }
}
