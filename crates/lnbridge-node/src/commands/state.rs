use lnbridge_core::error::Result;
use lnbridge_core::rpc::state::*;

use crate::client::LndClient;
use crate::mux::StreamHandle;

impl LndClient {
    pub async fn get_state(&self) -> Result<WalletState> {
        Ok(self.unary::<GetState>(&GetStateRequest {}).await?.state)
    }

    pub async fn subscribe_state(&self) -> Result<StreamHandle<SubscribeState>> {
        self.stream::<SubscribeState>(&SubscribeStateRequest {}).await
    }

    /// Follow wallet state transitions until the node ends the stream.
    pub async fn watch_state<F>(&self, mut on_state: F) -> Result<()>
    where
        F: FnMut(WalletState),
    {
        self.consume::<SubscribeState, _>(&SubscribeStateRequest {}, |u| on_state(u.state))
            .await
            .map(drop)
    }
}
