use lnbridge_core::error::Result;
use lnbridge_core::rpc::channel::*;

use crate::client::LndClient;
use crate::mux::StreamHandle;

impl LndClient {
    pub async fn list_channels(&self, req: &ListChannelsRequest) -> Result<Vec<Channel>> {
        Ok(self.unary::<ListChannels>(req).await?.channels)
    }

    pub async fn channel_balance(&self) -> Result<ChannelBalanceResponse> {
        self.unary::<ChannelBalance>(&ChannelBalanceRequest {}).await
    }

    /// Pending and open updates for a new channel.
    pub async fn open_channel(&self, req: &OpenChannelRequest) -> Result<StreamHandle<OpenChannel>> {
        self.stream::<OpenChannel>(req).await
    }

    pub async fn close_channel(&self, req: &CloseChannelRequest) -> Result<StreamHandle<CloseChannel>> {
        self.stream::<CloseChannel>(req).await
    }

    pub async fn subscribe_channel_events(&self) -> Result<StreamHandle<SubscribeChannelEvents>> {
        self.stream::<SubscribeChannelEvents>(&ChannelEventSubscription {})
            .await
    }

    /// Bidirectional acceptor. Read proposals with `next()`, answer each with
    /// `send(&ChannelAcceptResponse)`.
    pub async fn channel_acceptor(&self) -> Result<StreamHandle<ChannelAcceptor>> {
        self.stream::<ChannelAcceptor>(&AcceptorSubscription {}).await
    }
}
