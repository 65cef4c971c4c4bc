use lnbridge_core::error::Result;
use lnbridge_core::rpc::lightning::*;

use crate::client::LndClient;
use crate::mux::StreamHandle;

/// Invoice parameters for [`LndClient::add_invoice`].
#[derive(Debug, Clone, Default)]
pub struct InvoiceParams {
    pub memo: String,
    pub amount_sats: Option<i64>,
    pub amount_msat: Option<i64>,
    /// Falls back to `invoice.expiry_seconds`.
    pub expiry_seconds: Option<i64>,
    pub preimage: Option<Vec<u8>>,
    pub route_hints: Vec<RouteHint>,
}

impl LndClient {
    pub async fn get_info(&self) -> Result<GetInfoResponse> {
        self.unary::<GetInfo>(&GetInfoRequest {}).await
    }

    /// Create an invoice. Without route hints the invoice is private so the
    /// node adds hints for its own private channels.
    pub async fn add_invoice(&self, params: InvoiceParams) -> Result<AddInvoiceResponse> {
        let private = params.route_hints.is_empty();
        let req = AddInvoiceRequest {
            memo: params.memo,
            value: params.amount_sats,
            value_msat: params.amount_msat,
            expiry: params
                .expiry_seconds
                .unwrap_or(self.cfg().invoice.expiry_seconds),
            r_preimage: params.preimage,
            payment_addr: None,
            private,
            route_hints: params.route_hints,
        };
        self.unary::<AddInvoice>(&req).await
    }

    pub async fn decode_pay_req(&self, pay_req: &str) -> Result<PayReq> {
        self.unary::<DecodePayReq>(&PayReqString {
            pay_req: pay_req.to_string(),
        })
        .await
    }

    pub async fn get_node_info(&self, pub_key: &str, include_channels: bool) -> Result<NodeInfo> {
        self.unary::<GetNodeInfo>(&GetNodeInfoRequest {
            pub_key: pub_key.to_string(),
            include_channels,
        })
        .await
    }

    pub async fn connect_peer(&self, pubkey: &str, host: &str) -> Result<ConnectPeerResponse> {
        self.unary::<ConnectPeer>(&ConnectPeerRequest {
            pubkey: pubkey.to_string(),
            host: host.to_string(),
            perm: false,
            timeout: None,
        })
        .await
    }

    pub async fn disconnect_peer(&self, pub_key: &str) -> Result<DisconnectPeerResponse> {
        self.unary::<DisconnectPeer>(&DisconnectPeerRequest {
            pub_key: pub_key.to_string(),
        })
        .await
    }

    pub async fn list_payments(&self, req: &ListPaymentsRequest) -> Result<ListPaymentsResponse> {
        self.unary::<ListPayments>(req).await
    }

    pub async fn sign_message(&self, msg: &[u8]) -> Result<SignMessageResponse> {
        self.unary::<SignMessage>(&SignMessageRequest { msg: msg.to_vec() })
            .await
    }

    pub async fn verify_message(&self, msg: &[u8], signature: &str) -> Result<VerifyMessageResponse> {
        self.unary::<VerifyMessage>(&VerifyMessageRequest {
            msg: msg.to_vec(),
            signature: signature.to_string(),
        })
        .await
    }

    pub async fn subscribe_invoices(&self, from: InvoiceSubscription) -> Result<StreamHandle<SubscribeInvoices>> {
        self.stream::<SubscribeInvoices>(&from).await
    }

    /// Runs until the node ends the subscription, calling `on_invoice` per update.
    pub async fn watch_invoices<F>(&self, from: InvoiceSubscription, on_invoice: F) -> Result<()>
    where
        F: FnMut(Invoice),
    {
        self.consume::<SubscribeInvoices, _>(&from, on_invoice).await.map(drop)
    }

    pub async fn subscribe_peer_events(&self) -> Result<StreamHandle<SubscribePeerEvents>> {
        self.stream::<SubscribePeerEvents>(&PeerEventSubscription {}).await
    }

    pub async fn subscribe_transactions(&self) -> Result<StreamHandle<SubscribeTransactions>> {
        self.stream::<SubscribeTransactions>(&GetTransactionsRequest {}).await
    }
}
