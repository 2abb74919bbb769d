//! REST client implementing [`Platform`] over the platform's HTTPS JSON API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tally_types::{AddressId, NetworkId, WalletId};

use crate::api::Platform;
use crate::error::PlatformError;
use crate::model::{
    Balance, FaucetTransaction, Trade, TradeRequest, Transfer, TransferRequest,
};
use crate::pagination::{ListParams, Page, DEFAULT_PAGE_SIZE, MAX_PAGES};

/// Default timeout for a whole request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default timeout for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the platform API.
///
/// Wraps `reqwest::Client` with the API base URL and key and provides one
/// typed method per platform operation.
#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    page_size: u32,
}

/// Error body returned by the platform on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

#[derive(Serialize)]
struct BroadcastTransferBody<'a> {
    signed_payload: &'a str,
}

#[derive(Serialize)]
struct BroadcastTradeBody<'a> {
    signed_payloads: Vec<&'a str>,
}

impl PlatformClient {
    /// Create a client targeting `api_url` (e.g. `https://api.example.com/platform`).
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, PlatformError> {
        Self::with_timeouts(api_url, api_key, DEFAULT_REQUEST_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        request_timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| PlatformError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Page size used when walking list endpoints.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// The configured API base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, PlatformError> {
        tracing::debug!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PlatformError> {
        tracing::debug!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PlatformError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(response.json::<T>().await?)
    }

    /// Walk every page of a list endpoint.
    async fn list_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, PlatformError> {
        let mut items = Vec::new();
        let mut params = ListParams {
            limit: Some(self.page_size),
            page: None,
        };
        for _ in 0..MAX_PAGES {
            let page: Page<T> = self.get(path, &params.query_pairs()).await?;
            let next = page.next_cursor().map(str::to_string);
            items.extend(page.data);
            match next {
                Some(cursor) => params.page = Some(cursor),
                None => return Ok(items),
            }
        }
        Err(PlatformError::Decode(format!(
            "{path}: more than {MAX_PAGES} pages"
        )))
    }
}

/// Map a non-2xx response to [`PlatformError::Api`], keeping the platform's
/// error code and message when the body carries them.
pub(crate) fn api_error(status: u16, body: &str) -> PlatformError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => PlatformError::Api {
            status,
            code: err.code,
            message: err.message,
        },
        Err(_) => PlatformError::Api {
            status,
            code: "unknown".to_string(),
            message: body.trim().to_string(),
        },
    }
}

fn address_path(wallet_id: &WalletId, address_id: &AddressId) -> String {
    format!("v1/wallets/{wallet_id}/addresses/{address_id}")
}

fn network_address_path(network_id: NetworkId, address_id: &AddressId) -> String {
    format!("v1/networks/{}/addresses/{address_id}", network_id.as_str())
}

impl fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformClient")
            .field("api_url", &self.api_url)
            .field("api_key", &tally_utils::redact(&self.api_key))
            .field("page_size", &self.page_size)
            .finish()
    }
}

#[async_trait]
impl Platform for PlatformClient {
    async fn get_balance(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
        asset_id: &str,
    ) -> Result<Balance, PlatformError> {
        let path = format!("{}/balances/{asset_id}", network_address_path(network_id, address_id));
        self.get(&path, &[]).await
    }

    async fn list_balances(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
    ) -> Result<Vec<Balance>, PlatformError> {
        let path = format!("{}/balances", network_address_path(network_id, address_id));
        self.list_all(&path).await
    }

    async fn create_transfer(&self, request: TransferRequest) -> Result<Transfer, PlatformError> {
        let path = format!(
            "{}/transfers",
            address_path(&request.wallet_id, &request.address_id)
        );
        self.post(&path, &request).await
    }

    async fn broadcast_transfer(&self, transfer: &Transfer) -> Result<Transfer, PlatformError> {
        let signed_payload = transfer
            .transaction
            .signed_payload
            .as_deref()
            .ok_or_else(|| {
                PlatformError::InvalidRequest(format!("transfer {} is not signed", transfer.id))
            })?;
        let path = format!(
            "{}/transfers/{}/broadcast",
            address_path(&transfer.wallet_id, &transfer.address_id),
            transfer.id
        );
        self.post(&path, &BroadcastTransferBody { signed_payload }).await
    }

    async fn create_trade(&self, request: TradeRequest) -> Result<Trade, PlatformError> {
        let path = format!(
            "{}/trades",
            address_path(&request.wallet_id, &request.address_id)
        );
        self.post(&path, &request).await
    }

    async fn broadcast_trade(&self, trade: &Trade) -> Result<Trade, PlatformError> {
        let signed_payloads = trade
            .transactions
            .iter()
            .map(|tx| tx.signed_payload.as_deref())
            .collect::<Option<Vec<_>>>()
            .filter(|payloads| !payloads.is_empty())
            .ok_or_else(|| {
                PlatformError::InvalidRequest(format!("trade {} is not fully signed", trade.id))
            })?;
        let path = format!(
            "{}/trades/{}/broadcast",
            address_path(&trade.wallet_id, &trade.address_id),
            trade.id
        );
        self.post(&path, &BroadcastTradeBody { signed_payloads }).await
    }

    async fn list_transfers(
        &self,
        wallet_id: &WalletId,
        address_id: &AddressId,
    ) -> Result<Vec<Transfer>, PlatformError> {
        let path = format!("{}/transfers", address_path(wallet_id, address_id));
        self.list_all(&path).await
    }

    async fn list_trades(
        &self,
        wallet_id: &WalletId,
        address_id: &AddressId,
    ) -> Result<Vec<Trade>, PlatformError> {
        let path = format!("{}/trades", address_path(wallet_id, address_id));
        self.list_all(&path).await
    }

    async fn request_faucet_funds(
        &self,
        network_id: NetworkId,
        address_id: &AddressId,
    ) -> Result<FaucetTransaction, PlatformError> {
        let path = format!("{}/faucet", network_address_path(network_id, address_id));
        self.post(&path, &serde_json::json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Transaction, TransactionStatus};

    fn client() -> PlatformClient {
        PlatformClient::new("https://api.example.test/platform/", "organizations/o/apiKeys/k-123456").unwrap()
    }

    fn transfer(signed: Option<&str>) -> Transfer {
        Transfer {
            id: "tr-1".into(),
            network_id: NetworkId::BaseSepolia,
            wallet_id: WalletId::new("w-1").unwrap(),
            address_id: AddressId::new("0xabc").unwrap(),
            destination: "0xdef".into(),
            asset_id: "eth".into(),
            amount: "1".into(),
            transaction: Transaction {
                network_id: NetworkId::BaseSepolia,
                from_address_id: AddressId::new("0xabc").unwrap(),
                unsigned_payload: "00".into(),
                signed_payload: signed.map(str::to_string),
                transaction_hash: None,
                status: TransactionStatus::Pending,
            },
        }
    }

    #[test]
    fn trims_trailing_slash() {
        let c = client();
        assert_eq!(c.api_url(), "https://api.example.test/platform");
        assert_eq!(
            c.url("/v1/wallets"),
            "https://api.example.test/platform/v1/wallets"
        );
    }

    #[test]
    fn builds_resource_paths() {
        let wallet = WalletId::new("w-1").unwrap();
        let address = AddressId::new("0xabc").unwrap();
        assert_eq!(address_path(&wallet, &address), "v1/wallets/w-1/addresses/0xabc");
        assert_eq!(
            network_address_path(NetworkId::BaseSepolia, &address),
            "v1/networks/base-sepolia/addresses/0xabc"
        );
    }

    #[test]
    fn decodes_structured_api_errors() {
        let err = api_error(400, r#"{"code":"invalid_amount","message":"amount must be positive"}"#);
        match err {
            PlatformError::Api { status, code, message } => {
                assert_eq!(status, 400);
                assert_eq!(code, "invalid_amount");
                assert_eq!(message, "amount must be positive");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decodes_unstructured_api_errors() {
        let err = api_error(502, "Bad Gateway\n");
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("k-123456"));
        assert!(rendered.contains("orga***3456"));
    }

    #[tokio::test]
    async fn broadcast_requires_signature() {
        let err = client().broadcast_transfer(&transfer(None)).await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidRequest(_)));
    }
}
