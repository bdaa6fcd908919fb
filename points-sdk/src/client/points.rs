//! Points API client (wallet frontend or backend → points server).

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::{
    ChainListing, ErrorBody, PurchaseRequest, PurchaseResponse, QuoteRequest, QuoteResponse,
    TxStatusQuery, TxStatusResponse,
};

/// Typed HTTP client for `/api/v1/points`.
#[derive(Debug, Clone)]
pub struct PointsClient {
    http: Client,
    base_url: Url,
}

impl PointsClient {
    /// Create a new `PointsClient` for the server rooted at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /api/v1/points/quote`
    pub async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, ClientError> {
        let url = self.base_url.join("/api/v1/points/quote")?;
        let resp = self.http.post(url).json(request).send().await?;
        parse_response(resp).await
    }

    /// `POST /api/v1/points/purchase`
    pub async fn purchase(
        &self,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResponse, ClientError> {
        let url = self.base_url.join("/api/v1/points/purchase")?;
        let resp = self.http.post(url).json(request).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/points/tx-status`
    pub async fn tx_status(
        &self,
        tx_hash: impl Into<String>,
        chain_id: u64,
    ) -> Result<TxStatusResponse, ClientError> {
        let url = self.base_url.join("/api/v1/points/tx-status")?;
        let query = TxStatusQuery {
            tx_hash: tx_hash.into(),
            chain_id,
        };
        let resp = self.http.get(url).query(&query).send().await?;
        parse_response(resp).await
    }

    /// `GET /api/v1/points/assets`
    pub async fn assets(&self) -> Result<Vec<ChainListing>, ClientError> {
        let url = self.base_url.join("/api/v1/points/assets")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        return Err(ClientError::Api { status, message });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
