//! CoinGecko-compatible price feed.

use super::{NftPriceFeed, PriceError, PriceFeed};
use crate::config::ChainConfig;
use alloy_primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Price feed backed by the CoinGecko REST API (or any server speaking it).
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: Url,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl CoinGeckoClient {
    pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3/";
    const API_KEY_HEADER: &str = "x-cg-pro-api-key";

    /// Create a client rooted at `base_url`. The URL should end with `/` so
    /// endpoint paths are joined beneath it.
    pub fn new(base_url: Url, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<reqwest::Response>, PriceError> {
        let url = self.base_url.join(path)?;
        let mut request = self.http_client.get(url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header(Self::API_KEY_HEADER, key);
        }
        let response = request.send().await?;

        if has_body(response.status(), retry_after(&response))? {
            Ok(Some(response))
        } else {
            Ok(None)
        }
    }
}

/// Seconds to wait after a 429 that carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 30;

/// Map a response status to whether its body holds a price.
///
/// 404 means the feed does not know the asset, which is a missing price
/// rather than an error.
fn has_body(status: reqwest::StatusCode, retry_after: Option<u64>) -> Result<bool, PriceError> {
    match status {
        reqwest::StatusCode::TOO_MANY_REQUESTS => Err(PriceError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        }),
        reqwest::StatusCode::NOT_FOUND => Ok(false),
        status if !status.is_success() => Err(PriceError::Api {
            status: status.as_u16(),
        }),
        _ => Ok(true),
    }
}

/// `/simple/price` body: `{"ethereum": {"usd": 3012.55}}`. Unknown ids are
/// left out of the map.
type SimplePriceResponse = HashMap<String, HashMap<String, Decimal>>;

fn usd_price(body: &SimplePriceResponse, price_id: &str) -> Option<Decimal> {
    body.get(price_id).and_then(|p| p.get("usd")).copied()
}

#[async_trait]
impl PriceFeed for CoinGeckoClient {
    async fn price_usd(&self, price_id: &str) -> Result<Option<Decimal>, PriceError> {
        let Some(response) = self
            .get("simple/price", &[("ids", price_id), ("vs_currencies", "usd")])
            .await?
        else {
            return Ok(None);
        };
        let body: SimplePriceResponse = response.json().await?;
        let price = usd_price(&body, price_id);
        debug!(price_id, price = ?price, "Fetched token price");
        Ok(price)
    }
}

#[derive(Debug, serde::Deserialize)]
struct NftCollectionResponse {
    #[serde(default)]
    floor_price: Option<FloorPrice>,
}

#[derive(Debug, serde::Deserialize)]
struct FloorPrice {
    #[serde(default)]
    usd: Option<Decimal>,
}

#[async_trait]
impl NftPriceFeed for CoinGeckoClient {
    async fn floor_price_usd(
        &self,
        chain: &ChainConfig,
        collection: Address,
    ) -> Result<Option<Decimal>, PriceError> {
        let path = format!("nfts/{}/contract/{}", chain.price_platform, collection);
        let Some(response) = self.get(&path, &[]).await? else {
            return Ok(None);
        };
        let body: NftCollectionResponse = response.json().await?;
        let price = body.floor_price.and_then(|f| f.usd);
        debug!(chain_id = chain.chain_id, %collection, price = ?price, "Fetched NFT floor price");
        Ok(price)
    }
}

fn retry_after(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_simple_price_body() {
        let body: SimplePriceResponse =
            serde_json::from_str(r#"{"ethereum": {"usd": 3012.55}}"#).unwrap();
        assert_eq!(usd_price(&body, "ethereum"), Some(Decimal::new(301_255, 2)));
        assert_eq!(usd_price(&body, "bitcoin"), None);
    }

    #[test]
    fn test_simple_price_unknown_id_is_none() {
        let body: SimplePriceResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(usd_price(&body, "not-a-coin"), None);

        let body: SimplePriceResponse = serde_json::from_str(r#"{"not-a-coin": {}}"#).unwrap();
        assert_eq!(usd_price(&body, "not-a-coin"), None);
    }

    #[test]
    fn test_status_mapping() {
        assert!(has_body(StatusCode::OK, None).unwrap());
        assert!(!has_body(StatusCode::NOT_FOUND, None).unwrap());
        assert!(matches!(
            has_body(StatusCode::INTERNAL_SERVER_ERROR, None),
            Err(PriceError::Api { status: 500 })
        ));
    }

    #[test]
    fn test_rate_limit_uses_retry_after() {
        assert!(matches!(
            has_body(StatusCode::TOO_MANY_REQUESTS, Some(12)),
            Err(PriceError::RateLimited {
                retry_after_secs: 12
            })
        ));
        assert!(matches!(
            has_body(StatusCode::TOO_MANY_REQUESTS, None),
            Err(PriceError::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS
            })
        ));
    }

    #[test]
    fn test_nft_response_without_usd_floor() {
        let body: NftCollectionResponse =
            serde_json::from_str(r#"{"floor_price": {"native_currency": 42.5}}"#).unwrap();
        assert_eq!(body.floor_price.and_then(|f| f.usd), None);
    }

    #[test]
    fn test_nft_response_with_usd_floor() {
        let body: NftCollectionResponse =
            serde_json::from_str(r#"{"floor_price": {"native_currency": 42.5, "usd": 127500}}"#)
                .unwrap();
        assert_eq!(
            body.floor_price.and_then(|f| f.usd),
            Some(Decimal::new(127500, 0))
        );
    }
}
