//! Application state shared across all request handlers.

use crate::config::file::PriceFeedConfig;
use points_core::config::{ConfigStore, PointsRegistry};
use points_core::framework::DatabaseProcessor;
use points_core::quote::QuoteEngine;
use points_core::settlement::PurchaseBuilder;
use points_core::sources::{
    CachedPriceFeed, ChainReader, CoinGeckoClient, JsonRpcChainReader, PriceFeed, RpcGasEstimator,
};
use points_core::status::StatusResolver;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseProcessor,
    /// Chains, assets and rates (replaced on SIGHUP).
    pub registry: ConfigStore<PointsRegistry>,
    pub quotes: QuoteEngine,
    pub purchases: PurchaseBuilder,
    pub statuses: StatusResolver,
}

impl AppState {
    /// Wire the production collaborators: CoinGecko prices behind a TTL
    /// cache, JSON-RPC chain reads, and the PostgreSQL deposit ledger.
    pub fn new(
        db: PgPool,
        registry: ConfigStore<PointsRegistry>,
        price_feed: &PriceFeedConfig,
    ) -> Self {
        let db = DatabaseProcessor::new(db);
        let coingecko = CoinGeckoClient::new(price_feed.base_url.clone(), price_feed.api_key.clone());
        let cached = CachedPriceFeed::new(
            coingecko.clone(),
            Duration::from_secs(price_feed.cache_ttl_secs),
        );
        cached.spawn_invalidation(registry.subscribe());

        let prices: Arc<dyn PriceFeed> = Arc::new(cached);
        let chain_reader: Arc<dyn ChainReader> = Arc::new(JsonRpcChainReader::new());
        let gas = Arc::new(RpcGasEstimator::new(chain_reader.clone(), prices.clone()));

        Self {
            quotes: QuoteEngine::new(prices, Arc::new(coingecko), gas),
            purchases: PurchaseBuilder::new(chain_reader.clone()),
            statuses: StatusResolver::new(Arc::new(db.clone()), chain_reader),
            db,
            registry,
        }
    }
}
