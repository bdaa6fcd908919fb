//! External collaborators of the quote, purchase and status paths.
//!
//! Each collaborator is an async trait so the engines can be driven by fakes
//! in tests. The production implementations talk HTTP through `reqwest`:
//!
//! - [`CoinGeckoClient`]: token prices and NFT floor prices
//! - [`CachedPriceFeed`]: TTL cache in front of any [`PriceFeed`]
//! - [`JsonRpcChainReader`]: allowance, approval, receipt and gas price reads
//! - [`RpcGasEstimator`]: deposit gas cost in USD
//!
//! The ledger lookup lives with its row type in
//! [`entities::ledger`](crate::entities::ledger).

mod cache;
mod coingecko;
#[cfg(test)]
pub(crate) mod fakes;
mod gas;
mod rpc;

pub use cache::CachedPriceFeed;
pub use coingecko::CoinGeckoClient;
pub use gas::RpcGasEstimator;
pub use rpc::JsonRpcChainReader;

use crate::config::ChainConfig;
use crate::entities::ledger::LedgerEntry;
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use compact_str::CompactString;
use points_sdk::objects::DepositKind;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from a price feed.
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("price request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rate limited by price feed, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("price feed returned status {status}")]
    Api { status: u16 },

    #[error("invalid price feed url: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors from a chain JSON-RPC endpoint.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC response decoding error: {0}")]
    Decode(String),
}

/// Errors from gas estimation.
#[derive(Debug, Error)]
pub enum GasError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error("no usable price for native currency {0}")]
    NativePriceUnavailable(CompactString),

    #[error("gas cost overflows")]
    Overflow,
}

/// Errors from the deposit ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("ledger row {tx_hash} is malformed: {reason}")]
    Malformed { tx_hash: String, reason: String },
}

/// USD prices for fungible assets.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Price of one whole unit of the asset with feed id `price_id`.
    ///
    /// `Ok(None)` means the feed answered but has no price for it.
    async fn price_usd(&self, price_id: &str) -> Result<Option<Decimal>, PriceError>;
}

/// USD floor prices for NFT collections.
#[async_trait]
pub trait NftPriceFeed: Send + Sync {
    async fn floor_price_usd(
        &self,
        chain: &ChainConfig,
        collection: Address,
    ) -> Result<Option<Decimal>, PriceError>;
}

/// Read-only view of an EVM chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// ERC-20 `allowance(owner, spender)` in base units.
    async fn erc20_allowance(
        &self,
        chain: &ChainConfig,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError>;

    /// ERC-721 `isApprovedForAll(owner, operator)`.
    async fn is_approved_for_all(
        &self,
        chain: &ChainConfig,
        collection: Address,
        owner: Address,
        operator: Address,
    ) -> Result<bool, ChainError>;

    /// Whether the chain has a receipt for the transaction.
    async fn has_receipt(&self, chain: &ChainConfig, tx_hash: B256) -> Result<bool, ChainError>;

    async fn gas_price_wei(&self, chain: &ChainConfig) -> Result<u128, ChainError>;
}

/// Gas cost of a deposit, in USD.
#[async_trait]
pub trait GasEstimator: Send + Sync {
    async fn estimate_gas_usd(
        &self,
        chain: &ChainConfig,
        kind: DepositKind,
    ) -> Result<Decimal, GasError>;
}

/// The off-chain deposit ledger written by the indexer.
#[async_trait]
pub trait DepositLedger: Send + Sync {
    async fn find_by_tx_hash(
        &self,
        chain_id: u64,
        tx_hash: B256,
    ) -> Result<Option<LedgerEntry>, LedgerError>;
}
