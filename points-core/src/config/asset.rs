//! Accepted asset configuration.

use alloy_primitives::Address;
use compact_str::CompactString;
use rust_decimal::Decimal;

/// A fungible asset accepted on one chain.
///
/// The native currency is not listed here; see
/// [`PointsRegistry::asset`](super::PointsRegistry::asset).
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub chain_id: u64,
    pub address: Address,
    pub symbol: CompactString,
    pub decimals: u8,
    pub funding_rate: Option<Decimal>,
    pub donation_funding_rate: Option<Decimal>,
    /// Price-feed id (e.g. `usd-coin`).
    pub price_id: CompactString,
}

/// An NFT collection accepted on one chain.
#[derive(Debug, Clone)]
pub struct NftConfig {
    pub chain_id: u64,
    pub address: Address,
    pub name: CompactString,
    pub funding_rate: Option<Decimal>,
    pub donation_funding_rate: Option<Decimal>,
}
