//! `/quote` request and response types.

use alloy_primitives::Address;
use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::assets::{DepositMode, DepositType};

/// Ask for the points a deposit would earn.
///
/// Tokens carry an `amount` in human units (`"1.5"` ETH, not wei). NFTs are
/// always priced as a single item at the collection floor, so `tokenId` is
/// informational here and only required when building the purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    #[serde(rename = "type")]
    pub deposit_type: DepositType,
    pub asset_address: Address,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub token_id: Option<String>,
    pub chain_id: u64,
    #[serde(default)]
    pub mode: DepositMode,
}

/// A priced deposit. Nothing about it is stored server side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    /// Deterministic fingerprint of the fields below.
    pub quote_id: String,
    #[serde(rename = "type")]
    pub deposit_type: DepositType,
    pub asset_address: Address,
    pub chain_id: u64,
    pub mode: DepositMode,
    pub symbol: CompactString,
    pub asset_amount: Decimal,
    pub price_usd: Decimal,
    pub funding_rate: Decimal,
    pub gross_usd: Decimal,
    pub net_after_funding_rate: Decimal,
    pub estimated_gas_usd: Decimal,
    pub user_receives_usd: Decimal,
    pub points_credited: u64,
}
