use alloy_primitives::Address;
use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Address used on the wire to designate the chain's native currency.
pub const NATIVE_ASSET_ADDRESS: Address = Address::ZERO;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// What the caller wants to deposit, as sent in the `type` field.
///
/// A `token` whose address is [`NATIVE_ASSET_ADDRESS`] is the native currency.
pub enum DepositType {
    Token,
    Nft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositMode {
    /// Deposit in exchange for points at the asset's funding rate.
    #[default]
    Contribute,
    /// Donation, priced at the donation funding rate.
    Donate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Resolved asset kind after looking at the deposit type and address.
pub enum DepositKind {
    Native,
    Erc20,
    Nft,
}

impl DepositKind {
    pub fn resolve(deposit_type: DepositType, asset_address: Address) -> Self {
        match deposit_type {
            DepositType::Nft => DepositKind::Nft,
            DepositType::Token if asset_address == NATIVE_ASSET_ADDRESS => DepositKind::Native,
            DepositType::Token => DepositKind::Erc20,
        }
    }
}

/// A fungible asset accepted on a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetListing {
    pub address: Address,
    pub symbol: CompactString,
    pub decimals: u8,
    pub funding_rate: Decimal,
    pub donation_funding_rate: Decimal,
    pub gas_exempt: bool,
}

/// An NFT collection accepted on a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftListing {
    pub address: Address,
    pub name: CompactString,
    pub funding_rate: Decimal,
    pub donation_funding_rate: Decimal,
}

/// Everything a caller can deposit on one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainListing {
    pub chain_id: u64,
    pub name: CompactString,
    pub native_symbol: CompactString,
    pub default_vault: Address,
    pub assets: Vec<AssetListing>,
    pub nfts: Vec<NftListing>,
}
