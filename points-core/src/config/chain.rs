//! Chain configuration.

use alloy_primitives::Address;
use compact_str::CompactString;
use points_sdk::objects::DepositKind;
use rust_decimal::Decimal;
use url::Url;

/// An EVM chain deposits are accepted on.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Human-readable chain name.
    pub name: CompactString,
    /// JSON-RPC endpoint used for allowance, receipt and gas price reads.
    pub rpc_url: Url,
    pub native_symbol: CompactString,
    pub native_decimals: u8,
    /// Price-feed id of the native currency (e.g. `ethereum`).
    pub native_price_id: CompactString,
    /// Funding rate for native deposits, falling back to the global default.
    pub native_funding_rate: Option<Decimal>,
    /// Price-feed platform id used for NFT floor lookups (e.g. `ethereum`).
    pub price_platform: CompactString,
    /// Protocol vault receiving deposits when no referral or recipient applies.
    pub default_vault: Address,
    pub gas_units: GasUnits,
}

/// Gas consumed by a deposit transaction, per asset kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasUnits {
    pub native: u64,
    pub erc20: u64,
    pub nft: u64,
}

impl GasUnits {
    pub fn for_kind(&self, kind: DepositKind) -> u64 {
        match kind {
            DepositKind::Native => self.native,
            DepositKind::Erc20 => self.erc20,
            DepositKind::Nft => self.nft,
        }
    }
}

impl Default for GasUnits {
    fn default() -> Self {
        Self {
            native: 21_000,
            erc20: 120_000,
            nft: 180_000,
        }
    }
}
