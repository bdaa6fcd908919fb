//! Resolution of the `(chainId, type, assetAddress)` triple shared by quoting
//! and purchasing.
//!
//! Everything here is a pure registry lookup, so requests naming an unknown
//! chain or asset are turned away before any collaborator is called.

use crate::config::{AssetConfig, ChainConfig, NftConfig, PointsConfig, PointsRegistry};
use alloy_primitives::Address;
use compact_str::CompactString;
use points_sdk::objects::{DepositKind, DepositMode, DepositType};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),

    #[error("unsupported {kind:?} asset {address} on chain {chain_id}")]
    UnsupportedAsset {
        kind: DepositKind,
        address: Address,
        chain_id: u64,
    },
}

/// What is being deposited.
#[derive(Debug, Clone)]
pub enum TargetAsset {
    /// Native currency or an ERC-20 token.
    Fungible(AssetConfig),
    Nft(NftConfig),
}

/// A validated deposit target.
#[derive(Debug, Clone)]
pub struct DepositTarget {
    pub chain: ChainConfig,
    pub kind: DepositKind,
    pub asset: TargetAsset,
}

impl DepositTarget {
    pub fn resolve(
        registry: &PointsRegistry,
        chain_id: u64,
        deposit_type: DepositType,
        address: Address,
    ) -> Result<Self, TargetError> {
        let chain = registry
            .chain(chain_id)
            .ok_or(TargetError::UnsupportedChain(chain_id))?;
        let kind = DepositKind::resolve(deposit_type, address);
        let unsupported = TargetError::UnsupportedAsset {
            kind,
            address,
            chain_id,
        };

        let asset = match kind {
            DepositKind::Native | DepositKind::Erc20 => registry
                .asset(chain, address)
                .map(TargetAsset::Fungible)
                .ok_or(unsupported)?,
            DepositKind::Nft => registry
                .nft(chain_id, address)
                .cloned()
                .map(TargetAsset::Nft)
                .ok_or(unsupported)?,
        };

        Ok(Self {
            chain: chain.clone(),
            kind,
            asset,
        })
    }

    pub fn address(&self) -> Address {
        match &self.asset {
            TargetAsset::Fungible(a) => a.address,
            TargetAsset::Nft(n) => n.address,
        }
    }

    /// Symbol for fungible assets, collection name for NFTs.
    pub fn label(&self) -> CompactString {
        match &self.asset {
            TargetAsset::Fungible(a) => a.symbol.clone(),
            TargetAsset::Nft(n) => n.name.clone(),
        }
    }

    /// Funding rate for `mode`.
    ///
    /// Donations use the asset's donation rate, else the global donation
    /// rate. Contributions use the asset's rate, else the global default.
    pub fn funding_rate(&self, points: &PointsConfig, mode: DepositMode) -> Decimal {
        let (configured, donation) = match &self.asset {
            TargetAsset::Fungible(a) => (a.funding_rate, a.donation_funding_rate),
            TargetAsset::Nft(n) => (n.funding_rate, n.donation_funding_rate),
        };
        match mode {
            DepositMode::Donate => donation.unwrap_or(points.default_donation_funding_rate),
            DepositMode::Contribute => configured.unwrap_or(points.default_funding_rate),
        }
    }
}
