//! Configuration types for the points service.
//!
//! These types represent the validated runtime configuration. Loading and
//! parsing the config file is handled by the server crate.

mod asset;
mod chain;
mod config_store;
mod points;

pub use asset::{AssetConfig, NftConfig};
pub use chain::{ChainConfig, GasUnits};
pub use config_store::{ConfigStore, ConfigWatcher};
pub use points::PointsConfig;

use alloy_primitives::Address;
use compact_str::CompactString;
use points_sdk::objects::assets::NATIVE_ASSET_ADDRESS;
use points_sdk::objects::{AssetListing, ChainListing, NftListing};
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

/// Everything the quote, purchase and status paths need to know.
///
/// The number of chains and assets is small, so lookups scan `Vec`s.
#[derive(Debug, Clone)]
pub struct PointsRegistry {
    pub points: PointsConfig,
    pub chains: Vec<ChainConfig>,
    pub assets: Vec<AssetConfig>,
    pub nfts: Vec<NftConfig>,
    /// Referral code to vault address.
    pub referral_vaults: HashMap<CompactString, Address>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("chain {0} is configured more than once")]
    DuplicateChain(u64),
    #[error("{what} {address} references unknown chain {chain_id}")]
    UnknownChain {
        what: &'static str,
        address: Address,
        chain_id: u64,
    },
    #[error("{what} {address} on chain {chain_id} is configured more than once")]
    DuplicateAsset {
        what: &'static str,
        address: Address,
        chain_id: u64,
    },
    #[error("funding rate {rate} for {context} must be in (0, 1]")]
    InvalidFundingRate { rate: Decimal, context: String },
    #[error("usd_per_point must be positive")]
    InvalidPointRate,
    #[error("the native asset address cannot be listed as a token")]
    NativeListedAsToken,
    #[error("chain {0} declares more than 28 native decimals")]
    InvalidNativeDecimals(u64),
}

impl PointsRegistry {
    pub fn chain(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.chain_id == chain_id)
    }

    /// Look up a fungible asset. The zero address resolves to the chain's
    /// native currency.
    pub fn asset(&self, chain: &ChainConfig, address: Address) -> Option<AssetConfig> {
        if address == NATIVE_ASSET_ADDRESS {
            return Some(AssetConfig {
                chain_id: chain.chain_id,
                address,
                symbol: chain.native_symbol.clone(),
                decimals: chain.native_decimals,
                funding_rate: chain.native_funding_rate,
                donation_funding_rate: None,
                price_id: chain.native_price_id.clone(),
            });
        }
        self.assets
            .iter()
            .find(|a| a.chain_id == chain.chain_id && a.address == address)
            .cloned()
    }

    pub fn nft(&self, chain_id: u64, address: Address) -> Option<&NftConfig> {
        self.nfts
            .iter()
            .find(|n| n.chain_id == chain_id && n.address == address)
    }

    /// Vault mapped to a referral code, if any. Codes are matched after
    /// trimming surrounding whitespace.
    pub fn referral_vault(&self, code: &str) -> Option<Address> {
        self.referral_vaults.get(code.trim()).copied()
    }

    /// Check cross references and rate bounds.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.points.usd_per_point <= Decimal::ZERO {
            return Err(RegistryError::InvalidPointRate);
        }
        check_rate(self.points.default_funding_rate, "default")?;
        check_rate(
            self.points.default_donation_funding_rate,
            "default donation",
        )?;

        for (i, chain) in self.chains.iter().enumerate() {
            if self.chains[..i].iter().any(|c| c.chain_id == chain.chain_id) {
                return Err(RegistryError::DuplicateChain(chain.chain_id));
            }
            if chain.native_decimals > 28 {
                return Err(RegistryError::InvalidNativeDecimals(chain.chain_id));
            }
            if let Some(rate) = chain.native_funding_rate {
                check_rate(rate, &format!("native asset of chain {}", chain.chain_id))?;
            }
        }

        for (i, asset) in self.assets.iter().enumerate() {
            if asset.address == NATIVE_ASSET_ADDRESS {
                return Err(RegistryError::NativeListedAsToken);
            }
            self.check_entry("asset", asset.address, asset.chain_id)?;
            if self.assets[..i]
                .iter()
                .any(|a| a.chain_id == asset.chain_id && a.address == asset.address)
            {
                return Err(RegistryError::DuplicateAsset {
                    what: "asset",
                    address: asset.address,
                    chain_id: asset.chain_id,
                });
            }
            for rate in [asset.funding_rate, asset.donation_funding_rate]
                .into_iter()
                .flatten()
            {
                check_rate(rate, &format!("asset {}", asset.symbol))?;
            }
        }

        for (i, nft) in self.nfts.iter().enumerate() {
            self.check_entry("nft", nft.address, nft.chain_id)?;
            if self.nfts[..i]
                .iter()
                .any(|n| n.chain_id == nft.chain_id && n.address == nft.address)
            {
                return Err(RegistryError::DuplicateAsset {
                    what: "nft",
                    address: nft.address,
                    chain_id: nft.chain_id,
                });
            }
            for rate in [nft.funding_rate, nft.donation_funding_rate]
                .into_iter()
                .flatten()
            {
                check_rate(rate, &format!("nft {}", nft.name))?;
            }
        }
        Ok(())
    }

    /// Public view of what can be deposited where, with effective rates.
    pub fn listings(&self) -> Vec<ChainListing> {
        let points = &self.points;
        self.chains
            .iter()
            .map(|chain| {
                let native = self.asset(chain, NATIVE_ASSET_ADDRESS);
                let assets = native
                    .into_iter()
                    .chain(
                        self.assets
                            .iter()
                            .filter(|a| a.chain_id == chain.chain_id)
                            .cloned(),
                    )
                    .map(|a| AssetListing {
                        address: a.address,
                        gas_exempt: points.is_gas_exempt(a.address),
                        funding_rate: a.funding_rate.unwrap_or(points.default_funding_rate),
                        donation_funding_rate: a
                            .donation_funding_rate
                            .unwrap_or(points.default_donation_funding_rate),
                        symbol: a.symbol,
                        decimals: a.decimals,
                    })
                    .collect();
                let nfts = self
                    .nfts
                    .iter()
                    .filter(|n| n.chain_id == chain.chain_id)
                    .map(|n| NftListing {
                        address: n.address,
                        name: n.name.clone(),
                        funding_rate: n.funding_rate.unwrap_or(points.default_funding_rate),
                        donation_funding_rate: n
                            .donation_funding_rate
                            .unwrap_or(points.default_donation_funding_rate),
                    })
                    .collect();
                ChainListing {
                    chain_id: chain.chain_id,
                    name: chain.name.clone(),
                    native_symbol: chain.native_symbol.clone(),
                    default_vault: chain.default_vault,
                    assets,
                    nfts,
                }
            })
            .collect()
    }

    fn check_entry(
        &self,
        what: &'static str,
        address: Address,
        chain_id: u64,
    ) -> Result<(), RegistryError> {
        if self.chain(chain_id).is_none() {
            return Err(RegistryError::UnknownChain {
                what,
                address,
                chain_id,
            });
        }
        Ok(())
    }
}

fn check_rate(rate: Decimal, context: &str) -> Result<(), RegistryError> {
    if rate <= Decimal::ZERO || rate > Decimal::ONE {
        return Err(RegistryError::InvalidFundingRate {
            rate,
            context: context.to_string(),
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_fixture_is_valid() {
        assert_eq!(registry().validate(), Ok(()));
    }

    #[test]
    fn test_native_asset_is_synthesized() {
        let registry = registry();
        let chain = registry.chain(MAINNET).unwrap();
        let native = registry.asset(chain, NATIVE_ASSET_ADDRESS).unwrap();
        assert_eq!(native.symbol, "ETH");
        assert_eq!(native.decimals, 18);
        assert!(registry.asset(chain, REFERRAL_VAULT).is_none());
    }

    #[test]
    fn test_rejects_out_of_range_rate() {
        let mut registry = registry();
        registry.assets[0].funding_rate = Some(Decimal::new(11, 1));
        assert!(matches!(
            registry.validate(),
            Err(RegistryError::InvalidFundingRate { .. })
        ));
    }

    #[test]
    fn test_rejects_asset_on_unknown_chain() {
        let mut registry = registry();
        registry.nfts[0].chain_id = 10;
        assert!(matches!(
            registry.validate(),
            Err(RegistryError::UnknownChain { chain_id: 10, .. })
        ));
    }

    #[test]
    fn test_referral_code_is_trimmed() {
        let registry = registry();
        assert_eq!(registry.referral_vault(" alice "), Some(REFERRAL_VAULT));
        assert_eq!(registry.referral_vault("bob"), None);
    }

    #[test]
    fn test_listings_apply_defaults() {
        let listings = registry().listings();
        assert_eq!(listings.len(), 1);
        let chain = &listings[0];
        assert_eq!(chain.assets.len(), 3);
        assert_eq!(chain.assets[0].funding_rate, Decimal::new(7, 1));
        assert!(chain.assets.iter().any(|a| a.gas_exempt));
        assert_eq!(chain.nfts[0].donation_funding_rate, Decimal::new(5, 1));
    }
}
