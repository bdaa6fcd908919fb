//! Configuration module for points-server.
//!
//! Handles loading configuration from the TOML file and CLI arguments and
//! turning it into the validated [`PointsRegistry`] the handlers use.

pub mod file;

use crate::config::file::{FileConfig, GasUnitsConfig, PriceFeedConfig};
use points_core::config::{
    AssetConfig, ChainConfig, GasUnits, NftConfig, PointsConfig, PointsRegistry, RegistryError,
};
use alloy_primitives::Address;
use compact_str::CompactString;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("invalid registry: {0}")]
    RegistryError(#[from] RegistryError),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub price_feed: PriceFeedConfig,
    pub registry: PointsRegistry,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Read, parse and validate the configuration file.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        let registry = build_registry(&file_config)?;
        Ok(LoadedConfig {
            listen: file_config.server.listen,
            price_feed: file_config.price_feed,
            registry,
        })
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

/// Convert the file sections into a validated registry.
pub fn build_registry(file: &FileConfig) -> Result<PointsRegistry, ConfigError> {
    if file.points.quote_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "points.quote_secret must not be empty".to_string(),
        ));
    }
    if file.chains.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one chain must be configured".to_string(),
        ));
    }

    let registry = PointsRegistry {
        points: PointsConfig {
            usd_per_point: file.points.usd_per_point,
            default_funding_rate: file.points.default_funding_rate,
            default_donation_funding_rate: file.points.default_donation_funding_rate,
            gas_exempt_token: file.points.gas_exempt_token,
            quote_secret: file
                .points
                .quote_secret
                .as_bytes()
                .to_vec()
                .into_boxed_slice(),
        },
        chains: file
            .chains
            .iter()
            .map(|c| ChainConfig {
                chain_id: c.chain_id,
                name: c.name.clone(),
                rpc_url: c.rpc_url.clone(),
                native_symbol: c.native_symbol.clone(),
                native_decimals: c.native_decimals,
                native_price_id: c.native_price_id.clone(),
                native_funding_rate: c.native_funding_rate,
                price_platform: c.price_platform.clone(),
                default_vault: c.default_vault,
                gas_units: convert_gas_units(c.gas_units.as_ref()),
            })
            .collect(),
        assets: file
            .assets
            .iter()
            .map(|a| AssetConfig {
                chain_id: a.chain_id,
                address: a.address,
                symbol: a.symbol.clone(),
                decimals: a.decimals,
                funding_rate: a.funding_rate,
                donation_funding_rate: a.donation_funding_rate,
                price_id: a.price_id.clone(),
            })
            .collect(),
        nfts: file
            .nfts
            .iter()
            .map(|n| NftConfig {
                chain_id: n.chain_id,
                address: n.address,
                name: n.name.clone(),
                funding_rate: n.funding_rate,
                donation_funding_rate: n.donation_funding_rate,
            })
            .collect(),
        referral_vaults: trim_referral_codes(&file.referral_vaults)?,
    };
    registry.validate()?;
    Ok(registry)
}

/// Lookups trim the code, so two keys that trim to the same code would
/// shadow each other.
fn trim_referral_codes(
    codes: &HashMap<CompactString, Address>,
) -> Result<HashMap<CompactString, Address>, ConfigError> {
    let mut trimmed = HashMap::with_capacity(codes.len());
    for (code, vault) in codes {
        let key = code.trim();
        if key.is_empty() {
            return Err(ConfigError::ValidationError(
                "referral code must not be blank".to_string(),
            ));
        }
        if trimmed.insert(CompactString::from(key), *vault).is_some() {
            return Err(ConfigError::ValidationError(format!(
                "duplicate referral code {key:?}"
            )));
        }
    }
    Ok(trimmed)
}

fn convert_gas_units(units: Option<&GasUnitsConfig>) -> GasUnits {
    let defaults = GasUnits::default();
    match units {
        None => defaults,
        Some(u) => GasUnits {
            native: u.native.unwrap_or(defaults.native),
            erc20: u.erc20.unwrap_or(defaults.erc20),
            nft: u.nft.unwrap_or(defaults.nft),
        },
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[points]
usd_per_point = "0.01"
default_funding_rate = "0.7"
default_donation_funding_rate = "0.5"
quote_secret = "secret"

[[chains]]
chain_id = 1
name = "Ethereum"
rpc_url = "http://localhost:8545"
native_symbol = "ETH"
native_price_id = "ethereum"
price_platform = "ethereum"
default_vault = "0x2222222222222222222222222222222222222222"

[chains.gas_units]
nft = 200000

[[nfts]]
chain_id = 1
address = "0xb47e3cd837ddf8e4c57f05d70ab865de6e193bbb"
name = "CryptoPunks"

[referral_vaults]
" bob " = "0x3333333333333333333333333333333333333333"
"#;

    fn parse(s: &str) -> FileConfig {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn test_build_registry() {
        let registry = build_registry(&parse(CONFIG)).unwrap();
        let chain = registry.chain(1).unwrap();
        assert_eq!(chain.gas_units.nft, 200_000);
        assert_eq!(chain.gas_units.native, 21_000);
        assert_eq!(registry.nfts.len(), 1);
        assert!(registry.referral_vault("bob").is_some());
        assert_eq!(registry.points.quote_secret_bytes(), b"secret");
    }

    #[test]
    fn test_rejects_invalid_rate() {
        let config = CONFIG.replace(
            "default_funding_rate = \"0.7\"",
            "default_funding_rate = \"1.5\"",
        );
        assert!(matches!(
            build_registry(&parse(&config)),
            Err(ConfigError::RegistryError(RegistryError::InvalidFundingRate { .. }))
        ));
    }

    #[test]
    fn test_rejects_referral_codes_equal_after_trim() {
        let config = CONFIG.replace(
            "\" bob \" = ",
            "\"bob\" = \"0x4444444444444444444444444444444444444444\"\n\" bob \" = ",
        );
        assert_eq!(parse(&config).referral_vaults.len(), 2);
        assert!(matches!(
            build_registry(&parse(&config)),
            Err(ConfigError::ValidationError(ref msg)) if msg.contains("bob")
        ));
    }

    #[test]
    fn test_rejects_blank_referral_code() {
        let config = CONFIG.replace("\" bob \" = ", "\"  \" = ");
        assert!(matches!(
            build_registry(&parse(&config)),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_empty_secret() {
        let config = CONFIG.replace("quote_secret = \"secret\"", "quote_secret = \"\"");
        assert!(matches!(
            build_registry(&parse(&config)),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_loader_applies_listen_override() {
        let path = std::env::temp_dir().join(format!(
            "points-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, CONFIG).unwrap();
        let listen: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        let loaded = ConfigLoader::new(&path, Some(listen)).load().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.listen, listen);
        assert_eq!(loaded.registry.chains.len(), 1);
    }
}
