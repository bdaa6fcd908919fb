//! TOML file configuration structures.
//!
//! These structs directly map to the `points-config.toml` file format.

use alloy_primitives::Address;
use compact_str::CompactString;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub points: PointsConfig,
    #[serde(default)]
    pub price_feed: PriceFeedConfig,
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
    #[serde(default)]
    pub assets: Vec<AssetConfig>,
    #[serde(default)]
    pub nfts: Vec<NftConfig>,
    #[serde(default)]
    pub referral_vaults: HashMap<CompactString, Address>,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointsConfig {
    pub usd_per_point: Decimal,
    pub default_funding_rate: Decimal,
    pub default_donation_funding_rate: Decimal,
    #[serde(default)]
    pub gas_exempt_token: Option<Address>,
    /// Key for quote ids. Changing it invalidates outstanding quote ids.
    pub quote_secret: String,
}

/// Price feed section. Only read at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceFeedConfig {
    #[serde(default = "default_price_feed_url")]
    pub base_url: Url,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_price_feed_url(),
            api_key: None,
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_price_feed_url() -> Url {
    Url::parse(points_core::sources::CoinGeckoClient::DEFAULT_BASE_URL)
        .expect("valid default price feed url")
}

fn default_cache_ttl_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: CompactString,
    pub rpc_url: Url,
    pub native_symbol: CompactString,
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u8,
    pub native_price_id: CompactString,
    #[serde(default)]
    pub native_funding_rate: Option<Decimal>,
    /// Asset platform id used for NFT floor prices.
    pub price_platform: CompactString,
    pub default_vault: Address,
    #[serde(default)]
    pub gas_units: Option<GasUnitsConfig>,
}

fn default_native_decimals() -> u8 {
    18
}

/// Gas units per deposit kind. Missing entries use the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GasUnitsConfig {
    pub native: Option<u64>,
    pub erc20: Option<u64>,
    pub nft: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub chain_id: u64,
    pub address: Address,
    pub symbol: CompactString,
    pub decimals: u8,
    #[serde(default)]
    pub funding_rate: Option<Decimal>,
    #[serde(default)]
    pub donation_funding_rate: Option<Decimal>,
    pub price_id: CompactString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NftConfig {
    pub chain_id: u64,
    pub address: Address,
    pub name: CompactString,
    #[serde(default)]
    pub funding_rate: Option<Decimal>,
    #[serde(default)]
    pub donation_funding_rate: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[points]
usd_per_point = "0.01"
default_funding_rate = "0.7"
default_donation_funding_rate = 0.5
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
erc20 = 90000

[[assets]]
chain_id = 1
address = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
symbol = "USDC"
decimals = 6
funding_rate = "0.9"
price_id = "usd-coin"

[referral_vaults]
alice = "0x3333333333333333333333333333333333333333"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.points.usd_per_point, Decimal::new(1, 2));
        assert_eq!(config.points.default_donation_funding_rate, Decimal::new(5, 1));
        assert_eq!(config.chains[0].native_decimals, 18);
        assert_eq!(
            config.chains[0].gas_units.as_ref().and_then(|g| g.erc20),
            Some(90_000)
        );
        assert_eq!(config.assets[0].symbol, "USDC");
        assert!(config.nfts.is_empty());
        assert_eq!(config.referral_vaults.len(), 1);
        assert_eq!(config.price_feed.cache_ttl_secs, 60);
    }

    #[test]
    fn test_missing_points_section_is_an_error() {
        assert!(toml::from_str::<FileConfig>("[server]\n").is_err());
    }
}
