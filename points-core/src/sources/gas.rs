//! Deposit gas cost estimation.

use super::{ChainReader, GasError, GasEstimator, PriceFeed};
use crate::config::ChainConfig;
use async_trait::async_trait;
use points_sdk::objects::DepositKind;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Decimal places kept in a USD gas estimate.
const GAS_USD_SCALE: u32 = 6;

/// Prices a deposit as `gas_units(kind) * gas_price * native_usd`.
pub struct RpcGasEstimator {
    chain_reader: Arc<dyn ChainReader>,
    prices: Arc<dyn PriceFeed>,
}

impl RpcGasEstimator {
    pub fn new(chain_reader: Arc<dyn ChainReader>, prices: Arc<dyn PriceFeed>) -> Self {
        Self {
            chain_reader,
            prices,
        }
    }
}

#[async_trait]
impl GasEstimator for RpcGasEstimator {
    async fn estimate_gas_usd(
        &self,
        chain: &ChainConfig,
        kind: DepositKind,
    ) -> Result<Decimal, GasError> {
        let units = chain.gas_units.for_kind(kind);
        let gas_price = self.chain_reader.gas_price_wei(chain).await?;

        let native_usd = self
            .prices
            .price_usd(&chain.native_price_id)
            .await?
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| GasError::NativePriceUnavailable(chain.native_symbol.clone()))?;

        let usd = gas_cost_usd(units, gas_price, chain.native_decimals, native_usd)?;
        debug!(
            chain_id = chain.chain_id,
            kind = ?kind,
            units,
            gas_price,
            %usd,
            "Estimated deposit gas"
        );
        Ok(usd)
    }
}

/// `units * gas_price_wei` converted to whole native units, priced in USD.
pub(crate) fn gas_cost_usd(
    units: u64,
    gas_price_wei: u128,
    native_decimals: u8,
    native_usd: Decimal,
) -> Result<Decimal, GasError> {
    let wei = u128::from(units)
        .checked_mul(gas_price_wei)
        .and_then(|w| i128::try_from(w).ok())
        .ok_or(GasError::Overflow)?;
    let native = Decimal::try_from_i128_with_scale(wei, u32::from(native_decimals))
        .map_err(|_| GasError::Overflow)?;
    native
        .checked_mul(native_usd)
        .map(|usd| usd.round_dp(GAS_USD_SCALE))
        .ok_or(GasError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::{MAINNET, registry};
    use crate::sources::fakes::{FakeChainReader, FakePrices};

    #[test]
    fn test_gas_cost_usd() {
        // 21000 gas at 20 gwei = 0.00042 ETH, at $3000 = $1.26
        let usd = gas_cost_usd(21_000, 20_000_000_000, 18, Decimal::new(3000, 0)).unwrap();
        assert_eq!(usd, Decimal::new(126, 2));
    }

    #[test]
    fn test_gas_cost_rounds_to_micro_dollars() {
        // 1 wei at $1 is far below the kept precision
        let usd = gas_cost_usd(1, 1, 18, Decimal::ONE).unwrap();
        assert_eq!(usd, Decimal::ZERO);
    }

    #[test]
    fn test_gas_cost_overflow() {
        assert!(matches!(
            gas_cost_usd(u64::MAX, u128::MAX, 18, Decimal::ONE),
            Err(GasError::Overflow)
        ));
    }

    #[tokio::test]
    async fn test_estimator_uses_kind_units_and_native_price() {
        let registry = registry();
        let chain = registry.chain(MAINNET).unwrap();
        let estimator = RpcGasEstimator::new(
            Arc::new(FakeChainReader {
                gas_price_wei: 20_000_000_000,
                ..Default::default()
            }),
            Arc::new(FakePrices::with(&[("ethereum", Decimal::new(3000, 0))])),
        );
        let native = estimator
            .estimate_gas_usd(chain, DepositKind::Native)
            .await
            .unwrap();
        assert_eq!(native, Decimal::new(126, 2));
        // 120000 gas at 20 gwei = 0.0024 ETH
        let erc20 = estimator
            .estimate_gas_usd(chain, DepositKind::Erc20)
            .await
            .unwrap();
        assert_eq!(erc20, Decimal::new(72, 1));
    }

    #[tokio::test]
    async fn test_estimator_requires_native_price() {
        let registry = registry();
        let chain = registry.chain(MAINNET).unwrap();
        let estimator = RpcGasEstimator::new(
            Arc::new(FakeChainReader::default()),
            Arc::new(FakePrices::default()),
        );
        assert!(matches!(
            estimator.estimate_gas_usd(chain, DepositKind::Nft).await,
            Err(GasError::NativePriceUnavailable(ref s)) if s == "ETH"
        ));
    }
}
