//! Points quoting.
//!
//! A quote walks an asset through four prices: the asset's USD value, that
//! value after the funding rate, the remainder after the deposit's gas cost,
//! and finally the points it buys. Collaborators supply the USD price and the
//! gas estimate; the arithmetic itself lives in [`math`].

pub mod math;

use crate::config::PointsRegistry;
use crate::deposit::{DepositTarget, TargetAsset, TargetError};
use crate::settlement::units::{UnitsError, to_base_units};
use crate::sources::{GasError, GasEstimator, NftPriceFeed, PriceError, PriceFeed};
use math::{QuoteInputs, QuoteOverflow, compute_quote};
use points_sdk::objects::{QuoteRequest, QuoteResponse};
use points_sdk::quote_id::derive_quote_id;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] UnitsError),

    #[error("no usable USD price for {0}")]
    PriceUnavailable(compact_str::CompactString),

    #[error("price feed error: {0}")]
    Price(#[from] PriceError),

    #[error("gas estimation error: {0}")]
    Gas(#[from] GasError),

    #[error(transparent)]
    Overflow(#[from] QuoteOverflow),

    #[error("failed to derive quote id: {0}")]
    QuoteId(#[from] serde_json::Error),
}

/// Turns quote requests into priced quotes. Holds no per-quote state.
#[derive(Clone)]
pub struct QuoteEngine {
    prices: Arc<dyn PriceFeed>,
    nft_prices: Arc<dyn NftPriceFeed>,
    gas: Arc<dyn GasEstimator>,
}

impl QuoteEngine {
    pub fn new(
        prices: Arc<dyn PriceFeed>,
        nft_prices: Arc<dyn NftPriceFeed>,
        gas: Arc<dyn GasEstimator>,
    ) -> Self {
        Self {
            prices,
            nft_prices,
            gas,
        }
    }

    #[tracing::instrument(skip_all, err, fields(chain_id = request.chain_id, asset = %request.asset_address))]
    pub async fn quote(
        &self,
        registry: &PointsRegistry,
        request: &QuoteRequest,
    ) -> Result<QuoteResponse, QuoteError> {
        let points = &registry.points;
        let target = DepositTarget::resolve(
            registry,
            request.chain_id,
            request.deposit_type,
            request.asset_address,
        )?;

        // The amount must be settleable as quoted, so it has to fit the
        // asset's decimals before any price is fetched.
        let asset_amount = match &target.asset {
            TargetAsset::Fungible(asset) => {
                let amount = request.amount.ok_or(UnitsError::NotPositive)?;
                to_base_units(amount, asset.decimals)?;
                amount
            }
            TargetAsset::Nft(_) => Decimal::ONE,
        };
        let funding_rate = target.funding_rate(points, request.mode);

        let price_usd = match &target.asset {
            TargetAsset::Fungible(asset) => self.prices.price_usd(&asset.price_id).await?,
            TargetAsset::Nft(nft) => {
                self.nft_prices
                    .floor_price_usd(&target.chain, nft.address)
                    .await?
            }
        }
        .filter(|p| *p > Decimal::ZERO)
        .ok_or_else(|| QuoteError::PriceUnavailable(target.label()))?;

        let estimated_gas_usd = if points.is_gas_exempt(target.address()) {
            Decimal::ZERO
        } else {
            self.gas.estimate_gas_usd(&target.chain, target.kind).await?
        };

        let breakdown = compute_quote(QuoteInputs {
            asset_amount,
            price_usd,
            funding_rate,
            estimated_gas_usd,
            usd_per_point: points.usd_per_point,
        })?;

        let mut quote = QuoteResponse {
            quote_id: String::new(),
            deposit_type: request.deposit_type,
            asset_address: target.address(),
            chain_id: target.chain.chain_id,
            mode: request.mode,
            symbol: target.label(),
            asset_amount,
            price_usd,
            funding_rate,
            gross_usd: breakdown.gross_usd,
            net_after_funding_rate: breakdown.net_after_funding_rate,
            estimated_gas_usd: breakdown.estimated_gas_usd,
            user_receives_usd: breakdown.user_receives_usd,
            points_credited: breakdown.points_credited,
        };
        quote.quote_id = derive_quote_id(&quote, points.quote_secret_bytes())?;

        info!(
            kind = ?target.kind,
            mode = ?request.mode,
            gross_usd = %quote.gross_usd,
            points = quote.points_credited,
            "Quoted deposit"
        );
        Ok(quote)
    }
}
