//! Points conversion parameters.

use alloy_primitives::Address;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct PointsConfig {
    /// USD value of one point.
    pub usd_per_point: Decimal,
    pub default_funding_rate: Decimal,
    pub default_donation_funding_rate: Decimal,
    /// Token whose deposits are quoted without a gas deduction.
    pub gas_exempt_token: Option<Address>,
    /// HMAC key for quote ids.
    pub quote_secret: Box<[u8]>,
}

impl PointsConfig {
    pub fn is_gas_exempt(&self, asset: Address) -> bool {
        self.gas_exempt_token == Some(asset)
    }

    pub fn quote_secret_bytes(&self) -> &[u8] {
        &self.quote_secret
    }
}
