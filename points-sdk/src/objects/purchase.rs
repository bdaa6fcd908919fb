//! `/purchase` request and response types.

use alloy_primitives::{Address, Bytes, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::assets::{DepositMode, DepositType};

/// Build the unsigned transactions for a deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// The wallet that will sign and send the transactions.
    pub from: Address,
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
    #[serde(default)]
    pub recipient: Option<Address>,
    #[serde(default)]
    pub referral_code: Option<String>,
    /// Echoed back untouched.
    #[serde(default)]
    pub quote_id: Option<String>,
}

/// An unsigned transaction for the caller's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDescriptor {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Which rule picked the deposit destination.
pub enum DestinationSource {
    Referral,
    Recipient,
    ProtocolDefault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub quote_id: Option<String>,
    pub destination: Address,
    pub destination_source: DestinationSource,
    pub requires_approval: bool,
    /// Must be mined before `transaction` when present.
    pub approval: Option<TransactionDescriptor>,
    pub transaction: TransactionDescriptor,
}
