//! `/tx-status` query and response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxStatusQuery {
    pub tx_hash: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    /// Ledger has seen the deposit but has not settled it.
    Pending,
    /// Ledger settled the deposit and credited points.
    Completed,
    /// Ledger rejected the deposit, see `failureReason`.
    Failed,
    /// Not in the ledger yet, but the chain has a receipt.
    PendingConfirmation,
    /// Neither the ledger nor the chain know this transaction.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSource {
    Ledger,
    Chain,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxStatusResponse {
    pub tx_hash: String,
    pub chain_id: u64,
    pub status: TxStatus,
    pub source: StatusSource,
    pub deposit_amount: Option<Decimal>,
    pub points_credited: Option<u64>,
    pub failure_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TxStatus::PendingConfirmation).unwrap(),
            "\"PENDING_CONFIRMATION\""
        );
        assert_eq!(
            serde_json::to_string(&TxStatus::Unknown).unwrap(),
            "\"UNKNOWN\""
        );
    }
}
