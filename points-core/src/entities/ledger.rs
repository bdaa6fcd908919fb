//! Rows of the deposit ledger.
//!
//! The ledger is written by the off-chain indexer once it has seen and
//! settled a deposit; this service only reads it.

use crate::framework::DatabaseProcessor;
use crate::sources::{DepositLedger, LedgerError};
use alloy_primitives::B256;
use async_trait::async_trait;
use kanau::processor::Processor;
use points_sdk::objects::TxStatus;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LedgerEntry {
    pub tx_hash: String,
    pub chain_id: i64,
    pub status: LedgerStatus,
    pub deposit_amount: rust_decimal::Decimal,
    pub points_credited: i64,
    pub failure_reason: Option<String>,
    pub updated_at: time::PrimitiveDateTime,
}

/// Settlement state of a ledger entry.
///
/// This is the sqlx::Type version. For API use, see `points_sdk::objects::TxStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "ledger_status")]
pub enum LedgerStatus {
    Pending,
    Completed,
    Failed,
}

impl From<LedgerStatus> for TxStatus {
    fn from(value: LedgerStatus) -> Self {
        match value {
            LedgerStatus::Pending => TxStatus::Pending,
            LedgerStatus::Completed => TxStatus::Completed,
            LedgerStatus::Failed => TxStatus::Failed,
        }
    }
}

/// Canonical text form of a transaction hash in the ledger: `0x` + 64
/// lowercase hex digits.
pub fn ledger_tx_hash(tx_hash: B256) -> String {
    format!("{tx_hash:#x}")
}

#[derive(Debug, Clone)]
/// Find the ledger entry for a transaction on a chain.
pub struct GetLedgerEntryByTxHash {
    pub chain_id: i64,
    pub tx_hash: String,
}

impl Processor<GetLedgerEntryByTxHash> for DatabaseProcessor {
    type Output = Option<LedgerEntry>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetLedgerEntryByTxHash")]
    async fn process(
        &self,
        query: GetLedgerEntryByTxHash,
    ) -> Result<Option<LedgerEntry>, sqlx::Error> {
        let entry = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT
                tx_hash,
                chain_id,
                status,
                deposit_amount,
                points_credited,
                failure_reason,
                updated_at
            FROM deposit_ledger
            WHERE chain_id = $1 AND lower(tx_hash) = $2
            "#,
        )
        .bind(query.chain_id)
        .bind(query.tx_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }
}

#[async_trait]
impl DepositLedger for DatabaseProcessor {
    async fn find_by_tx_hash(
        &self,
        chain_id: u64,
        tx_hash: B256,
    ) -> Result<Option<LedgerEntry>, LedgerError> {
        let chain_id = i64::try_from(chain_id).map_err(|_| LedgerError::Malformed {
            tx_hash: ledger_tx_hash(tx_hash),
            reason: format!("chain id {chain_id} does not fit the ledger schema"),
        })?;
        let entry = self
            .process(GetLedgerEntryByTxHash {
                chain_id,
                tx_hash: ledger_tx_hash(tx_hash),
            })
            .await?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_tx_hash_format() {
        let hash = B256::repeat_byte(0xab);
        let text = ledger_tx_hash(hash);
        assert_eq!(text.len(), 66);
        assert!(text.starts_with("0xabab"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(TxStatus::from(LedgerStatus::Completed), TxStatus::Completed);
        assert_eq!(TxStatus::from(LedgerStatus::Failed), TxStatus::Failed);
    }
}
