//! Deposit status reconciliation.
//!
//! The ledger is authoritative. Only when it has no entry is the chain asked
//! whether the transaction was mined at all.

use crate::config::PointsRegistry;
use crate::entities::ledger::{LedgerEntry, ledger_tx_hash};
use crate::sources::{ChainError, ChainReader, DepositLedger, LedgerError};
use alloy_primitives::B256;
use points_sdk::objects::{StatusSource, TxStatus, TxStatusResponse};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("malformed transaction hash {0:?}")]
    MalformedHash(String),

    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("chain read failed: {0}")]
    Chain(#[from] ChainError),
}

/// Parse a `0x`-prefixed 32 byte transaction hash.
pub fn parse_tx_hash(raw: &str) -> Result<B256, StatusError> {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) if hex.len() == 64 => hex
            .parse::<B256>()
            .map_err(|_| StatusError::MalformedHash(raw.to_string())),
        _ => Err(StatusError::MalformedHash(raw.to_string())),
    }
}

#[derive(Clone)]
pub struct StatusResolver {
    ledger: Arc<dyn DepositLedger>,
    chain_reader: Arc<dyn ChainReader>,
}

impl StatusResolver {
    pub fn new(ledger: Arc<dyn DepositLedger>, chain_reader: Arc<dyn ChainReader>) -> Self {
        Self {
            ledger,
            chain_reader,
        }
    }

    #[tracing::instrument(skip(self, registry), err)]
    pub async fn resolve(
        &self,
        registry: &PointsRegistry,
        chain_id: u64,
        tx_hash: &str,
    ) -> Result<TxStatusResponse, StatusError> {
        let tx_hash = parse_tx_hash(tx_hash)?;
        let chain = registry
            .chain(chain_id)
            .ok_or(StatusError::UnsupportedChain(chain_id))?;

        if let Some(entry) = self.ledger.find_by_tx_hash(chain_id, tx_hash).await? {
            debug!(status = ?entry.status, "Ledger entry found");
            return from_ledger(chain_id, entry);
        }

        let (status, source) = if self.chain_reader.has_receipt(chain, tx_hash).await? {
            (TxStatus::PendingConfirmation, StatusSource::Chain)
        } else {
            (TxStatus::Unknown, StatusSource::None)
        };
        Ok(TxStatusResponse {
            tx_hash: ledger_tx_hash(tx_hash),
            chain_id,
            status,
            source,
            deposit_amount: None,
            points_credited: None,
            failure_reason: None,
        })
    }
}

fn from_ledger(chain_id: u64, entry: LedgerEntry) -> Result<TxStatusResponse, StatusError> {
    let points_credited =
        u64::try_from(entry.points_credited).map_err(|_| LedgerError::Malformed {
            tx_hash: entry.tx_hash.clone(),
            reason: format!("negative points_credited {}", entry.points_credited),
        })?;
    Ok(TxStatusResponse {
        tx_hash: entry.tx_hash.to_lowercase(),
        chain_id,
        status: entry.status.into(),
        source: StatusSource::Ledger,
        deposit_amount: Some(entry.deposit_amount),
        points_credited: Some(points_credited),
        failure_reason: entry.failure_reason,
    })
}
