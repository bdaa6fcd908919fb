//! In-memory collaborators for unit tests. Each one counts its calls so tests
//! can assert that validation failures never reach the network.

use super::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Default)]
pub struct FakePrices {
    pub prices: HashMap<String, Decimal>,
    pub calls: AtomicU32,
}

impl FakePrices {
    pub fn with(entries: &[(&str, Decimal)]) -> Self {
        Self {
            prices: entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl PriceFeed for FakePrices {
    async fn price_usd(&self, price_id: &str) -> Result<Option<Decimal>, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.prices.get(price_id).copied())
    }
}

#[derive(Default)]
pub struct FakeNftPrices {
    pub floor: Option<Decimal>,
    pub calls: AtomicU32,
}

#[async_trait]
impl NftPriceFeed for FakeNftPrices {
    async fn floor_price_usd(
        &self,
        _chain: &ChainConfig,
        _collection: Address,
    ) -> Result<Option<Decimal>, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.floor)
    }
}

#[derive(Default)]
pub struct FakeGas {
    pub usd: Decimal,
    pub calls: AtomicU32,
}

#[async_trait]
impl GasEstimator for FakeGas {
    async fn estimate_gas_usd(
        &self,
        _chain: &ChainConfig,
        _kind: DepositKind,
    ) -> Result<Decimal, GasError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.usd)
    }
}

#[derive(Default)]
pub struct FakeChainReader {
    pub allowance: U256,
    pub approved_for_all: bool,
    pub receipt: bool,
    pub gas_price_wei: u128,
    pub calls: AtomicU32,
}

impl FakeChainReader {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for FakeChainReader {
    async fn erc20_allowance(
        &self,
        _chain: &ChainConfig,
        _token: Address,
        _owner: Address,
        _spender: Address,
    ) -> Result<U256, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.allowance)
    }

    async fn is_approved_for_all(
        &self,
        _chain: &ChainConfig,
        _collection: Address,
        _owner: Address,
        _operator: Address,
    ) -> Result<bool, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.approved_for_all)
    }

    async fn has_receipt(&self, _chain: &ChainConfig, _tx_hash: B256) -> Result<bool, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.receipt)
    }

    async fn gas_price_wei(&self, _chain: &ChainConfig) -> Result<u128, ChainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.gas_price_wei)
    }
}

#[derive(Default)]
pub struct FakeLedger {
    pub entries: Vec<LedgerEntry>,
    pub calls: AtomicU32,
}

#[async_trait]
impl DepositLedger for FakeLedger {
    async fn find_by_tx_hash(
        &self,
        chain_id: u64,
        tx_hash: B256,
    ) -> Result<Option<LedgerEntry>, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tx_hash = crate::entities::ledger::ledger_tx_hash(tx_hash);
        Ok(self
            .entries
            .iter()
            .find(|e| e.chain_id as u64 == chain_id && e.tx_hash == tx_hash)
            .cloned())
    }
}
