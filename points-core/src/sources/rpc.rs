//! Minimal Ethereum JSON-RPC client.

use super::{ChainError, ChainReader};
use crate::abi::{IERC20, IERC721};
use crate::config::ChainConfig;
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

/// Reads chain state over plain HTTP JSON-RPC.
///
/// The endpoint comes from the [`ChainConfig`] passed to each call, so one
/// reader serves every configured chain and follows config reloads.
pub struct JsonRpcChainReader {
    http_client: reqwest::Client,
}

#[derive(Debug, serde::Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, serde::Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl JsonRpcChainReader {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Send one request. `Ok(None)` is a `null` result.
    async fn request<T: DeserializeOwned>(
        &self,
        chain: &ChainConfig,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, ChainError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response: RpcResponse<T> = self
            .http_client
            .post(chain.rpc_url.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result)
    }

    async fn eth_call<C: SolCall>(
        &self,
        chain: &ChainConfig,
        to: Address,
        call: C,
    ) -> Result<C::Return, ChainError> {
        let data = Bytes::from(call.abi_encode());
        let output: Bytes = self
            .request(
                chain,
                "eth_call",
                json!([{ "to": to, "data": data }, "latest"]),
            )
            .await?
            .ok_or_else(|| ChainError::Decode("eth_call returned null".to_string()))?;
        C::abi_decode_returns(&output, true).map_err(|e| ChainError::Decode(e.to_string()))
    }
}

impl Default for JsonRpcChainReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainReader for JsonRpcChainReader {
    async fn erc20_allowance(
        &self,
        chain: &ChainConfig,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError> {
        let allowance = self
            .eth_call(chain, token, IERC20::allowanceCall { owner, spender })
            .await?
            ._0;
        debug!(chain_id = chain.chain_id, %token, %owner, %spender, %allowance, "Read ERC-20 allowance");
        Ok(allowance)
    }

    async fn is_approved_for_all(
        &self,
        chain: &ChainConfig,
        collection: Address,
        owner: Address,
        operator: Address,
    ) -> Result<bool, ChainError> {
        let approved = self
            .eth_call(
                chain,
                collection,
                IERC721::isApprovedForAllCall { owner, operator },
            )
            .await?
            ._0;
        debug!(chain_id = chain.chain_id, %collection, %owner, %operator, approved, "Read NFT operator approval");
        Ok(approved)
    }

    async fn has_receipt(&self, chain: &ChainConfig, tx_hash: B256) -> Result<bool, ChainError> {
        let receipt: Option<Value> = self
            .request(chain, "eth_getTransactionReceipt", json!([tx_hash]))
            .await?;
        Ok(receipt.is_some())
    }

    async fn gas_price_wei(&self, chain: &ChainConfig) -> Result<u128, ChainError> {
        let price: U256 = self
            .request(chain, "eth_gasPrice", json!([]))
            .await?
            .ok_or_else(|| ChainError::Decode("eth_gasPrice returned null".to_string()))?;
        u128::try_from(price).map_err(|e| ChainError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_result_is_none() {
        let response: RpcResponse<Value> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(response.result.is_none());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_error_object_is_parsed() {
        let response: RpcResponse<Bytes> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"execution reverted"}}"#,
        )
        .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "execution reverted");
    }

    #[test]
    fn test_quantity_result_without_error_field() {
        let response: RpcResponse<U256> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x4a817c800"}"#).unwrap();
        assert_eq!(response.result, Some(U256::from(20_000_000_000u64)));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_allowance_return_decoding() {
        let mut word = [0u8; 32];
        word[31] = 0x2a;
        let decoded = IERC20::allowanceCall::abi_decode_returns(&word, true).unwrap();
        assert_eq!(decoded._0, U256::from(42));
    }
}
