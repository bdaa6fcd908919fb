//! Unsigned deposit transactions.
//!
//! The builder never signs or sends anything. It reads the wallet's current
//! approval from the chain and returns the transactions the wallet has to
//! send, in order: an optional approval, then the deposit itself.

pub mod units;

use crate::abi::{IERC20, IERC721, IPointsVault};
use crate::config::{ChainConfig, PointsRegistry};
use crate::deposit::{DepositTarget, TargetAsset, TargetError};
use crate::sources::{ChainError, ChainReader};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use points_sdk::objects::{
    DepositKind, DepositMode, DestinationSource, PurchaseRequest, PurchaseResponse,
    TransactionDescriptor,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use units::{UnitsError, to_base_units};

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] UnitsError),

    #[error("amount is required for token deposits")]
    MissingAmount,

    #[error("tokenId is required for NFT deposits")]
    MissingTokenId,

    #[error("invalid tokenId {0:?}")]
    InvalidTokenId(String),

    #[error("from must be a non-zero address")]
    InvalidSender,

    #[error("chain read failed: {0}")]
    Chain(#[from] ChainError),
}

/// What the wallet moves, resolved and converted before any chain read.
enum Payload {
    Native { value: U256 },
    Erc20 { token: Address, amount: U256 },
    Nft { collection: Address, token_id: U256 },
}

#[derive(Clone)]
pub struct PurchaseBuilder {
    chain_reader: Arc<dyn ChainReader>,
}

impl PurchaseBuilder {
    pub fn new(chain_reader: Arc<dyn ChainReader>) -> Self {
        Self { chain_reader }
    }

    #[tracing::instrument(skip_all, err, fields(chain_id = request.chain_id, from = %request.from))]
    pub async fn build(
        &self,
        registry: &PointsRegistry,
        request: &PurchaseRequest,
    ) -> Result<PurchaseResponse, PurchaseError> {
        if request.from.is_zero() {
            return Err(PurchaseError::InvalidSender);
        }
        let target = DepositTarget::resolve(
            registry,
            request.chain_id,
            request.deposit_type,
            request.asset_address,
        )?;
        let payload = payload(&target, request)?;
        let (destination, destination_source) =
            resolve_destination(registry, &target.chain, request);

        let approval = match &payload {
            Payload::Native { .. } => None,
            Payload::Erc20 { token, amount } => {
                let allowance = self
                    .chain_reader
                    .erc20_allowance(&target.chain, *token, request.from, destination)
                    .await?;
                if allowance < *amount {
                    let data = IERC20::approveCall {
                        spender: destination,
                        amount: *amount,
                    }
                    .abi_encode();
                    Some(descriptor(request.from, *token, data, U256::ZERO, &target.chain))
                } else {
                    None
                }
            }
            Payload::Nft { collection, .. } => {
                let approved = self
                    .chain_reader
                    .is_approved_for_all(&target.chain, *collection, request.from, destination)
                    .await?;
                if approved {
                    None
                } else {
                    let data = IERC721::setApprovalForAllCall {
                        operator: destination,
                        approved: true,
                    }
                    .abi_encode();
                    Some(descriptor(request.from, *collection, data, U256::ZERO, &target.chain))
                }
            }
        };

        let transaction = match payload {
            Payload::Native { value } => {
                descriptor(request.from, destination, Vec::new(), value, &target.chain)
            }
            Payload::Erc20 { token, amount } => {
                let data = match request.mode {
                    DepositMode::Contribute => {
                        IPointsVault::contributeCall { token, amount }.abi_encode()
                    }
                    DepositMode::Donate => IPointsVault::donateCall { token, amount }.abi_encode(),
                };
                descriptor(request.from, destination, data, U256::ZERO, &target.chain)
            }
            Payload::Nft {
                collection,
                token_id,
            } => {
                let data = match request.mode {
                    DepositMode::Contribute => IPointsVault::depositNftCall {
                        collection,
                        tokenId: token_id,
                    }
                    .abi_encode(),
                    DepositMode::Donate => IPointsVault::donateNftCall {
                        collection,
                        tokenId: token_id,
                    }
                    .abi_encode(),
                };
                descriptor(request.from, destination, data, U256::ZERO, &target.chain)
            }
        };

        info!(
            kind = ?target.kind,
            mode = ?request.mode,
            %destination,
            ?destination_source,
            requires_approval = approval.is_some(),
            "Built deposit transaction"
        );
        Ok(PurchaseResponse {
            quote_id: request.quote_id.clone(),
            destination,
            destination_source,
            requires_approval: approval.is_some(),
            approval,
            transaction,
        })
    }
}

fn payload(target: &DepositTarget, request: &PurchaseRequest) -> Result<Payload, PurchaseError> {
    match &target.asset {
        TargetAsset::Fungible(asset) => {
            let amount = request.amount.ok_or(PurchaseError::MissingAmount)?;
            let units = to_base_units(amount, asset.decimals)?;
            Ok(match target.kind {
                DepositKind::Native => Payload::Native { value: units },
                _ => Payload::Erc20 {
                    token: asset.address,
                    amount: units,
                },
            })
        }
        TargetAsset::Nft(nft) => {
            let raw = request
                .token_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(PurchaseError::MissingTokenId)?;
            let token_id = raw
                .parse::<U256>()
                .map_err(|_| PurchaseError::InvalidTokenId(raw.to_string()))?;
            Ok(Payload::Nft {
                collection: nft.address,
                token_id,
            })
        }
    }
}

/// Referral vault, then explicit recipient, then the chain's default vault.
fn resolve_destination(
    registry: &PointsRegistry,
    chain: &ChainConfig,
    request: &PurchaseRequest,
) -> (Address, DestinationSource) {
    if let Some(code) = request
        .referral_code
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    {
        match registry.referral_vault(code) {
            Some(vault) => return (vault, DestinationSource::Referral),
            None => warn!(referral_code = code, "Unknown referral code, ignoring"),
        }
    }
    match request.recipient {
        Some(recipient) if !recipient.is_zero() => (recipient, DestinationSource::Recipient),
        _ => (chain.default_vault, DestinationSource::ProtocolDefault),
    }
}

fn descriptor(
    from: Address,
    to: Address,
    data: Vec<u8>,
    value: U256,
    chain: &ChainConfig,
) -> TransactionDescriptor {
    TransactionDescriptor {
        from,
        to,
        data: Bytes::from(data),
        value,
        chain_id: chain.chain_id,
    }
}
