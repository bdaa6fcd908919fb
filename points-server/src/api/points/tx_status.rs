use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use points_sdk::objects::{TxStatusQuery, TxStatusResponse};

use super::PointsApiError;
use crate::state::AppState;

/// `GET /tx-status?txHash=..&chainId=..`: deposit settlement status.
///
/// Ledger first, then the chain receipt, then `UNKNOWN`.
pub(super) async fn tx_status(
    State(state): State<AppState>,
    query: Result<Query<TxStatusQuery>, QueryRejection>,
) -> Result<Json<TxStatusResponse>, PointsApiError> {
    let Query(query) = query?;
    let registry = state.registry.load().await;
    let status = state
        .statuses
        .resolve(&registry, query.chain_id, &query.tx_hash)
        .await?;
    Ok(Json(status))
}
