use axum::{Json, extract::State, extract::rejection::JsonRejection};
use points_sdk::objects::{PurchaseRequest, PurchaseResponse};

use super::PointsApiError;
use crate::state::AppState;

/// `POST /purchase`: build the unsigned approval and deposit transactions.
pub(super) async fn purchase(
    State(state): State<AppState>,
    body: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<PurchaseResponse>, PointsApiError> {
    let Json(request) = body?;
    let registry = state.registry.load().await;
    let response = state.purchases.build(&registry, &request).await?;
    Ok(Json(response))
}
