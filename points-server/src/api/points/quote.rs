use axum::{Json, extract::State, extract::rejection::JsonRejection};
use points_sdk::objects::{QuoteRequest, QuoteResponse};

use super::PointsApiError;
use crate::state::AppState;

/// `POST /quote`: price a deposit in points.
///
/// Side-effect free: the same request against the same prices yields the
/// same quote, including its `quoteId`.
pub(super) async fn quote(
    State(state): State<AppState>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, PointsApiError> {
    let Json(request) = body?;
    let registry = state.registry.load().await;
    let quote = state.quotes.quote(&registry, &request).await?;
    Ok(Json(quote))
}
