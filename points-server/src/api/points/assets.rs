use axum::{Json, extract::State};
use points_sdk::objects::ChainListing;

use crate::state::AppState;

/// `GET /assets`: everything that can be deposited, with effective rates.
pub(super) async fn assets(State(state): State<AppState>) -> Json<Vec<ChainListing>> {
    Json(state.registry.load().await.listings())
}
