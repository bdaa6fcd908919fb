//! Points API handlers.
//!
//! # Endpoints
//!
//! - `POST /quote`     – price a deposit in points
//! - `POST /purchase`  – build the wallet transactions for a deposit
//! - `GET  /tx-status` – settlement status of a deposit transaction
//! - `GET  /assets`    – chains, assets and NFT collections accepted

use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use points_core::quote::QuoteError;
use points_core::settlement::PurchaseError;
use points_core::sources::{GasError, LedgerError};
use points_core::status::StatusError;
use points_sdk::objects::ErrorBody;

use crate::state::AppState;

mod assets;
mod purchase;
mod quote;
mod tx_status;

/// Build the Points API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote::quote))
        .route("/purchase", post(purchase::purchase))
        .route("/tx-status", get(tx_status::tx_status))
        .route("/assets", get(assets::assets))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in Points API handlers.
#[derive(Debug)]
pub(super) enum PointsApiError {
    /// The request body or query string could not be parsed.
    BadRequest(String),
    Quote(QuoteError),
    Purchase(PurchaseError),
    Status(StatusError),
}

impl From<JsonRejection> for PointsApiError {
    fn from(rejection: JsonRejection) -> Self {
        PointsApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for PointsApiError {
    fn from(rejection: QueryRejection) -> Self {
        PointsApiError::BadRequest(rejection.body_text())
    }
}

impl From<QuoteError> for PointsApiError {
    fn from(e: QuoteError) -> Self {
        PointsApiError::Quote(e)
    }
}

impl From<PurchaseError> for PointsApiError {
    fn from(e: PurchaseError) -> Self {
        PointsApiError::Purchase(e)
    }
}

impl From<StatusError> for PointsApiError {
    fn from(e: StatusError) -> Self {
        PointsApiError::Status(e)
    }
}

impl PointsApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            PointsApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PointsApiError::Quote(e) => match e {
                QuoteError::Target(_) | QuoteError::InvalidAmount(_) | QuoteError::Overflow(_) => {
                    StatusCode::BAD_REQUEST
                }
                QuoteError::PriceUnavailable(_)
                | QuoteError::Gas(GasError::NativePriceUnavailable(_)) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                QuoteError::Price(_) | QuoteError::Gas(_) => StatusCode::BAD_GATEWAY,
                QuoteError::QuoteId(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            PointsApiError::Purchase(e) => match e {
                PurchaseError::Chain(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::BAD_REQUEST,
            },
            PointsApiError::Status(e) => match e {
                StatusError::MalformedHash(_) | StatusError::UnsupportedChain(_) => {
                    StatusCode::BAD_REQUEST
                }
                StatusError::Ledger(LedgerError::Database(_) | LedgerError::Malformed { .. }) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                StatusError::Chain(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            PointsApiError::BadRequest(message) => message.clone(),
            PointsApiError::Quote(e) => e.to_string(),
            PointsApiError::Purchase(e) => e.to_string(),
            PointsApiError::Status(e) => e.to_string(),
        }
    }
}

impl IntoResponse for PointsApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Points API internal error");
            "internal server error".to_string()
        } else {
            if status == StatusCode::BAD_GATEWAY {
                tracing::warn!(error = ?self, "Points API upstream error");
            }
            self.message()
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}
