pub mod assets;
pub mod purchase;
pub mod quote;
pub mod status;

pub use assets::{AssetListing, ChainListing, DepositKind, DepositMode, DepositType, NftListing};
pub use purchase::{DestinationSource, PurchaseRequest, PurchaseResponse, TransactionDescriptor};
pub use quote::{QuoteRequest, QuoteResponse};
pub use status::{StatusSource, TxStatus, TxStatusQuery, TxStatusResponse};

use serde::{Deserialize, Serialize};

/// JSON body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
