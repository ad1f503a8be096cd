//! Discount history service errors.

use thiserror::Error;

use crate::{domain::validation::ValidationError, store::StoreError};

#[derive(Debug, Error)]
pub enum DiscountHistoryServiceError {
    #[error("invalid discount change: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
