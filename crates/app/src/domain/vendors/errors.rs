//! Vendors service errors.

use thiserror::Error;

use crate::{
    domain::{validation::ValidationError, vendors::records::VendorStatus},
    store::StoreError,
};

#[derive(Debug, Error)]
pub enum VendorsServiceError {
    #[error("invalid vendor input: {0}")]
    Validation(#[from] ValidationError),

    #[error("vendor not found")]
    NotFound,

    #[error("user already has a pending vendor application")]
    PendingApplication,

    #[error("user is already an approved vendor")]
    AlreadyVendor,

    #[error("vendor cannot move from {from} to {to}")]
    InvalidTransition { from: VendorStatus, to: VendorStatus },

    #[error("vendor is {0}, discounts can only be changed once approved")]
    NotApproved(VendorStatus),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for VendorsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
