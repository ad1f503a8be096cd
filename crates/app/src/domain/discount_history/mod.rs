//! Discount History
//!
//! Append-only audit trail of every vendor discount change.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::DiscountHistoryServiceError;
pub use service::*;
