//! Vendors
//!
//! Vendor applications, their review, and the discounts approved vendors carry.

pub mod data;
pub mod errors;
pub mod lifecycle;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::VendorsServiceError;
pub use service::*;
