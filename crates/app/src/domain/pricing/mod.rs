//! Vendor Pricing
//!
//! Prices products for a signed-in (or anonymous) user, applying the discounts of
//! the user's approved vendor.

pub mod service;

pub use service::*;
