//! Vendora prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    percent::{DiscountPercent, PercentError},
    products::{Product, ProductVariant},
    resolver::{PriceQuote, discount_amount, quote, vendor_discount, vendor_price},
    tiers::{BulkTier, BulkTiers, TierError},
    vendors::VendorDiscounts,
};
