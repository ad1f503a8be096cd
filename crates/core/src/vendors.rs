//! Vendor Discount Snapshots

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{percent::DiscountPercent, tiers::BulkTiers};

/// Everything the resolver needs to know about a vendor's pricing terms.
///
/// Product overrides are *additional* to the default discount. A product without
/// an entry has no override; lookups never insert one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorDiscounts {
    /// Discount applied to every product.
    pub default_discount: DiscountPercent,

    /// Extra discount per product id, added to `default_discount`.
    pub product_discounts: FxHashMap<String, DiscountPercent>,

    /// Quantity tiers that may supersede the stacked discount.
    pub bulk_tiers: BulkTiers,
}

impl VendorDiscounts {
    /// A snapshot with only a default discount.
    pub fn with_default(default_discount: DiscountPercent) -> Self {
        Self {
            default_discount,
            ..Self::default()
        }
    }

    /// Add or replace the override for a product.
    #[must_use]
    pub fn with_product_discount(
        mut self,
        product_id: impl Into<String>,
        discount: DiscountPercent,
    ) -> Self {
        self.product_discounts.insert(product_id.into(), discount);
        self
    }

    /// Replace the bulk tiers.
    #[must_use]
    pub fn with_bulk_tiers(mut self, bulk_tiers: BulkTiers) -> Self {
        self.bulk_tiers = bulk_tiers;
        self
    }

    /// The override recorded for `product_id`, if there is one.
    pub fn product_discount(&self, product_id: &str) -> Option<DiscountPercent> {
        self.product_discounts.get(product_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_override_is_none_and_not_inserted() -> TestResult {
        let vendor = VendorDiscounts::with_default(DiscountPercent::try_from(20_u8)?);

        assert_eq!(vendor.product_discount("honey-1kg"), None);
        assert!(vendor.product_discounts.is_empty());

        Ok(())
    }

    #[test]
    fn with_product_discount_replaces_existing_entry() -> TestResult {
        let vendor = VendorDiscounts::default()
            .with_product_discount("x", DiscountPercent::try_from(5_u8)?)
            .with_product_discount("x", DiscountPercent::try_from(8_u8)?);

        assert_eq!(
            vendor.product_discount("x"),
            Some(DiscountPercent::try_from(8_u8)?)
        );
        assert_eq!(vendor.product_discounts.len(), 1);

        Ok(())
    }
}
