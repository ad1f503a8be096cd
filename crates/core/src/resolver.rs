//! Discount Resolver
//!
//! Pure functions computing a vendor's effective discount and price for a product.
//!
//! The effective discount is the vendor's default discount plus any product
//! override. When a quantity is supplied and reaches a bulk tier, the tier's
//! discount replaces the stacked discount if it is larger. Nothing here fails:
//! a missing vendor, a product without an override or an arithmetic overflow all
//! degrade to "no discount" so pricing can never block checkout.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};

use crate::vendors::VendorDiscounts;

/// The result of pricing a product for a (possibly absent) vendor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote<'a> {
    /// Price before any vendor discount.
    pub base: Money<'a, Currency>,

    /// Price the vendor pays; never negative.
    pub price: Money<'a, Currency>,

    /// `base - price`.
    pub savings: Money<'a, Currency>,

    /// Effective discount in percent points, before the price floor.
    pub discount: Decimal,
}

impl PriceQuote<'_> {
    /// Effective discount as a fraction of the base price.
    pub fn discount_fraction(&self) -> Percentage {
        Percentage::from(self.discount / Decimal::ONE_HUNDRED)
    }
}

/// Effective discount in percent points for `product_id` at `quantity`.
///
/// Returns zero when `vendor` is `None`. The result is not clamped and may exceed 100
/// when a default and an override add up past it.
pub fn vendor_discount(
    vendor: Option<&VendorDiscounts>,
    product_id: &str,
    quantity: Option<u32>,
) -> Decimal {
    let Some(vendor) = vendor else {
        return Decimal::ZERO;
    };

    let base = vendor.default_discount.points();

    let additional = vendor
        .product_discount(product_id)
        .map_or(Decimal::ZERO, |discount| discount.points());

    let stacked = base + additional;

    let bulk = quantity
        .and_then(|quantity| vendor.bulk_tiers.select(quantity))
        .map(|tier| tier.discount.points());

    match bulk {
        Some(bulk) => stacked.max(bulk),
        None => stacked,
    }
}

/// Price `base` after the vendor's effective discount.
///
/// Rounds half-up to the currency's minor unit once, at the end, and floors the
/// result at zero.
pub fn vendor_price<'a>(
    base: &Money<'a, Currency>,
    vendor: Option<&VendorDiscounts>,
    product_id: &str,
    quantity: Option<u32>,
) -> Money<'a, Currency> {
    let discount = vendor_discount(vendor, product_id, quantity);

    discounted(base, discount)
}

/// How much the vendor saves on `base`.
///
/// Always `base - vendor_price(..)`, so every surface showing savings agrees
/// with the price charged.
pub fn discount_amount<'a>(
    base: &Money<'a, Currency>,
    vendor: Option<&VendorDiscounts>,
    product_id: &str,
    quantity: Option<u32>,
) -> Money<'a, Currency> {
    quote(base, vendor, product_id, quantity).savings
}

/// Compute discount, price and savings together.
pub fn quote<'a>(
    base: &Money<'a, Currency>,
    vendor: Option<&VendorDiscounts>,
    product_id: &str,
    quantity: Option<u32>,
) -> PriceQuote<'a> {
    let discount = vendor_discount(vendor, product_id, quantity);
    let price = discounted(base, discount);

    let savings_minor = base
        .to_minor_units()
        .checked_sub(price.to_minor_units())
        .unwrap_or_default();

    PriceQuote {
        base: *base,
        price,
        savings: Money::from_minor(savings_minor, base.currency()),
        discount,
    }
}

/// Apply `discount` percent points to `base`, degrading to `base` on overflow.
fn discounted<'a>(base: &Money<'a, Currency>, discount: Decimal) -> Money<'a, Currency> {
    if discount <= Decimal::ZERO {
        return *base;
    }

    let remaining = (Decimal::ONE_HUNDRED - discount).max(Decimal::ZERO) / Decimal::ONE_HUNDRED;

    match kept_minor(&Percentage::from(remaining), base.to_minor_units()) {
        Some(minor) => Money::from_minor(minor.max(0), base.currency()),
        None => *base,
    }
}

/// The part of `minor` kept after discounting, rounded half-up to whole minor units.
fn kept_minor(kept: &Percentage, minor: i64) -> Option<i64> {
    let minor = Decimal::from_i64(minor)?;

    ((*kept) * Decimal::ONE)
        .checked_mul(minor)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::{
        percent::DiscountPercent,
        tiers::{BulkTier, BulkTiers},
    };

    use super::*;

    fn percent(points: u8) -> Result<DiscountPercent, crate::percent::PercentError> {
        DiscountPercent::try_from(points)
    }

    #[test]
    fn no_vendor_means_no_discount() {
        let base = Money::from_minor(80_000, INR);

        assert_eq!(vendor_discount(None, "honey-1kg", None), Decimal::ZERO);
        assert_eq!(vendor_price(&base, None, "honey-1kg", None), base);
        assert_eq!(
            discount_amount(&base, None, "honey-1kg", Some(3)),
            Money::from_minor(0, INR)
        );
    }

    #[test]
    fn zero_discount_leaves_price_unchanged() {
        let vendor = VendorDiscounts::default();
        let base = Money::from_minor(12_345, INR);

        assert_eq!(vendor_price(&base, Some(&vendor), "any", Some(1)), base);
    }

    #[test]
    fn override_adds_to_default() -> TestResult {
        let vendor =
            VendorDiscounts::with_default(percent(20)?).with_product_discount("X", percent(5)?);

        assert_eq!(vendor_discount(Some(&vendor), "X", None), Decimal::from(25));
        assert_eq!(vendor_discount(Some(&vendor), "Y", None), Decimal::from(20));

        Ok(())
    }

    #[test]
    fn override_without_default() -> TestResult {
        let vendor = VendorDiscounts::default().with_product_discount("X", percent(10)?);
        let base = Money::from_minor(1_000, INR);

        assert_eq!(
            vendor_price(&base, Some(&vendor), "X", None),
            Money::from_minor(900, INR)
        );
        assert_eq!(vendor_price(&base, Some(&vendor), "Y", None), base);

        Ok(())
    }

    #[test]
    fn larger_bulk_tier_replaces_stacked_discount() -> TestResult {
        let vendor = VendorDiscounts::with_default(percent(10)?)
            .with_bulk_tiers(BulkTiers::new([BulkTier::new(10, percent(30)?)])?);

        assert_eq!(vendor_discount(Some(&vendor), "p", Some(12)), Decimal::from(30));
        assert_eq!(vendor_discount(Some(&vendor), "p", Some(5)), Decimal::from(10));

        Ok(())
    }

    #[test]
    fn smaller_bulk_tier_does_not_reduce_stacked_discount() -> TestResult {
        let vendor = VendorDiscounts::with_default(percent(20)?)
            .with_product_discount("p", percent(10)?)
            .with_bulk_tiers(BulkTiers::new([BulkTier::new(5, percent(25)?)])?);

        assert_eq!(vendor_discount(Some(&vendor), "p", Some(5)), Decimal::from(30));
        assert_eq!(vendor_discount(Some(&vendor), "q", Some(5)), Decimal::from(25));

        Ok(())
    }

    #[test]
    fn omitted_quantity_skips_bulk_tiers() -> TestResult {
        let vendor = VendorDiscounts::with_default(percent(10)?)
            .with_bulk_tiers(BulkTiers::new([BulkTier::new(1, percent(50)?)])?);

        assert_eq!(vendor_discount(Some(&vendor), "p", None), Decimal::from(10));

        Ok(())
    }

    #[test]
    fn stacked_discount_over_one_hundred_floors_price_at_zero() -> TestResult {
        let vendor =
            VendorDiscounts::with_default(percent(80)?).with_product_discount("p", percent(40)?);
        let base = Money::from_minor(5_000, INR);

        let quote = quote(&base, Some(&vendor), "p", None);

        assert_eq!(quote.discount, Decimal::from(120));
        assert_eq!(quote.price, Money::from_minor(0, INR));
        assert_eq!(quote.savings, base);

        Ok(())
    }

    #[test]
    fn rounds_half_up_once_at_the_end() -> TestResult {
        // 12.5% off 1 minor unit is 0.875 -> 1; 50% off 3 minor units is 1.5 -> 2.
        let vendor = VendorDiscounts::with_default(DiscountPercent::new(Decimal::new(125, 1))?);

        assert_eq!(
            vendor_price(&Money::from_minor(1, INR), Some(&vendor), "p", None),
            Money::from_minor(1, INR)
        );

        let half = VendorDiscounts::with_default(percent(50)?);

        assert_eq!(
            vendor_price(&Money::from_minor(3, INR), Some(&half), "p", None),
            Money::from_minor(2, INR)
        );
        assert_eq!(
            discount_amount(&Money::from_minor(3, INR), Some(&half), "p", None),
            Money::from_minor(1, INR)
        );

        Ok(())
    }

    #[test]
    fn quote_fraction_matches_discount() -> TestResult {
        let vendor = VendorDiscounts::with_default(percent(15)?);
        let quote = quote(&Money::from_minor(2_000, INR), Some(&vendor), "p", None);

        assert_eq!(quote.discount_fraction() * Decimal::ONE, Decimal::new(15, 2));
        assert_eq!(quote.price, Money::from_minor(1_700, INR));

        Ok(())
    }

    #[test]
    fn resolving_twice_gives_identical_results() -> TestResult {
        let vendor = VendorDiscounts::with_default(percent(7)?)
            .with_product_discount("p", percent(3)?)
            .with_bulk_tiers(BulkTiers::new([BulkTier::new(4, percent(12)?)])?);

        let first = vendor_discount(Some(&vendor), "p", Some(4));
        let second = vendor_discount(Some(&vendor), "p", Some(4));

        assert_eq!(first, second);

        Ok(())
    }
}
