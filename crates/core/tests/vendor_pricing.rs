//! Integration tests for vendor pricing through the public resolver API.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::INR};
use testresult::TestResult;

use vendora::prelude::*;

fn percent(points: u8) -> Result<DiscountPercent, PercentError> {
    DiscountPercent::try_from(points)
}

/// Vendor on 20% default with a +10% override on honey buys one jar on sale at ₹800.
/// 800 × (1 - 0.30) = ₹560, saving ₹240.
#[test]
fn honey_override_stacks_on_default_discount() -> TestResult {
    let vendor =
        VendorDiscounts::with_default(percent(20)?).with_product_discount("honey-1kg", percent(10)?);

    let mut honey = Product::new("honey-1kg", Money::from_minor(100_000, INR));
    honey.sale_price = Some(Money::from_minor(80_000, INR));

    let base = honey.base_price(None);
    let quote = quote(&base, Some(&vendor), &honey.id, Some(1));

    assert_eq!(quote.discount, Decimal::from(30));
    assert_eq!(quote.price, Money::from_minor(56_000, INR));
    assert_eq!(quote.savings, Money::from_minor(24_000, INR));

    Ok(())
}

/// The same product priced for someone who is not a vendor stays at ₹800.
#[test]
fn non_vendor_pays_sale_price() {
    let mut honey = Product::new("honey-1kg", Money::from_minor(100_000, INR));
    honey.sale_price = Some(Money::from_minor(80_000, INR));

    let base = honey.base_price(None);

    assert_eq!(
        vendor_price(&base, None, &honey.id, Some(1)),
        Money::from_minor(80_000, INR)
    );
    assert_eq!(
        discount_amount(&base, None, &honey.id, Some(1)),
        Money::from_minor(0, INR)
    );
}

/// A default-only vendor pays `p × (1 - d/100)` for every product.
#[test]
fn default_discount_applies_to_every_product() -> TestResult {
    let vendor = VendorDiscounts::with_default(percent(15)?);

    for (product, minor, expected) in [("a", 1_000, 850), ("b", 333, 283), ("c", 99_999, 84_999)] {
        let base = Money::from_minor(minor, INR);

        assert_eq!(
            vendor_price(&base, Some(&vendor), product, None),
            Money::from_minor(expected, INR),
            "unexpected price for {product}"
        );
    }

    Ok(())
}

/// Default 10% with a 30% tier from 10 units: 12 units get 30%, 5 units get 10%.
#[test]
fn bulk_tier_acts_as_a_ceiling_raise() -> TestResult {
    let vendor = VendorDiscounts::with_default(percent(10)?)
        .with_bulk_tiers(BulkTiers::new([BulkTier::new(10, percent(30)?)])?);

    let base = Money::from_minor(10_000, INR);

    assert_eq!(
        vendor_price(&base, Some(&vendor), "rice-5kg", Some(12)),
        Money::from_minor(7_000, INR)
    );
    assert_eq!(
        vendor_price(&base, Some(&vendor), "rice-5kg", Some(5)),
        Money::from_minor(9_000, INR)
    );
    assert_eq!(
        vendor_price(&base, Some(&vendor), "rice-5kg", None),
        Money::from_minor(9_000, INR)
    );

    Ok(())
}

/// Discounts adding up to 100% or more never produce a negative price.
#[test]
fn combined_discounts_at_or_over_one_hundred_are_free() -> TestResult {
    let base = Money::from_minor(4_999, INR);

    for (default, extra) in [(100, 0), (60, 40), (90, 90)] {
        let vendor =
            VendorDiscounts::with_default(percent(default)?).with_product_discount("p", percent(extra)?);

        assert_eq!(
            vendor_price(&base, Some(&vendor), "p", None),
            Money::from_minor(0, INR),
            "expected free for {default}% + {extra}%"
        );
        assert_eq!(discount_amount(&base, Some(&vendor), "p", None), base);
    }

    Ok(())
}

/// Savings are always exactly list minus vendor price.
#[test]
fn savings_match_price_difference() -> TestResult {
    let vendor = VendorDiscounts::with_default(DiscountPercent::new(Decimal::new(175, 1))?)
        .with_product_discount("p", percent(3)?);

    for minor in [1, 7, 99, 101, 12_345, 1_000_001] {
        let base = Money::from_minor(minor, INR);
        let price = vendor_price(&base, Some(&vendor), "p", Some(2));
        let savings = discount_amount(&base, Some(&vendor), "p", Some(2));

        assert_eq!(
            price.to_minor_units() + savings.to_minor_units(),
            minor,
            "price and savings should add back up for {minor}"
        );
    }

    Ok(())
}
