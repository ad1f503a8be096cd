//! Products

use rusty_money::{Money, iso::Currency};

/// A purchasable variant of a product (size, weight, pack).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant<'a> {
    /// Variant identifier, unique within its product.
    pub id: String,

    /// Variant list price.
    pub price: Money<'a, Currency>,

    /// Variant sale price, when on sale.
    pub sale_price: Option<Money<'a, Currency>>,
}

/// A catalog product as seen by the pricing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product identifier; the key used for vendor product overrides.
    pub id: String,

    /// Product list price.
    pub default_price: Money<'a, Currency>,

    /// Product sale price, when on sale.
    pub sale_price: Option<Money<'a, Currency>>,

    /// Catalog category.
    pub category: Option<String>,

    /// Purchasable variants; may be empty.
    pub variants: Vec<ProductVariant<'a>>,
}

impl<'a> Product<'a> {
    /// Create a product with a list price and nothing else.
    pub fn new(id: impl Into<String>, default_price: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            default_price,
            sale_price: None,
            category: None,
            variants: Vec::new(),
        }
    }

    /// The price vendor discounts are applied to.
    ///
    /// The sale price wins over the list price. When `variant` names one of this
    /// product's variants, that variant's own sale/list price is used instead; an
    /// unknown variant id falls back to the product's price.
    pub fn base_price(&self, variant: Option<&str>) -> Money<'a, Currency> {
        let selected = variant.and_then(|id| self.variants.iter().find(|v| v.id == id));

        match selected {
            Some(variant) => variant.sale_price.unwrap_or(variant.price),
            None => self.sale_price.unwrap_or(self.default_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;

    use super::*;

    fn honey<'a>() -> Product<'a> {
        Product {
            id: "honey".to_string(),
            default_price: Money::from_minor(100_000, INR),
            sale_price: Some(Money::from_minor(80_000, INR)),
            category: Some("pantry".to_string()),
            variants: vec![
                ProductVariant {
                    id: "500g".to_string(),
                    price: Money::from_minor(50_000, INR),
                    sale_price: None,
                },
                ProductVariant {
                    id: "1kg".to_string(),
                    price: Money::from_minor(95_000, INR),
                    sale_price: Some(Money::from_minor(90_000, INR)),
                },
            ],
        }
    }

    #[test]
    fn sale_price_wins_over_list_price() {
        assert_eq!(honey().base_price(None), Money::from_minor(80_000, INR));
    }

    #[test]
    fn list_price_used_without_sale() {
        let product = Product::new("jam", Money::from_minor(25_000, INR));

        assert_eq!(product.base_price(None), Money::from_minor(25_000, INR));
    }

    #[test]
    fn variant_prices_override_product_prices() {
        let product = honey();

        assert_eq!(product.base_price(Some("500g")), Money::from_minor(50_000, INR));
        assert_eq!(product.base_price(Some("1kg")), Money::from_minor(90_000, INR));
    }

    #[test]
    fn unknown_variant_falls_back_to_product() {
        assert_eq!(
            honey().base_price(Some("2kg")),
            Money::from_minor(80_000, INR)
        );
    }
}
