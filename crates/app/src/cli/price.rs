use clap::Args;
use rust_decimal::Decimal;
use rusty_money::Money;
use serde_json::json;
use vendora::products::Product;
use vendora_app::{
    config::PricingConfig, context::AppContext, domain::users::records::UserUuid,
};

use super::print_json;

#[derive(Debug, Args)]
pub(crate) struct PriceArgs {
    /// Product id
    #[arg(long)]
    product: String,

    /// List price in major units, e.g. 800.00
    #[arg(long)]
    price: Decimal,

    /// Sale price in major units
    #[arg(long)]
    sale_price: Option<Decimal>,

    /// Buyer's user UID; omit for an anonymous buyer
    #[arg(long)]
    user: Option<UserUuid>,

    /// Quantity, used to select a bulk tier
    #[arg(long)]
    quantity: Option<u32>,
}

pub(crate) async fn run(
    context: &AppContext,
    pricing: &PricingConfig,
    args: PriceArgs,
) -> Result<(), String> {
    let currency = pricing.currency().map_err(|error| error.to_string())?;

    let mut product = Product::new(args.product, Money::from_decimal(args.price, currency));
    product.sale_price = args
        .sale_price
        .map(|sale| Money::from_decimal(sale, currency));

    let quote = context
        .pricing
        .quote_for_user(args.user, &product, None, args.quantity)
        .await;

    print_json(&json!({
        "product_id": product.id,
        "currency": currency.iso_alpha_code,
        "base": quote.base.to_string(),
        "price": quote.price.to_string(),
        "savings": quote.savings.to_string(),
        "discount_percent": quote.discount,
        "price_minor_units": quote.price.to_minor_units(),
    }))
}
