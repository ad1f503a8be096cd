//! Vendor pricing service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, warn};
use vendora::{
    products::Product,
    resolver::{PriceQuote, quote},
    vendors::VendorDiscounts,
};

use crate::domain::{users::records::UserUuid, vendors::VendorsService};

/// Resolves prices through the user's approved vendor, if any.
#[derive(Clone)]
pub struct VendorPricing {
    vendors: Arc<dyn VendorsService>,
}

impl VendorPricing {
    #[must_use]
    pub fn new(vendors: Arc<dyn VendorsService>) -> Self {
        Self { vendors }
    }
}

impl fmt::Debug for VendorPricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorPricing").finish_non_exhaustive()
    }
}

#[async_trait]
impl VendorPricingService for VendorPricing {
    async fn vendor_terms_for_user(&self, user: Option<UserUuid>) -> Option<VendorDiscounts> {
        let user = user?;

        match self.vendors.get_vendor_by_user(user).await {
            Ok(vendor) => vendor.map(|vendor| vendor.discounts),
            Err(error) => {
                warn!(user_uuid = %user, %error, "vendor lookup failed, using list price");

                None
            }
        }
    }

    #[tracing::instrument(
        name = "pricing.service.quote_for_user",
        skip(self, product),
        fields(product_id = %product.id, discount = tracing::field::Empty)
    )]
    async fn quote_for_user(
        &self,
        user: Option<UserUuid>,
        product: &Product<'static>,
        variant: Option<String>,
        quantity: Option<u32>,
    ) -> PriceQuote<'static> {
        let terms = self.vendor_terms_for_user(user).await;
        let base = product.base_price(variant.as_deref());

        let priced = quote(&base, terms.as_ref(), &product.id, quantity);

        Span::current().record("discount", tracing::field::display(priced.discount));

        priced
    }
}

#[automock]
#[async_trait]
pub trait VendorPricingService: Send + Sync {
    /// Discount terms of the user's approved vendor.
    ///
    /// `None` for anonymous users, users without an approved vendor, and when the
    /// lookup fails.
    async fn vendor_terms_for_user(&self, user: Option<UserUuid>) -> Option<VendorDiscounts>;

    /// Price `product` (optionally a variant, optionally in bulk) for `user`.
    ///
    /// Never fails; anything that prevents finding vendor terms yields list price.
    async fn quote_for_user(
        &self,
        user: Option<UserUuid>,
        product: &Product<'static>,
        variant: Option<String>,
        quantity: Option<u32>,
    ) -> PriceQuote<'static>;
}
