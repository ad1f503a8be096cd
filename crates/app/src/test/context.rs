//! Test context for service-level tests.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    domain::{
        discount_history::DiscountHistoryLog,
        pricing::VendorPricing,
        users::records::UserUuid,
        vendors::{VendorsManager, VendorsService, VendorsServiceError, records::VendorRecord},
    },
    store::MemoryVendorStore,
    test::helpers::{admin, application},
};

/// Services wired to a fresh in-memory store.
pub(crate) struct TestContext {
    pub store: MemoryVendorStore,
    pub vendors: VendorsManager,
    pub history: DiscountHistoryLog,
    pub pricing: VendorPricing,
}

impl TestContext {
    pub(crate) fn new() -> Self {
        let store = MemoryVendorStore::new();
        let shared = Arc::new(store.clone());

        let vendors = VendorsManager::new(shared.clone());

        Self {
            history: DiscountHistoryLog::new(shared),
            pricing: VendorPricing::new(Arc::new(vendors.clone())),
            vendors,
            store,
        }
    }

    /// Submit and approve an application for `user`.
    pub(crate) async fn approved_vendor(
        &self,
        user: UserUuid,
        default_discount: u8,
    ) -> Result<VendorRecord, VendorsServiceError> {
        let pending = self
            .vendors
            .create_vendor_application(application(user))
            .await?;

        self.vendors
            .approve(pending.uuid, Decimal::from(default_discount), admin())
            .await
    }
}
