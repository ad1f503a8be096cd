//! Discount history service.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    domain::{
        discount_history::{
            data::NewDiscountChange, errors::DiscountHistoryServiceError,
            records::DiscountChangeRecord,
        },
        vendors::records::VendorUuid,
    },
    store::{Page, SharedStore},
};

/// Audit log reads and standalone appends.
///
/// Lifecycle operations write their audit entries together with the vendor record;
/// [`DiscountHistoryService::log_discount_change`] is for changes made elsewhere.
#[derive(Clone)]
pub struct DiscountHistoryLog {
    store: SharedStore,
}

impl DiscountHistoryLog {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl fmt::Debug for DiscountHistoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscountHistoryLog").finish_non_exhaustive()
    }
}

#[async_trait]
impl DiscountHistoryService for DiscountHistoryLog {
    #[tracing::instrument(
        name = "discount_history.service.log_discount_change",
        skip(self, change),
        fields(
            vendor_uuid = %change.vendor_uuid,
            change_type = %change.target.change_type(),
            changed_by = %change.changed_by.uid
        ),
        err
    )]
    async fn log_discount_change(
        &self,
        change: NewDiscountChange,
    ) -> Result<DiscountChangeRecord, DiscountHistoryServiceError> {
        change.check()?;

        let record = change.into_record(Timestamp::now());

        self.store.append_discount_change(record.clone()).await?;

        info!(change_uuid = %record.uuid, "logged discount change");

        Ok(record)
    }

    async fn get_vendor_discount_history(
        &self,
        vendor: VendorUuid,
        page: Page,
    ) -> Result<Vec<DiscountChangeRecord>, DiscountHistoryServiceError> {
        Ok(self.store.list_discount_changes(vendor, page).await?)
    }
}

#[automock]
#[async_trait]
pub trait DiscountHistoryService: Send + Sync {
    /// Append an audit entry.
    async fn log_discount_change(
        &self,
        change: NewDiscountChange,
    ) -> Result<DiscountChangeRecord, DiscountHistoryServiceError>;

    /// A vendor's audit entries, newest first.
    async fn get_vendor_discount_history(
        &self,
        vendor: VendorUuid,
        page: Page,
    ) -> Result<Vec<DiscountChangeRecord>, DiscountHistoryServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;
    use vendora::percent::DiscountPercent;

    use crate::{
        domain::{
            discount_history::records::DiscountTarget,
            users::{data::Actor, records::UserUuid},
        },
        store::{MemoryVendorStore, MockVendorStore, StoreError},
        test::helpers::pct,
    };

    use super::*;

    fn new_change(vendor: VendorUuid) -> Result<NewDiscountChange, vendora::percent::PercentError> {
        Ok(NewDiscountChange {
            vendor_uuid: vendor,
            vendor_name: "Hill Apiaries".to_string(),
            target: DiscountTarget::product("honey-1kg", "Honey 1kg"),
            previous_value: DiscountPercent::ZERO,
            new_value: pct(10)?,
            changed_by: Actor::new(UserUuid::new(), "Asha"),
            reason: Some("launch offer".to_string()),
        })
    }

    #[tokio::test]
    async fn logged_change_is_listed_first() -> TestResult {
        let log = DiscountHistoryLog::new(Arc::new(MemoryVendorStore::new()));
        let vendor = VendorUuid::new();

        log.log_discount_change(new_change(vendor)?).await?;
        let latest = log.log_discount_change(new_change(vendor)?).await?;

        let history = log.get_vendor_discount_history(vendor, Page::first()).await?;

        assert_eq!(history.len(), 2);
        assert_eq!(history.first().map(|c| c.uuid), Some(latest.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn invalid_change_never_reaches_the_store() -> TestResult {
        let mut store = MockVendorStore::new();
        store.expect_append_discount_change().never();

        let log = DiscountHistoryLog::new(Arc::new(store));

        let mut change = new_change(VendorUuid::new())?;
        change.changed_by.name = String::new();

        let result = log.log_discount_change(change).await;

        assert!(matches!(result, Err(DiscountHistoryServiceError::Validation(_))));

        Ok(())
    }

    #[tokio::test]
    async fn store_failure_is_reported() -> TestResult {
        let mut store = MockVendorStore::new();
        store
            .expect_append_discount_change()
            .times(1)
            .returning(|_| Err(StoreError::Corrupt("disk".to_string())));

        let log = DiscountHistoryLog::new(Arc::new(store));

        let result = log.log_discount_change(new_change(VendorUuid::new())?).await;

        assert!(matches!(
            result,
            Err(DiscountHistoryServiceError::Store(StoreError::Corrupt(_)))
        ));

        Ok(())
    }
}
