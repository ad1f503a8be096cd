//! `PostgreSQL` store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        discount_history::{
            records::DiscountChangeRecord, repository::PgDiscountHistoryRepository,
        },
        users::{
            records::{UserProfileRecord, UserUuid},
            repository::PgUsersRepository,
        },
        vendors::{
            records::{VendorRecord, VendorStatus, VendorUuid},
            repository::{ONE_APPROVED_PER_USER, ONE_PENDING_PER_USER, PgVendorsRepository},
        },
    },
    store::{ApplicationOutcome, Page, StoreError, VendorStore, VendorWrite},
};

/// A [`VendorStore`] running one transaction per operation.
#[derive(Debug, Clone)]
pub struct PgVendorStore {
    db: Db,
    vendors: PgVendorsRepository,
    users: PgUsersRepository,
    history: PgDiscountHistoryRepository,
}

impl PgVendorStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            db: Db::new(pool),
            vendors: PgVendorsRepository::new(),
            users: PgUsersRepository::new(),
            history: PgDiscountHistoryRepository::new(),
        }
    }
}

fn outcome_for(statuses: &[VendorStatus]) -> Option<ApplicationOutcome> {
    if statuses.contains(&VendorStatus::Approved) {
        Some(ApplicationOutcome::AlreadyVendor)
    } else if statuses.contains(&VendorStatus::Pending) {
        Some(ApplicationOutcome::PendingExists)
    } else {
        None
    }
}

fn violated_constraint(error: &sqlx::Error) -> Option<&str> {
    error.as_database_error().and_then(|e| e.constraint())
}

#[async_trait]
impl VendorStore for PgVendorStore {
    async fn get_vendor(&self, vendor: VendorUuid) -> Result<VendorRecord, StoreError> {
        let mut tx = self.db.begin().await?;

        let record = self.vendors.get_vendor(&mut tx, vendor).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_vendors(
        &self,
        user: UserUuid,
        status: Option<VendorStatus>,
    ) -> Result<Vec<VendorRecord>, StoreError> {
        let mut tx = self.db.begin().await?;

        let records = self
            .vendors
            .find_vendors_by_user(&mut tx, user, status)
            .await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn get_user(&self, user: UserUuid) -> Result<Option<UserProfileRecord>, StoreError> {
        let mut tx = self.db.begin().await?;

        let profile = self.users.get_user_profile(&mut tx, user).await?;

        tx.commit().await?;

        Ok(profile)
    }

    async fn insert_application(
        &self,
        vendor: VendorRecord,
    ) -> Result<ApplicationOutcome, StoreError> {
        let mut tx = self.db.begin().await?;

        let statuses = self
            .vendors
            .open_application_statuses(&mut tx, vendor.user_uuid)
            .await?;

        if let Some(outcome) = outcome_for(&statuses) {
            return Ok(outcome);
        }

        if let Err(error) = self.vendors.insert_vendor(&mut tx, &vendor).await {
            let constraint = violated_constraint(&error).map(str::to_string);

            return match constraint.as_deref() {
                Some(ONE_PENDING_PER_USER) => {
                    debug!(user_uuid = %vendor.user_uuid, "lost race to a concurrent application");

                    Ok(ApplicationOutcome::PendingExists)
                }
                Some(ONE_APPROVED_PER_USER) => Ok(ApplicationOutcome::AlreadyVendor),
                _ => Err(error.into()),
            };
        }

        tx.commit().await?;

        Ok(ApplicationOutcome::Created(vendor))
    }

    async fn commit_vendor_write(&self, write: VendorWrite) -> Result<VendorRecord, StoreError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.vendors.update_vendor(&mut tx, &write.vendor).await?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        if let Some(profile) = &write.user {
            self.users.upsert_user_profile(&mut tx, profile).await?;
        }

        for change in &write.changes {
            self.history.insert_discount_change(&mut tx, change).await?;
        }

        tx.commit().await?;

        Ok(write.vendor)
    }

    async fn append_discount_change(
        &self,
        change: DiscountChangeRecord,
    ) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await?;

        self.history.insert_discount_change(&mut tx, &change).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_discount_changes(
        &self,
        vendor: VendorUuid,
        page: Page,
    ) -> Result<Vec<DiscountChangeRecord>, StoreError> {
        let mut tx = self.db.begin().await?;

        let changes = self
            .history
            .list_discount_changes(&mut tx, vendor, page)
            .await?;

        tx.commit().await?;

        Ok(changes)
    }
}
