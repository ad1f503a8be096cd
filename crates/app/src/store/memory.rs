//! In-process store.

use std::{cmp::Reverse, sync::Arc};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::{
    domain::{
        discount_history::records::DiscountChangeRecord,
        users::records::{UserProfileRecord, UserUuid},
        vendors::records::{VendorRecord, VendorStatus, VendorUuid},
    },
    store::{ApplicationOutcome, Page, StoreError, VendorStore, VendorWrite},
};

#[derive(Debug, Default)]
struct State {
    vendors: FxHashMap<VendorUuid, VendorRecord>,
    users: FxHashMap<UserUuid, UserProfileRecord>,
    changes: Vec<DiscountChangeRecord>,
}

/// A [`VendorStore`] held in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryVendorStore {
    state: Arc<RwLock<State>>,
}

impl MemoryVendorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VendorStore for MemoryVendorStore {
    async fn get_vendor(&self, vendor: VendorUuid) -> Result<VendorRecord, StoreError> {
        self.state
            .read()
            .await
            .vendors
            .get(&vendor)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_vendors(
        &self,
        user: UserUuid,
        status: Option<VendorStatus>,
    ) -> Result<Vec<VendorRecord>, StoreError> {
        let state = self.state.read().await;

        let mut vendors: Vec<VendorRecord> = state
            .vendors
            .values()
            .filter(|vendor| vendor.user_uuid == user)
            .filter(|vendor| status.is_none_or(|status| vendor.status == status))
            .cloned()
            .collect();

        vendors.sort_by_key(|vendor| Reverse((vendor.applied_at, vendor.uuid)));

        Ok(vendors)
    }

    async fn get_user(&self, user: UserUuid) -> Result<Option<UserProfileRecord>, StoreError> {
        Ok(self.state.read().await.users.get(&user).cloned())
    }

    async fn insert_application(
        &self,
        vendor: VendorRecord,
    ) -> Result<ApplicationOutcome, StoreError> {
        let mut state = self.state.write().await;

        let mut owned = state
            .vendors
            .values()
            .filter(|existing| existing.user_uuid == vendor.user_uuid);

        if let Some(existing) = owned.find(|existing| existing.status != VendorStatus::Rejected) {
            return Ok(match existing.status {
                VendorStatus::Approved => ApplicationOutcome::AlreadyVendor,
                VendorStatus::Pending | VendorStatus::Rejected => ApplicationOutcome::PendingExists,
            });
        }

        if state.vendors.contains_key(&vendor.uuid) {
            return Err(StoreError::Conflict);
        }

        state.vendors.insert(vendor.uuid, vendor.clone());

        Ok(ApplicationOutcome::Created(vendor))
    }

    async fn commit_vendor_write(&self, write: VendorWrite) -> Result<VendorRecord, StoreError> {
        let mut state = self.state.write().await;

        let VendorWrite {
            vendor,
            user,
            changes,
        } = write;

        let Some(slot) = state.vendors.get_mut(&vendor.uuid) else {
            return Err(StoreError::NotFound);
        };

        *slot = vendor.clone();

        if let Some(user) = user {
            state.users.insert(user.uuid, user);
        }

        state.changes.extend(changes);

        Ok(vendor)
    }

    async fn append_discount_change(
        &self,
        change: DiscountChangeRecord,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        if state.changes.iter().any(|existing| existing.uuid == change.uuid) {
            return Err(StoreError::Conflict);
        }

        state.changes.push(change);

        Ok(())
    }

    async fn list_discount_changes(
        &self,
        vendor: VendorUuid,
        page: Page,
    ) -> Result<Vec<DiscountChangeRecord>, StoreError> {
        let state = self.state.read().await;

        let mut changes: Vec<&DiscountChangeRecord> = state
            .changes
            .iter()
            .filter(|change| change.vendor_uuid == vendor)
            .collect();

        changes.sort_by_key(|change| Reverse((change.changed_at, change.uuid)));

        Ok(changes
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }
}
