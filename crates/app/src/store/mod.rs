//! Vendor Record Store
//!
//! Persistence for vendor records, user profiles and the discount audit log.
//! Services never talk to a database directly; they go through [`VendorStore`].

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    discount_history::records::DiscountChangeRecord,
    users::records::{UserProfileRecord, UserUuid},
    vendors::records::{VendorRecord, VendorStatus, VendorUuid},
};

mod memory;
mod postgres;

pub use memory::MemoryVendorStore;
pub use postgres::PgVendorStore;

/// Shared handle to a store.
pub type SharedStore = Arc<dyn VendorStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    Conflict,

    #[error("related record not found")]
    InvalidReference,

    #[error("record violates a storage constraint")]
    InvalidData,

    #[error("stored record is corrupt: {0}")]
    Corrupt(String),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        if let Error::ColumnDecode { index, source } = &error {
            return Self::Corrupt(format!("{index}: {source}"));
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

/// Offset pagination for history listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    /// Entries returned when no limit is given.
    pub const DEFAULT_LIMIT: u32 = 50;

    /// Largest accepted limit; bigger requests are clamped.
    pub const MAX_LIMIT: u32 = 500;

    /// A page with `limit` clamped to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// The first page of default size.
    #[must_use]
    pub fn first() -> Self {
        Self::default()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// A vendor record update and everything that must land with it.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorWrite {
    /// Full replacement for the stored record.
    pub vendor: VendorRecord,

    /// Profile to upsert alongside the record.
    pub user: Option<UserProfileRecord>,

    /// Audit entries describing the update.
    pub changes: SmallVec<[DiscountChangeRecord; 2]>,
}

impl VendorWrite {
    pub fn new(vendor: VendorRecord) -> Self {
        Self {
            vendor,
            user: None,
            changes: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: UserProfileRecord) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn with_changes(mut self, changes: impl IntoIterator<Item = DiscountChangeRecord>) -> Self {
        self.changes.extend(changes);
        self
    }
}

/// Result of an application insert.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationOutcome {
    /// The application was stored.
    Created(VendorRecord),

    /// The user already has a pending application; nothing was stored.
    PendingExists,

    /// The user already has an approved vendor; nothing was stored.
    AlreadyVendor,
}

#[automock]
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Fetch a vendor record.
    async fn get_vendor(&self, vendor: VendorUuid) -> Result<VendorRecord, StoreError>;

    /// Vendor records owned by `user`, newest application first, optionally
    /// filtered by status.
    async fn find_vendors(
        &self,
        user: UserUuid,
        status: Option<VendorStatus>,
    ) -> Result<Vec<VendorRecord>, StoreError>;

    /// Fetch a user's profile, if one has been written.
    async fn get_user(&self, user: UserUuid) -> Result<Option<UserProfileRecord>, StoreError>;

    /// Insert a pending application unless the owner already has a pending or
    /// approved vendor. The check and insert are atomic.
    async fn insert_application(
        &self,
        vendor: VendorRecord,
    ) -> Result<ApplicationOutcome, StoreError>;

    /// Replace an existing vendor record, upsert the profile and append the audit
    /// entries. Either all of it is stored or none of it.
    async fn commit_vendor_write(&self, write: VendorWrite) -> Result<VendorRecord, StoreError>;

    /// Append a single audit entry.
    async fn append_discount_change(&self, change: DiscountChangeRecord)
    -> Result<(), StoreError>;

    /// Audit entries for `vendor`, newest first.
    async fn list_discount_changes(
        &self,
        vendor: VendorUuid,
        page: Page,
    ) -> Result<Vec<DiscountChangeRecord>, StoreError>;
}
