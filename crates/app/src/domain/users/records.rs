//! User Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{domain::vendors::records::VendorUuid, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<UserProfileRecord>;

/// The vendor-related part of a user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileRecord {
    /// User identifier.
    pub uuid: UserUuid,

    /// Whether the user has an approved vendor.
    pub is_vendor: bool,

    /// Back-reference to the user's approved vendor.
    pub vendor_uuid: Option<VendorUuid>,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

impl UserProfileRecord {
    /// A profile for a user that has never been linked to a vendor.
    #[must_use]
    pub fn new(uuid: UserUuid, now: Timestamp) -> Self {
        Self {
            uuid,
            is_vendor: false,
            vendor_uuid: None,
            updated_at: now,
        }
    }

    /// Mark the user as owning `vendor`.
    #[must_use]
    pub fn linked_to(mut self, vendor: VendorUuid, now: Timestamp) -> Self {
        self.is_vendor = true;
        self.vendor_uuid = Some(vendor);
        self.updated_at = now;
        self
    }
}
