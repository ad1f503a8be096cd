//! Vendor Data

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;
use vendora::vendors::VendorDiscounts;

use crate::domain::{
    users::{data::Actor, records::UserUuid},
    validation::{not_blank, ten_digit_phone},
    vendors::records::{BusinessType, Location, VendorRecord, VendorStatus, VendorUuid},
};

/// New Vendor Application Data
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct NewVendorApplication {
    pub user_uuid: UserUuid,

    #[validate(custom(function = "not_blank"))]
    pub business_name: String,

    pub business_type: BusinessType,

    /// Ten digits, no separators.
    #[validate(custom(function = "ten_digit_phone"))]
    pub phone: String,

    #[validate(email(message = "must be an email address"))]
    pub email: String,

    #[validate(custom(function = "address_present"))]
    pub location: Location,
}

fn address_present(location: &Location) -> Result<(), validator::ValidationError> {
    not_blank(location.address())
}

impl NewVendorApplication {
    /// A pending record with no discounts, submitted at `now`.
    #[must_use]
    pub fn into_record(self, uuid: VendorUuid, now: Timestamp) -> VendorRecord {
        VendorRecord {
            uuid,
            user_uuid: self.user_uuid,
            business_name: self.business_name.trim().to_string(),
            business_type: self.business_type,
            phone: self.phone,
            email: self.email.trim().to_string(),
            location: self.location,
            status: VendorStatus::Pending,
            discounts: VendorDiscounts::default(),
            applied_at: now,
            reviewed_at: None,
            reviewed_by: None,
            last_modified_at: None,
            last_modified_by: None,
        }
    }
}

/// The product a discount override applies to.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ProductRef {
    #[validate(custom(function = "not_blank"))]
    pub id: String,

    /// Product name, recorded in the audit log.
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

impl ProductRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A requested discount change.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountEdit {
    /// New value in percent points; validated to `0..=100` by the service.
    pub discount: Decimal,

    pub editor: Actor,

    /// Optional free-text justification stored with the audit entry.
    pub reason: Option<String>,
}

impl DiscountEdit {
    pub fn new(discount: Decimal, editor: Actor) -> Self {
        Self {
            discount,
            editor,
            reason: None,
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// A requested bulk tier, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NewBulkTier {
    pub min_quantity: u32,
    pub discount: Decimal,
}

#[cfg(test)]
mod tests {
    use crate::domain::{validation::ValidationError, vendors::records::Coordinates};

    use super::*;

    fn application() -> NewVendorApplication {
        NewVendorApplication {
            user_uuid: UserUuid::new(),
            business_name: "Hill Apiaries".to_string(),
            business_type: BusinessType::Wholesaler,
            phone: "9876543210".to_string(),
            email: "orders@hillapiaries.in".to_string(),
            location: Location::Manual {
                address: "12 Market Road, Coorg".to_string(),
            },
        }
    }

    fn check(app: &NewVendorApplication) -> Result<(), ValidationError> {
        app.validate().map_err(ValidationError::from)
    }

    #[test]
    fn valid_application_passes() {
        assert_eq!(check(&application()), Ok(()));
    }

    #[test]
    fn new_record_is_pending_without_discounts() {
        let now = Timestamp::now();
        let uuid = VendorUuid::new();

        let record = application().into_record(uuid, now);

        assert_eq!(record.uuid, uuid);
        assert_eq!(record.status, VendorStatus::Pending);
        assert_eq!(record.discounts, VendorDiscounts::default());
        assert_eq!(record.applied_at, now);
        assert_eq!(record.reviewed_at, None);
    }

    #[test]
    fn blank_geolocation_address_is_rejected() {
        let mut app = application();
        app.location = Location::Geolocation {
            coordinates: Coordinates { lat: 0.0, lng: 0.0 },
            address: " ".to_string(),
        };

        let result = check(&app);

        assert!(
            matches!(&result, Err(error) if error.has_field("location")),
            "expected location issue, got {result:?}"
        );
    }

    #[test]
    fn every_bad_field_is_reported() {
        let mut app = application();
        app.business_name = String::new();
        app.phone = "12345".to_string();
        app.email = "orders@hill apiaries".to_string();

        let result = check(&app);

        assert!(
            matches!(&result, Err(error) if error.issues().len() == 3),
            "expected three issues, got {result:?}"
        );
    }

    #[test]
    fn blank_product_reference_is_rejected_per_field() {
        let result = ProductRef::new(" ", "")
            .validate()
            .map_err(ValidationError::from);

        assert!(
            matches!(&result, Err(error) if error.has_field("id") && error.has_field("name")),
            "expected id and name issues, got {result:?}"
        );
    }
}
