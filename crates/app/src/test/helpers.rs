//! Test Helpers

use jiff::Timestamp;
use vendora::{
    percent::{DiscountPercent, PercentError},
    vendors::VendorDiscounts,
};

use crate::domain::{
    users::{data::Actor, records::UserUuid},
    vendors::{
        data::NewVendorApplication,
        records::{BusinessType, Location, VendorRecord, VendorStatus, VendorUuid},
    },
};

pub(crate) fn pct(points: u8) -> Result<DiscountPercent, PercentError> {
    DiscountPercent::try_from(points)
}

pub(crate) fn admin() -> Actor {
    Actor::new(UserUuid::new(), "Asha Admin")
}

pub(crate) fn application(user: UserUuid) -> NewVendorApplication {
    NewVendorApplication {
        user_uuid: user,
        business_name: "Hill Apiaries".to_string(),
        business_type: BusinessType::Wholesaler,
        phone: "9876543210".to_string(),
        email: "orders@hillapiaries.in".to_string(),
        location: Location::Manual {
            address: "12 Market Road, Coorg".to_string(),
        },
    }
}

pub(crate) fn pending_vendor(user: UserUuid) -> VendorRecord {
    application(user).into_record(VendorUuid::new(), Timestamp::now())
}

pub(crate) fn approved_vendor(user: UserUuid, default_discount: DiscountPercent) -> VendorRecord {
    let mut vendor = pending_vendor(user);

    vendor.status = VendorStatus::Approved;
    vendor.discounts = VendorDiscounts::with_default(default_discount);
    vendor.reviewed_at = Some(vendor.applied_at);

    vendor
}
