//! Vendor Lifecycle
//!
//! Pure state transitions. Each function takes the current record and returns the
//! complete write to persist: the updated record, the profile link where one
//! changes, and one audit entry per discount value that moved. Functions that
//! edit a discount return `None` when the requested value is already in place.
//!
//! ```text
//! pending ──approve──▶ approved ──discount edits──▶ approved
//!    │
//!    └─────reject────▶ rejected (terminal)
//! ```

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use vendora::{percent::DiscountPercent, tiers::BulkTiers};

use crate::{
    domain::{
        discount_history::{
            data::NewDiscountChange,
            records::{DiscountChangeRecord, DiscountTarget},
        },
        users::{data::Actor, records::UserProfileRecord},
        vendors::{
            data::ProductRef,
            errors::VendorsServiceError,
            records::{VendorRecord, VendorStatus},
        },
    },
    store::VendorWrite,
};

/// Approve a pending application with its starting default discount.
///
/// Links the owner's profile to the vendor and records the default discount as a
/// change from zero.
///
/// # Errors
///
/// [`VendorsServiceError::InvalidTransition`] unless the vendor is pending.
pub fn approve(
    vendor: &VendorRecord,
    default_discount: DiscountPercent,
    reviewer: &Actor,
    now: Timestamp,
) -> Result<VendorWrite, VendorsServiceError> {
    ensure_pending(vendor, VendorStatus::Approved)?;

    let mut approved = vendor.clone();

    approved.status = VendorStatus::Approved;
    approved.discounts.default_discount = default_discount;
    approved.reviewed_at = Some(now);
    approved.reviewed_by = Some(reviewer.uid);
    approved.touch(reviewer.uid, now);

    let change = audit(
        &approved,
        DiscountTarget::Default,
        DiscountPercent::ZERO,
        default_discount,
        reviewer,
        None,
        now,
    );

    let profile = UserProfileRecord::new(vendor.user_uuid, now).linked_to(vendor.uuid, now);

    Ok(VendorWrite::new(approved)
        .with_user(profile)
        .with_changes([change]))
}

/// Reject a pending application.
///
/// # Errors
///
/// [`VendorsServiceError::InvalidTransition`] unless the vendor is pending.
pub fn reject(
    vendor: &VendorRecord,
    reviewer: &Actor,
    now: Timestamp,
) -> Result<VendorWrite, VendorsServiceError> {
    ensure_pending(vendor, VendorStatus::Rejected)?;

    let mut rejected = vendor.clone();

    rejected.status = VendorStatus::Rejected;
    rejected.reviewed_at = Some(now);
    rejected.reviewed_by = Some(reviewer.uid);
    rejected.touch(reviewer.uid, now);

    Ok(VendorWrite::new(rejected))
}

/// Change the default discount.
///
/// # Errors
///
/// [`VendorsServiceError::NotApproved`] unless the vendor is approved.
pub fn set_default_discount(
    vendor: &VendorRecord,
    discount: DiscountPercent,
    editor: &Actor,
    reason: Option<&str>,
    now: Timestamp,
) -> Result<Option<VendorWrite>, VendorsServiceError> {
    ensure_approved(vendor)?;

    let previous = vendor.discounts.default_discount;

    if previous == discount {
        return Ok(None);
    }

    let mut updated = vendor.clone();

    updated.discounts.default_discount = discount;
    updated.touch(editor.uid, now);

    let change = audit(
        &updated,
        DiscountTarget::Default,
        previous,
        discount,
        editor,
        reason,
        now,
    );

    Ok(Some(VendorWrite::new(updated).with_changes([change])))
}

/// Set (`Some`) or remove (`None`) a product override.
///
/// A missing override counts as zero, so setting zero on a product without one
/// changes nothing. Removal is audited as a change to zero.
///
/// # Errors
///
/// [`VendorsServiceError::NotApproved`] unless the vendor is approved.
pub fn set_product_discount(
    vendor: &VendorRecord,
    product: &ProductRef,
    discount: Option<DiscountPercent>,
    editor: &Actor,
    reason: Option<&str>,
    now: Timestamp,
) -> Result<Option<VendorWrite>, VendorsServiceError> {
    ensure_approved(vendor)?;

    let existing = vendor.discounts.product_discount(&product.id);

    let unchanged = match discount {
        Some(value) => existing.unwrap_or(DiscountPercent::ZERO) == value,
        None => existing.is_none(),
    };

    if unchanged {
        return Ok(None);
    }

    let mut updated = vendor.clone();

    match discount {
        Some(value) => {
            updated
                .discounts
                .product_discounts
                .insert(product.id.clone(), value);
        }
        None => {
            updated.discounts.product_discounts.remove(&product.id);
        }
    }

    updated.touch(editor.uid, now);

    let change = audit(
        &updated,
        DiscountTarget::product(product.id.clone(), product.name.clone()),
        existing.unwrap_or(DiscountPercent::ZERO),
        discount.unwrap_or(DiscountPercent::ZERO),
        editor,
        reason,
        now,
    );

    Ok(Some(VendorWrite::new(updated).with_changes([change])))
}

/// Replace the bulk tiers.
///
/// Every threshold that was added, removed or re-priced gets its own audit entry,
/// in ascending threshold order. Absent tiers count as zero.
///
/// # Errors
///
/// [`VendorsServiceError::NotApproved`] unless the vendor is approved.
pub fn set_bulk_tiers(
    vendor: &VendorRecord,
    tiers: BulkTiers,
    editor: &Actor,
    reason: Option<&str>,
    now: Timestamp,
) -> Result<Option<VendorWrite>, VendorsServiceError> {
    ensure_approved(vendor)?;

    let current = &vendor.discounts.bulk_tiers;

    if *current == tiers {
        return Ok(None);
    }

    let mut thresholds: Vec<u32> = current
        .iter()
        .chain(tiers.iter())
        .map(|tier| tier.min_quantity)
        .collect::<FxHashSet<_>>()
        .into_iter()
        .collect();

    thresholds.sort_unstable();

    let mut updated = vendor.clone();

    updated.discounts.bulk_tiers = tiers;
    updated.touch(editor.uid, now);

    let changes: Vec<_> = thresholds
        .into_iter()
        .filter_map(|min_quantity| {
            let before = current.at(min_quantity).copied();
            let after = updated.discounts.bulk_tiers.at(min_quantity).copied();

            (before != after).then(|| {
                audit(
                    &updated,
                    DiscountTarget::BulkTier { min_quantity },
                    before.map_or(DiscountPercent::ZERO, |tier| tier.discount),
                    after.map_or(DiscountPercent::ZERO, |tier| tier.discount),
                    editor,
                    reason,
                    now,
                )
            })
        })
        .collect();

    Ok(Some(VendorWrite::new(updated).with_changes(changes)))
}

fn ensure_pending(vendor: &VendorRecord, to: VendorStatus) -> Result<(), VendorsServiceError> {
    if vendor.status == VendorStatus::Pending {
        Ok(())
    } else {
        Err(VendorsServiceError::InvalidTransition {
            from: vendor.status,
            to,
        })
    }
}

fn ensure_approved(vendor: &VendorRecord) -> Result<(), VendorsServiceError> {
    if vendor.is_approved() {
        Ok(())
    } else {
        Err(VendorsServiceError::NotApproved(vendor.status))
    }
}

fn audit(
    vendor: &VendorRecord,
    target: DiscountTarget,
    previous_value: DiscountPercent,
    new_value: DiscountPercent,
    actor: &Actor,
    reason: Option<&str>,
    now: Timestamp,
) -> DiscountChangeRecord {
    NewDiscountChange {
        vendor_uuid: vendor.uuid,
        vendor_name: vendor.business_name.clone(),
        target,
        previous_value,
        new_value,
        changed_by: actor.clone(),
        reason: reason.map(str::to_string),
    }
    .into_record(now)
}
