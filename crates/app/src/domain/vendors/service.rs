//! Vendors service.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{Span, debug, info};
use vendora::tiers::BulkTier;

use crate::{
    domain::{
        users::{data::Actor, records::UserUuid},
        validation::Validator,
        vendors::{
            data::{DiscountEdit, NewBulkTier, NewVendorApplication, ProductRef},
            errors::VendorsServiceError,
            lifecycle,
            records::{VendorRecord, VendorStatus, VendorUuid},
        },
    },
    store::{ApplicationOutcome, SharedStore, StoreError, VendorWrite},
};

/// Vendor lifecycle and discount management backed by a [`VendorStore`](crate::store::VendorStore).
#[derive(Clone)]
pub struct VendorsManager {
    store: SharedStore,
}

impl VendorsManager {
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    async fn commit(&self, write: VendorWrite) -> Result<VendorRecord, VendorsServiceError> {
        let changes = write.changes.len();
        let vendor = self.store.commit_vendor_write(write).await?;

        Span::current().record("audit_entries", changes);

        Ok(vendor)
    }
}

impl fmt::Debug for VendorsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorsManager").finish_non_exhaustive()
    }
}

#[async_trait]
impl VendorsService for VendorsManager {
    async fn get_vendor(&self, vendor: VendorUuid) -> Result<VendorRecord, VendorsServiceError> {
        Ok(self.store.get_vendor(vendor).await?)
    }

    #[tracing::instrument(
        name = "vendors.service.get_vendor_by_user",
        skip(self),
        fields(user_uuid = %user, vendor_uuid = tracing::field::Empty),
        err
    )]
    async fn get_vendor_by_user(
        &self,
        user: UserUuid,
    ) -> Result<Option<VendorRecord>, VendorsServiceError> {
        let linked = match self.store.get_user(user).await? {
            Some(profile) => profile.vendor_uuid,
            None => None,
        };

        if let Some(linked) = linked {
            match self.store.get_vendor(linked).await {
                Ok(vendor) if vendor.is_approved() && vendor.user_uuid == user => {
                    Span::current().record("vendor_uuid", tracing::field::display(vendor.uuid));

                    return Ok(Some(vendor));
                }
                Ok(_) | Err(StoreError::NotFound) => {
                    debug!(vendor_uuid = %linked, "profile link is stale, searching by owner");
                }
                Err(error) => return Err(error.into()),
            }
        }

        let vendor = self
            .store
            .find_vendors(user, Some(VendorStatus::Approved))
            .await?
            .into_iter()
            .next();

        if let Some(vendor) = &vendor {
            Span::current().record("vendor_uuid", tracing::field::display(vendor.uuid));
        }

        Ok(vendor)
    }

    async fn has_pending_application(&self, user: UserUuid) -> Result<bool, VendorsServiceError> {
        let pending = self
            .store
            .find_vendors(user, Some(VendorStatus::Pending))
            .await?;

        Ok(!pending.is_empty())
    }

    #[tracing::instrument(
        name = "vendors.service.create_vendor_application",
        skip(self, application),
        fields(
            user_uuid = %application.user_uuid,
            business_type = application.business_type.as_str(),
            vendor_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn create_vendor_application(
        &self,
        application: NewVendorApplication,
    ) -> Result<VendorRecord, VendorsServiceError> {
        let mut validator = Validator::new();
        validator.check(&application);
        validator.finish()?;

        let record = application.into_record(VendorUuid::new(), Timestamp::now());

        Span::current().record("vendor_uuid", tracing::field::display(record.uuid));

        match self.store.insert_application(record).await? {
            ApplicationOutcome::Created(vendor) => {
                info!(vendor_uuid = %vendor.uuid, "submitted vendor application");

                Ok(vendor)
            }
            ApplicationOutcome::PendingExists => Err(VendorsServiceError::PendingApplication),
            ApplicationOutcome::AlreadyVendor => Err(VendorsServiceError::AlreadyVendor),
        }
    }

    #[tracing::instrument(
        name = "vendors.service.approve",
        skip(self, reviewer),
        fields(
            vendor_uuid = %vendor,
            reviewer_uuid = %reviewer.uid,
            audit_entries = tracing::field::Empty
        ),
        err
    )]
    async fn approve(
        &self,
        vendor: VendorUuid,
        default_discount: Decimal,
        reviewer: Actor,
    ) -> Result<VendorRecord, VendorsServiceError> {
        let default_discount = {
            let mut validator = Validator::new();
            let discount = validator.percent("discount", default_discount);

            validate_actor(&mut validator, &reviewer);
            validator.finish()?;

            discount
        };

        let current = self.store.get_vendor(vendor).await?;
        let write = lifecycle::approve(&current, default_discount, &reviewer, Timestamp::now())?;
        let approved = self.commit(write).await?;

        info!(
            vendor_uuid = %approved.uuid,
            user_uuid = %approved.user_uuid,
            default_discount = %approved.discounts.default_discount,
            "approved vendor"
        );

        Ok(approved)
    }

    #[tracing::instrument(
        name = "vendors.service.reject",
        skip(self, reviewer),
        fields(vendor_uuid = %vendor, reviewer_uuid = %reviewer.uid),
        err
    )]
    async fn reject(
        &self,
        vendor: VendorUuid,
        reviewer: Actor,
    ) -> Result<VendorRecord, VendorsServiceError> {
        let current = self.store.get_vendor(vendor).await?;
        let write = lifecycle::reject(&current, &reviewer, Timestamp::now())?;
        let rejected = self.store.commit_vendor_write(write).await?;

        info!(vendor_uuid = %rejected.uuid, "rejected vendor");

        Ok(rejected)
    }

    #[tracing::instrument(
        name = "vendors.service.update_default_discount",
        skip(self, edit),
        fields(
            vendor_uuid = %vendor,
            editor_uuid = %edit.editor.uid,
            audit_entries = tracing::field::Empty
        ),
        err
    )]
    async fn update_default_discount(
        &self,
        vendor: VendorUuid,
        edit: DiscountEdit,
    ) -> Result<VendorRecord, VendorsServiceError> {
        let discount = {
            let mut validator = Validator::new();
            let discount = validator.percent("discount", edit.discount);

            validate_actor(&mut validator, &edit.editor);
            validator.finish()?;

            discount
        };

        let current = self.store.get_vendor(vendor).await?;

        let Some(write) = lifecycle::set_default_discount(
            &current,
            discount,
            &edit.editor,
            edit.reason.as_deref(),
            Timestamp::now(),
        )?
        else {
            debug!("default discount unchanged");

            return Ok(current);
        };

        let updated = self.commit(write).await?;

        info!(
            vendor_uuid = %updated.uuid,
            default_discount = %updated.discounts.default_discount,
            "updated default discount"
        );

        Ok(updated)
    }

    #[tracing::instrument(
        name = "vendors.service.update_product_discount",
        skip(self, product, edit),
        fields(
            vendor_uuid = %vendor,
            product_id = %product.id,
            editor_uuid = %edit.editor.uid,
            audit_entries = tracing::field::Empty
        ),
        err
    )]
    async fn update_product_discount(
        &self,
        vendor: VendorUuid,
        product: ProductRef,
        edit: DiscountEdit,
    ) -> Result<VendorRecord, VendorsServiceError> {
        let discount = {
            let mut validator = Validator::new();
            let discount = validator.percent("discount", edit.discount);

            validator.check_nested("product", &product);
            validate_actor(&mut validator, &edit.editor);
            validator.finish()?;

            discount
        };

        let current = self.store.get_vendor(vendor).await?;

        let Some(write) = lifecycle::set_product_discount(
            &current,
            &product,
            Some(discount),
            &edit.editor,
            edit.reason.as_deref(),
            Timestamp::now(),
        )?
        else {
            debug!("product discount unchanged");

            return Ok(current);
        };

        let updated = self.commit(write).await?;

        info!(
            vendor_uuid = %updated.uuid,
            product_id = %product.id,
            discount = %discount,
            "updated product discount"
        );

        Ok(updated)
    }

    #[tracing::instrument(
        name = "vendors.service.remove_product_discount",
        skip(self, product, editor, reason),
        fields(
            vendor_uuid = %vendor,
            product_id = %product.id,
            editor_uuid = %editor.uid,
            audit_entries = tracing::field::Empty
        ),
        err
    )]
    async fn remove_product_discount(
        &self,
        vendor: VendorUuid,
        product: ProductRef,
        editor: Actor,
        reason: Option<String>,
    ) -> Result<VendorRecord, VendorsServiceError> {
        let mut validator = Validator::new();

        validator.check_nested("product", &product);
        validate_actor(&mut validator, &editor);
        validator.finish()?;

        let current = self.store.get_vendor(vendor).await?;

        let Some(write) = lifecycle::set_product_discount(
            &current,
            &product,
            None,
            &editor,
            reason.as_deref(),
            Timestamp::now(),
        )?
        else {
            debug!("no product discount to remove");

            return Ok(current);
        };

        let updated = self.commit(write).await?;

        info!(vendor_uuid = %updated.uuid, product_id = %product.id, "removed product discount");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "vendors.service.update_bulk_tiers",
        skip(self, tiers, editor, reason),
        fields(
            vendor_uuid = %vendor,
            tier_count = tiers.len(),
            editor_uuid = %editor.uid,
            audit_entries = tracing::field::Empty
        ),
        err
    )]
    async fn update_bulk_tiers(
        &self,
        vendor: VendorUuid,
        tiers: Vec<NewBulkTier>,
        editor: Actor,
        reason: Option<String>,
    ) -> Result<VendorRecord, VendorsServiceError> {
        let tiers = {
            let mut validator = Validator::new();

            let validated: Vec<BulkTier> = tiers
                .iter()
                .map(|tier| {
                    BulkTier::new(
                        tier.min_quantity,
                        validator.percent("bulk_tiers", tier.discount),
                    )
                })
                .collect();

            let tiers = validator.tiers("bulk_tiers", validated);

            validate_actor(&mut validator, &editor);
            validator.finish()?;

            tiers
        };

        let current = self.store.get_vendor(vendor).await?;

        let Some(write) = lifecycle::set_bulk_tiers(
            &current,
            tiers,
            &editor,
            reason.as_deref(),
            Timestamp::now(),
        )?
        else {
            debug!("bulk tiers unchanged");

            return Ok(current);
        };

        let updated = self.commit(write).await?;

        info!(
            vendor_uuid = %updated.uuid,
            tier_count = updated.discounts.bulk_tiers.len(),
            "updated bulk tiers"
        );

        Ok(updated)
    }
}

fn validate_actor(validator: &mut Validator, actor: &Actor) {
    validator.check_nested("changed_by", actor);
}

#[automock]
#[async_trait]
pub trait VendorsService: Send + Sync {
    /// Fetch a vendor by id.
    async fn get_vendor(&self, vendor: VendorUuid) -> Result<VendorRecord, VendorsServiceError>;

    /// The user's approved vendor, if any.
    ///
    /// Follows the profile's vendor link first and falls back to a search by owner
    /// when the link is missing or stale.
    async fn get_vendor_by_user(
        &self,
        user: UserUuid,
    ) -> Result<Option<VendorRecord>, VendorsServiceError>;

    /// Whether the user has an application awaiting review.
    async fn has_pending_application(&self, user: UserUuid) -> Result<bool, VendorsServiceError>;

    /// Submit a new application in the pending state.
    async fn create_vendor_application(
        &self,
        application: NewVendorApplication,
    ) -> Result<VendorRecord, VendorsServiceError>;

    /// Approve a pending application, set its default discount and link the owner's
    /// profile.
    async fn approve(
        &self,
        vendor: VendorUuid,
        default_discount: Decimal,
        reviewer: Actor,
    ) -> Result<VendorRecord, VendorsServiceError>;

    /// Reject a pending application.
    async fn reject(
        &self,
        vendor: VendorUuid,
        reviewer: Actor,
    ) -> Result<VendorRecord, VendorsServiceError>;

    /// Change an approved vendor's default discount.
    async fn update_default_discount(
        &self,
        vendor: VendorUuid,
        edit: DiscountEdit,
    ) -> Result<VendorRecord, VendorsServiceError>;

    /// Set the extra discount an approved vendor gets on one product. Other
    /// products' overrides are untouched.
    async fn update_product_discount(
        &self,
        vendor: VendorUuid,
        product: ProductRef,
        edit: DiscountEdit,
    ) -> Result<VendorRecord, VendorsServiceError>;

    /// Drop a product override.
    async fn remove_product_discount(
        &self,
        vendor: VendorUuid,
        product: ProductRef,
        editor: Actor,
        reason: Option<String>,
    ) -> Result<VendorRecord, VendorsServiceError>;

    /// Replace an approved vendor's bulk tiers.
    async fn update_bulk_tiers(
        &self,
        vendor: VendorUuid,
        tiers: Vec<NewBulkTier>,
        editor: Actor,
        reason: Option<String>,
    ) -> Result<VendorRecord, VendorsServiceError>;
}
