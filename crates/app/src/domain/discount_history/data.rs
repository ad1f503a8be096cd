//! Discount History Data

use jiff::Timestamp;
use validator::Validate;
use vendora::percent::DiscountPercent;

use crate::domain::{
    discount_history::records::{DiscountChangeRecord, DiscountChangeUuid, DiscountTarget},
    users::data::Actor,
    validation::{ValidationError, Validator, not_blank},
    vendors::records::VendorUuid,
};

/// New Discount Change Data
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewDiscountChange {
    pub vendor_uuid: VendorUuid,

    #[validate(custom(function = "not_blank"))]
    pub vendor_name: String,

    pub target: DiscountTarget,
    pub previous_value: DiscountPercent,
    pub new_value: DiscountPercent,

    #[validate(nested)]
    pub changed_by: Actor,

    pub reason: Option<String>,
}

impl NewDiscountChange {
    /// Check the entry's own fields and its target.
    ///
    /// # Errors
    ///
    /// Returns every missing field in a single [`ValidationError`].
    pub fn check(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new();

        validator.check(self);
        validator.check(&self.target);

        validator.finish()
    }

    /// Stamp an identity and time onto the change.
    #[must_use]
    pub fn into_record(self, changed_at: Timestamp) -> DiscountChangeRecord {
        DiscountChangeRecord {
            uuid: DiscountChangeUuid::new(),
            vendor_uuid: self.vendor_uuid,
            vendor_name: self.vendor_name,
            target: self.target,
            previous_value: self.previous_value,
            new_value: self.new_value,
            changed_by: self.changed_by.uid,
            changed_by_name: self.changed_by.name,
            changed_at,
            reason: self.reason.filter(|reason| !reason.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{discount_history::records::ChangeType, users::records::UserUuid};

    use super::*;

    fn change(target: DiscountTarget) -> Result<NewDiscountChange, vendora::percent::PercentError> {
        Ok(NewDiscountChange {
            vendor_uuid: VendorUuid::new(),
            vendor_name: "Hill Apiaries".to_string(),
            target,
            previous_value: DiscountPercent::try_from(20_u8)?,
            new_value: DiscountPercent::try_from(25_u8)?,
            changed_by: Actor::new(UserUuid::new(), "Asha"),
            reason: Some("  ".to_string()),
        })
    }

    #[test]
    fn product_change_requires_product_details() -> TestResult {
        let result = change(DiscountTarget::product("", "Honey"))?.check();

        assert!(
            matches!(&result, Err(error) if error.has_field("product_id")),
            "expected product_id issue, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn blank_actor_and_zero_threshold_are_reported_together() -> TestResult {
        let mut new = change(DiscountTarget::BulkTier { min_quantity: 0 })?;
        new.changed_by.name = " ".to_string();

        let error = new.check().err().ok_or("expected validation to fail")?;

        assert!(error.has_field("changed_by_name"));
        assert!(error.has_field("min_quantity"));

        Ok(())
    }

    #[test]
    fn into_record_copies_actor_and_drops_blank_reason() -> TestResult {
        let new = change(DiscountTarget::Default)?;
        let actor = new.changed_by.clone();
        let now = Timestamp::now();

        let record = new.into_record(now);

        assert_eq!(record.change_type(), ChangeType::Default);
        assert_eq!(record.changed_by, actor.uid);
        assert_eq!(record.changed_by_name, "Asha");
        assert_eq!(record.changed_at, now);
        assert_eq!(record.reason, None);

        Ok(())
    }

    #[test]
    fn record_serializes_change_type_inline() -> TestResult {
        let record = change(DiscountTarget::product("honey-1kg", "Honey 1kg"))?
            .into_record(Timestamp::now());

        let json = serde_json::to_value(&record)?;

        assert_eq!(json["change_type"], "product");
        assert_eq!(json["product_id"], "honey-1kg");
        assert_eq!(json["previous_value"], "20");
        assert_eq!(json["new_value"], "25");

        Ok(())
    }
}
