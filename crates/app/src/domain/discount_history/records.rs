//! Discount History Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};
use vendora::percent::DiscountPercent;

use crate::{
    domain::{
        users::records::UserUuid,
        validation::not_blank,
        vendors::records::{UnknownVariant, VendorUuid},
    },
    uuids::TypedUuid,
};

/// Discount Change UUID
pub type DiscountChangeUuid = TypedUuid<DiscountChangeRecord>;

/// Which discount changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Default,
    Product,
    BulkTier,
}

impl ChangeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Product => "product",
            Self::BulkTier => "bulk_tier",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "product" => Ok(Self::Product),
            "bulk_tier" => Ok(Self::BulkTier),
            other => Err(UnknownVariant::new("change type", other)),
        }
    }
}

/// The discount a change applies to, with the details that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change_type", rename_all = "snake_case")]
pub enum DiscountTarget {
    /// The vendor's default discount.
    Default,

    /// A per-product override.
    Product {
        product_id: String,
        product_name: String,
    },

    /// A bulk tier, identified by its threshold.
    BulkTier { min_quantity: u32 },
}

impl DiscountTarget {
    /// A product override target.
    pub fn product(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Product {
            product_id: id.into(),
            product_name: name.into(),
        }
    }

    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        match self {
            Self::Default => ChangeType::Default,
            Self::Product { .. } => ChangeType::Product,
            Self::BulkTier { .. } => ChangeType::BulkTier,
        }
    }
}

impl Validate for DiscountTarget {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match self {
            Self::Default => {}
            Self::Product {
                product_id,
                product_name,
            } => {
                if let Err(error) = not_blank(product_id) {
                    errors.add("product_id", error);
                }

                if let Err(error) = not_blank(product_name) {
                    errors.add("product_name", error);
                }
            }
            Self::BulkTier { min_quantity } => {
                if *min_quantity == 0 {
                    errors.add(
                        "min_quantity",
                        ValidationError::new("range").with_message("must be at least 1".into()),
                    );
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Discount Change Record
///
/// Never updated or deleted once written. The vendor name is a snapshot taken at
/// write time so the entry stays readable after renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountChangeRecord {
    pub uuid: DiscountChangeUuid,
    pub vendor_uuid: VendorUuid,
    pub vendor_name: String,

    #[serde(flatten)]
    pub target: DiscountTarget,

    pub previous_value: DiscountPercent,
    pub new_value: DiscountPercent,
    pub changed_by: UserUuid,
    pub changed_by_name: String,
    pub changed_at: Timestamp,
    pub reason: Option<String>,
}

impl DiscountChangeRecord {
    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        self.target.change_type()
    }
}
