//! Vendor Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use vendora::vendors::VendorDiscounts;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Vendor UUID
pub type VendorUuid = TypedUuid<VendorRecord>;

/// Error returned when a stored enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Vendor application status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    /// Awaiting review.
    Pending,

    /// Approved; eligible for vendor pricing.
    Approved,

    /// Rejected; terminal.
    Rejected,
}

impl VendorStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownVariant::new("vendor status", other)),
        }
    }
}

/// Kind of business applying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Retailer,
    Wholesaler,
    Distributor,
    Other,
}

impl BusinessType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retailer => "retailer",
            Self::Wholesaler => "wholesaler",
            Self::Distributor => "distributor",
            Self::Other => "other",
        }
    }
}

impl FromStr for BusinessType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "retailer" => Ok(Self::Retailer),
            "wholesaler" => Ok(Self::Wholesaler),
            "distributor" => Ok(Self::Distributor),
            "other" => Ok(Self::Other),
            _ => Err(UnknownVariant::new("business type", s)),
        }
    }
}

/// Latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Where the business is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Location {
    /// Address typed in by the applicant.
    Manual { address: String },

    /// Address resolved from device coordinates.
    Geolocation {
        coordinates: Coordinates,
        address: String,
    },
}

impl Location {
    /// The human-readable address.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::Manual { address } | Self::Geolocation { address, .. } => address,
        }
    }
}

/// Vendor Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    /// Vendor identifier, fixed for the vendor's lifetime.
    pub uuid: VendorUuid,

    /// Owning user.
    pub user_uuid: UserUuid,

    pub business_name: String,
    pub business_type: BusinessType,
    pub phone: String,
    pub email: String,
    pub location: Location,

    /// Lifecycle status.
    pub status: VendorStatus,

    /// Default discount, product overrides and bulk tiers.
    pub discounts: VendorDiscounts,

    /// When the application was submitted.
    pub applied_at: Timestamp,

    /// When the application was approved or rejected.
    pub reviewed_at: Option<Timestamp>,

    /// Who approved or rejected the application.
    pub reviewed_by: Option<UserUuid>,

    /// Last write to this record after submission.
    pub last_modified_at: Option<Timestamp>,

    /// Author of the last write after submission.
    pub last_modified_by: Option<UserUuid>,
}

impl VendorRecord {
    /// Whether the vendor is approved.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == VendorStatus::Approved
    }

    /// Stamp a modification by `by` at `at`.
    pub(crate) fn touch(&mut self, by: UserUuid, at: Timestamp) {
        self.last_modified_at = Some(at);
        self.last_modified_by = Some(by);
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn status_round_trips_through_str() -> TestResult {
        for status in [
            VendorStatus::Pending,
            VendorStatus::Approved,
            VendorStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<VendorStatus>()?, status);
        }

        Ok(())
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = "suspended".parse::<VendorStatus>();

        assert_eq!(
            result.map_err(|e| e.to_string()),
            Err("unknown vendor status `suspended`".to_string())
        );
    }

    #[test]
    fn business_type_parse_ignores_case() -> TestResult {
        assert_eq!("Wholesaler".parse::<BusinessType>()?, BusinessType::Wholesaler);

        Ok(())
    }

    #[test]
    fn location_serializes_with_type_tag() -> TestResult {
        let location = Location::Geolocation {
            coordinates: Coordinates {
                lat: 12.97,
                lng: 77.59,
            },
            address: "MG Road, Bengaluru".to_string(),
        };

        let json = serde_json::to_value(&location)?;

        assert_eq!(json["type"], "geolocation");
        assert_eq!(json["coordinates"]["lat"], 12.97);
        assert_eq!(location.address(), "MG Road, Bengaluru");

        Ok(())
    }
}
