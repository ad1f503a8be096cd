//! Vendors Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};
use uuid::Uuid;
use vendora::{percent::DiscountPercent, tiers::BulkTiers, vendors::VendorDiscounts};

use crate::{
    database::decode_error,
    domain::{
        users::records::UserUuid,
        vendors::records::{Location, VendorRecord, VendorStatus, VendorUuid},
    },
};

const GET_VENDOR_SQL: &str = include_str!("sql/get_vendor.sql");
const FIND_VENDORS_BY_USER_SQL: &str = include_str!("sql/find_vendors_by_user.sql");
const OPEN_APPLICATION_STATUSES_SQL: &str = include_str!("sql/open_application_statuses.sql");
const INSERT_VENDOR_SQL: &str = include_str!("sql/insert_vendor.sql");
const UPDATE_VENDOR_SQL: &str = include_str!("sql/update_vendor.sql");

/// Partial unique index allowing one pending application per user.
pub(crate) const ONE_PENDING_PER_USER: &str = "vendors_one_pending_per_user";

/// Partial unique index allowing one approved vendor per user.
pub(crate) const ONE_APPROVED_PER_USER: &str = "vendors_one_approved_per_user";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVendorsRepository;

impl PgVendorsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_vendor(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vendor: VendorUuid,
    ) -> Result<VendorRecord, sqlx::Error> {
        query_as::<Postgres, VendorRecord>(GET_VENDOR_SQL)
            .bind(vendor.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_vendors_by_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        status: Option<VendorStatus>,
    ) -> Result<Vec<VendorRecord>, sqlx::Error> {
        query_as::<Postgres, VendorRecord>(FIND_VENDORS_BY_USER_SQL)
            .bind(user.into_uuid())
            .bind(status.map(VendorStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    /// Statuses of the user's pending or approved records, locking those rows.
    pub(crate) async fn open_application_statuses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<VendorStatus>, sqlx::Error> {
        let rows: Vec<(String,)> = query_as(OPEN_APPLICATION_STATUSES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        rows.into_iter()
            .map(|(status,)| status.parse::<VendorStatus>().map_err(|e| decode_error("status", e)))
            .collect()
    }

    pub(crate) async fn insert_vendor(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vendor: &VendorRecord,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_VENDOR_SQL)
            .bind(vendor.uuid.into_uuid())
            .bind(vendor.user_uuid.into_uuid())
            .bind(&vendor.business_name)
            .bind(vendor.business_type.as_str())
            .bind(&vendor.phone)
            .bind(&vendor.email)
            .bind(Json(&vendor.location))
            .bind(vendor.status.as_str())
            .bind(vendor.discounts.default_discount.points())
            .bind(Json(&vendor.discounts.product_discounts))
            .bind(Json(&vendor.discounts.bulk_tiers))
            .bind(SqlxTimestamp::from(vendor.applied_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Overwrite every mutable column. Returns the number of rows updated.
    pub(crate) async fn update_vendor(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vendor: &VendorRecord,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_VENDOR_SQL)
            .bind(vendor.uuid.into_uuid())
            .bind(&vendor.business_name)
            .bind(vendor.business_type.as_str())
            .bind(&vendor.phone)
            .bind(&vendor.email)
            .bind(Json(&vendor.location))
            .bind(vendor.status.as_str())
            .bind(vendor.discounts.default_discount.points())
            .bind(Json(&vendor.discounts.product_discounts))
            .bind(Json(&vendor.discounts.bulk_tiers))
            .bind(vendor.reviewed_at.map(SqlxTimestamp::from))
            .bind(vendor.reviewed_by.map(UserUuid::into_uuid))
            .bind(vendor.last_modified_at.map(SqlxTimestamp::from))
            .bind(vendor.last_modified_by.map(UserUuid::into_uuid))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for VendorRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let business_type: String = row.try_get("business_type")?;
        let status: String = row.try_get("status")?;
        let default_discount: Decimal = row.try_get("default_discount")?;

        let Json(location) = row.try_get::<Json<Location>, _>("location")?;
        let Json(product_discounts) =
            row.try_get::<Json<FxHashMap<String, DiscountPercent>>, _>("product_discounts")?;
        let Json(bulk_tiers) = row.try_get::<Json<BulkTiers>, _>("bulk_tiers")?;

        Ok(Self {
            uuid: VendorUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            business_name: row.try_get("business_name")?,
            business_type: business_type
                .parse()
                .map_err(|e| decode_error("business_type", e))?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            location,
            status: status.parse().map_err(|e| decode_error("status", e))?,
            discounts: VendorDiscounts {
                default_discount: DiscountPercent::new(default_discount)
                    .map_err(|e| decode_error("default_discount", e))?,
                product_discounts,
                bulk_tiers,
            },
            applied_at: row.try_get::<SqlxTimestamp, _>("applied_at")?.to_jiff(),
            reviewed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("reviewed_at")?
                .map(SqlxTimestamp::to_jiff),
            reviewed_by: row
                .try_get::<Option<Uuid>, _>("reviewed_by")?
                .map(UserUuid::from_uuid),
            last_modified_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_modified_at")?
                .map(SqlxTimestamp::to_jiff),
            last_modified_by: row
                .try_get::<Option<Uuid>, _>("last_modified_by")?
                .map(UserUuid::from_uuid),
        })
    }
}
