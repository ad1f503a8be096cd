//! Discount History Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use vendora::percent::DiscountPercent;

use crate::{
    database::decode_error,
    domain::{
        discount_history::records::{
            ChangeType, DiscountChangeRecord, DiscountChangeUuid, DiscountTarget,
        },
        users::records::UserUuid,
        vendors::records::VendorUuid,
    },
    store::Page,
};

const INSERT_DISCOUNT_CHANGE_SQL: &str = include_str!("sql/insert_discount_change.sql");
const LIST_DISCOUNT_CHANGES_SQL: &str = include_str!("sql/list_discount_changes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDiscountHistoryRepository;

impl PgDiscountHistoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_discount_change(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        change: &DiscountChangeRecord,
    ) -> Result<(), sqlx::Error> {
        let (product_id, product_name, min_quantity) = match &change.target {
            DiscountTarget::Default => (None, None, None),
            DiscountTarget::Product {
                product_id,
                product_name,
            } => (Some(product_id.as_str()), Some(product_name.as_str()), None),
            DiscountTarget::BulkTier { min_quantity } => (None, None, Some(i64::from(*min_quantity))),
        };

        query(INSERT_DISCOUNT_CHANGE_SQL)
            .bind(change.uuid.into_uuid())
            .bind(change.vendor_uuid.into_uuid())
            .bind(&change.vendor_name)
            .bind(change.change_type().as_str())
            .bind(product_id)
            .bind(product_name)
            .bind(min_quantity)
            .bind(change.previous_value.points())
            .bind(change.new_value.points())
            .bind(change.changed_by.into_uuid())
            .bind(&change.changed_by_name)
            .bind(SqlxTimestamp::from(change.changed_at))
            .bind(change.reason.as_deref())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_discount_changes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        vendor: VendorUuid,
        page: Page,
    ) -> Result<Vec<DiscountChangeRecord>, sqlx::Error> {
        query_as::<Postgres, DiscountChangeRecord>(LIST_DISCOUNT_CHANGES_SQL)
            .bind(vendor.into_uuid())
            .bind(i64::from(page.offset))
            .bind(i64::from(page.limit))
            .fetch_all(&mut **tx)
            .await
    }
}

fn percent(row: &PgRow, column: &str) -> sqlx::Result<DiscountPercent> {
    let points: Decimal = row.try_get(column)?;

    DiscountPercent::new(points).map_err(|e| decode_error(column, e))
}

fn target(row: &PgRow) -> sqlx::Result<DiscountTarget> {
    let change_type: String = row.try_get("change_type")?;

    let target = match change_type
        .parse::<ChangeType>()
        .map_err(|e| decode_error("change_type", e))?
    {
        ChangeType::Default => DiscountTarget::Default,
        ChangeType::Product => DiscountTarget::Product {
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
        },
        ChangeType::BulkTier => {
            let min_quantity: i64 = row.try_get("min_quantity")?;

            DiscountTarget::BulkTier {
                min_quantity: u32::try_from(min_quantity)
                    .map_err(|e| decode_error("min_quantity", e))?,
            }
        }
    };

    Ok(target)
}

impl<'r> FromRow<'r, PgRow> for DiscountChangeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: DiscountChangeUuid::from_uuid(row.try_get("uuid")?),
            vendor_uuid: VendorUuid::from_uuid(row.try_get("vendor_uuid")?),
            vendor_name: row.try_get("vendor_name")?,
            target: target(row)?,
            previous_value: percent(row, "previous_value")?,
            new_value: percent(row, "new_value")?,
            changed_by: UserUuid::from_uuid(row.try_get("changed_by")?),
            changed_by_name: row.try_get("changed_by_name")?,
            changed_at: row.try_get::<SqlxTimestamp, _>("changed_at")?.to_jiff(),
            reason: row.try_get("reason")?,
        })
    }
}
