//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    users::records::{UserProfileRecord, UserUuid},
    vendors::records::VendorUuid,
};

const GET_USER_PROFILE_SQL: &str = include_str!("sql/get_user_profile.sql");
const UPSERT_USER_PROFILE_SQL: &str = include_str!("sql/upsert_user_profile.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_user_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<UserProfileRecord>, sqlx::Error> {
        query_as::<Postgres, UserProfileRecord>(GET_USER_PROFILE_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_user_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        profile: &UserProfileRecord,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_USER_PROFILE_SQL)
            .bind(profile.uuid.into_uuid())
            .bind(profile.is_vendor)
            .bind(profile.vendor_uuid.map(VendorUuid::into_uuid))
            .bind(SqlxTimestamp::from(profile.updated_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for UserProfileRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            is_vendor: row.try_get("is_vendor")?,
            vendor_uuid: row
                .try_get::<Option<Uuid>, _>("vendor_uuid")?
                .map(VendorUuid::from_uuid),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
