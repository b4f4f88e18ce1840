//! Bakeries Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    bakeries::{
        data::NewBakery,
        records::{BakeryRecord, BakeryUuid},
    },
    users::records::UserUuid,
};

const CREATE_BAKERY_SQL: &str = include_str!("sql/create_bakery.sql");
const GET_BAKERY_SQL: &str = include_str!("sql/get_bakery.sql");
const FIND_BAKERY_BY_OWNER_SQL: &str = include_str!("sql/find_bakery_by_owner.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBakeriesRepository;

impl PgBakeriesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_bakery(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bakery: NewBakery,
    ) -> Result<BakeryRecord, sqlx::Error> {
        query_as::<Postgres, BakeryRecord>(CREATE_BAKERY_SQL)
            .bind(bakery.uuid.into_uuid())
            .bind(bakery.owner_uuid.into_uuid())
            .bind(bakery.bakery_name)
            .bind(bakery.city)
            .bind(bakery.address)
            .bind(bakery.description)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_bakery(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bakery: BakeryUuid,
    ) -> Result<Option<BakeryRecord>, sqlx::Error> {
        query_as::<Postgres, BakeryRecord>(GET_BAKERY_SQL)
            .bind(bakery.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_bakery_by_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
    ) -> Result<Option<BakeryRecord>, sqlx::Error> {
        query_as::<Postgres, BakeryRecord>(FIND_BAKERY_BY_OWNER_SQL)
            .bind(owner.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for BakeryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: BakeryUuid::from_uuid(row.try_get("uuid")?),
            owner_uuid: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            bakery_name: row.try_get("bakery_name")?,
            city: row.try_get("city")?,
            address: row.try_get("address")?,
            description: row.try_get("description")?,
            rating: row.try_get("rating")?,
            is_approved: row.try_get("is_approved")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
