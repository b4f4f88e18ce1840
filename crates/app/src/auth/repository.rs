//! Auth repository.

use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};

use crate::{auth::models::Actor, domain::users::records::UserUuid};

const FIND_ACTOR_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_actor_by_token_hash.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_actor_by_token_hash(
        &self,
        hash: &str,
    ) -> Result<Option<Actor>, sqlx::Error> {
        query_as::<Postgres, Actor>(FIND_ACTOR_BY_TOKEN_HASH_SQL)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Actor {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            role: row.try_get("role")?,
        })
    }
}
