//! Bakeries service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        bakeries::{
            data::NewBakery,
            errors::BakeriesServiceError,
            records::{BakeryRecord, BakeryUuid},
            repository::PgBakeriesRepository,
        },
        users::{
            records::{Role, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgBakeriesService {
    db: Db,
    repository: PgBakeriesRepository,
    users_repository: PgUsersRepository,
}

impl PgBakeriesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgBakeriesRepository::new(),
            users_repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl BakeriesService for PgBakeriesService {
    async fn create_bakery(&self, bakery: NewBakery) -> Result<BakeryRecord, BakeriesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let owner = self
            .users_repository
            .find_user(&mut tx, bakery.owner_uuid)
            .await?
            .ok_or(BakeriesServiceError::InvalidReference)?;

        if owner.role != Role::Baker {
            return Err(BakeriesServiceError::OwnerNotBaker);
        }

        let created = self.repository.create_bakery(&mut tx, bakery).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_bakery(&self, bakery: BakeryUuid) -> Result<BakeryRecord, BakeriesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let bakery = self
            .repository
            .find_bakery(&mut tx, bakery)
            .await?
            .ok_or(BakeriesServiceError::NotFound)?;

        tx.commit().await?;

        Ok(bakery)
    }

    async fn find_bakery_by_owner(
        &self,
        owner: UserUuid,
    ) -> Result<Option<BakeryRecord>, BakeriesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let bakery = self.repository.find_bakery_by_owner(&mut tx, owner).await?;

        tx.commit().await?;

        Ok(bakery)
    }
}

#[automock]
#[async_trait]
/// Bakery profile operations.
pub trait BakeriesService: Send + Sync {
    /// Creates a bakery for a baker who does not run one yet.
    async fn create_bakery(&self, bakery: NewBakery) -> Result<BakeryRecord, BakeriesServiceError>;

    /// Retrieve a single bakery.
    async fn get_bakery(&self, bakery: BakeryUuid) -> Result<BakeryRecord, BakeriesServiceError>;

    /// Look up the bakery run by the given baker, if any.
    async fn find_bakery_by_owner(
        &self,
        owner: UserUuid,
    ) -> Result<Option<BakeryRecord>, BakeriesServiceError>;
}
