use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::system_role::{self, Model, SystemRolePatch};

use crate::errors::StoreError;
use crate::system_role::repository::SystemRoleRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmSystemRoleRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSystemRoleRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl SystemRoleRepository for SeaOrmSystemRoleRepository {
    async fn insert(&self, record: Model) -> Result<Model, StoreError> {
        Ok(system_role::insert(&self.db, record).await?)
    }

    async fn find_all(&self) -> Result<Vec<Model>, StoreError> {
        Ok(system_role::list(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, StoreError> {
        Ok(system_role::find(&self.db, id).await?)
    }

    async fn update_by_id(&self, id: Uuid, patch: &SystemRolePatch, actor: Uuid) -> Result<Option<Model>, StoreError> {
        Ok(system_role::update(&self.db, id, patch, actor).await?)
    }
}
