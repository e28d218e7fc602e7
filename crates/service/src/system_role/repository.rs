use async_trait::async_trait;
use uuid::Uuid;

use models::system_role::{Model, SystemRolePatch};

use crate::errors::StoreError;

/// Storage primitives for system roles. Implementations report failures as
/// [`StoreError`]; the service turns them into outcomes.
#[async_trait]
pub trait SystemRoleRepository: Send + Sync {
    async fn insert(&self, record: Model) -> Result<Model, StoreError>;
    /// Oldest first, soft-deleted rows included.
    async fn find_all(&self) -> Result<Vec<Model>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, StoreError>;
    /// `Ok(None)` when no record has `id`.
    async fn update_by_id(&self, id: Uuid, patch: &SystemRolePatch, actor: Uuid) -> Result<Option<Model>, StoreError>;
}
