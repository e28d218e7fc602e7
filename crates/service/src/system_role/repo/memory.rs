use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use models::system_role::{self, Model, SystemRolePatch};

use crate::errors::StoreError;
use crate::system_role::repository::SystemRoleRepository;

/// In-process store with the same uniqueness rule as the `system_role` table
/// (unique `name`). Check and write happen under one write guard.
#[derive(Default)]
pub struct InMemorySystemRoleRepository {
    rows: RwLock<HashMap<Uuid, Model>>,
}

impl InMemorySystemRoleRepository {
    pub fn new() -> Self { Self::default() }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

fn duplicate_name(name: &str) -> StoreError {
    StoreError::UniqueViolation(format!("system_role.name already exists: {name}"))
}

#[async_trait]
impl SystemRoleRepository for InMemorySystemRoleRepository {
    async fn insert(&self, record: Model) -> Result<Model, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&record.id) {
            return Err(StoreError::UniqueViolation(format!("system_role.id already exists: {}", record.id)));
        }
        if rows.values().any(|r| r.name == record.name) {
            return Err(duplicate_name(&record.name));
        }
        rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> Result<Vec<Model>, StoreError> {
        let rows = self.rows.read().await;
        let mut all: Vec<Model> = rows.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, StoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update_by_id(&self, id: Uuid, patch: &SystemRolePatch, actor: Uuid) -> Result<Option<Model>, StoreError> {
        let mut rows = self.rows.write().await;
        let Some(current) = rows.get(&id) else { return Ok(None) };

        let mut patched = current.clone();
        patched.apply_patch(patch, actor, system_role::now())?;
        if rows.values().any(|r| r.id != id && r.name == patched.name) {
            return Err(duplicate_name(&patched.name));
        }
        rows.insert(id, patched.clone());
        Ok(Some(patched))
    }
}
