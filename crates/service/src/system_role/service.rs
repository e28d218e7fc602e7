use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use models::system_role::{self, Model, NewSystemRole, SystemRolePatch};

use crate::errors::StoreError;
use crate::outcome::{ErrorDetail, Outcome};
use crate::projection::{Projected, Projection};
use crate::system_role::repository::SystemRoleRepository;

pub const NOT_FOUND_MESSAGE: &str = "System role not found.";

/// Persistence service for system roles.
///
/// Every method is total: storage failures, unknown ids and validation
/// problems all come back as an [`Outcome`] variant, never as `Err` or panic.
pub struct SystemRoleService<R: SystemRoleRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: SystemRoleRepository + ?Sized> Clone for SystemRoleService<R> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo) }
    }
}

/// Ids that do not parse can never match a stored record.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn not_found<T>(raw_id: &str) -> Outcome<T> {
    debug!(id = %raw_id, "system_role_not_found");
    Outcome::NotFound(ErrorDetail::new(NOT_FOUND_MESSAGE))
}

/// Unique violations become `Conflict`, everything else `ServerError`.
/// Logged at debug only; the request boundary reports the failure.
fn from_store_error<T>(op: &'static str, err: StoreError) -> Outcome<T> {
    match err {
        StoreError::UniqueViolation(msg) => {
            debug!(op, err = %msg, "system_role_conflict");
            Outcome::Conflict(ErrorDetail::new(msg))
        }
        other => {
            debug!(op, err = %other, "system_role_storage_failed");
            Outcome::ServerError(ErrorDetail::new(other.to_string()))
        }
    }
}

impl<R: SystemRoleRepository + ?Sized> SystemRoleService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a role owned by `creator`. The returned record uses the default projection.
    #[instrument(skip(self, input), fields(creator = %creator))]
    pub async fn create(&self, input: NewSystemRole, creator: Uuid) -> Outcome<Projected<Model>> {
        let record = match Model::build(&input, creator, system_role::now()) {
            Ok(record) => record,
            Err(e) => return from_store_error("create", e.into()),
        };
        match self.repo.insert(record).await {
            Ok(created) => {
                info!(id = %created.id, name = %created.name, "system_role_created");
                Outcome::Created(Projected::new(created, Projection::default_hidden()))
            }
            Err(e) => from_store_error("create", e),
        }
    }

    /// Every stored role, oldest first. Soft-deleted roles are included.
    #[instrument(skip(self, projection))]
    pub async fn list_all(&self, projection: &Projection) -> Outcome<Vec<Projected<Model>>> {
        match self.repo.find_all().await {
            Ok(rows) => {
                debug!(count = rows.len(), "system_roles_listed");
                Outcome::Success(rows.into_iter().map(|r| Projected::new(r, projection.clone())).collect())
            }
            Err(e) => from_store_error("list_all", e),
        }
    }

    #[instrument(skip(self, projection))]
    pub async fn find_by_id(&self, id: &str, projection: &Projection) -> Outcome<Projected<Model>> {
        let Some(uuid) = parse_id(id) else { return not_found(id) };
        match self.repo.find_by_id(uuid).await {
            Ok(Some(found)) => Outcome::Success(Projected::new(found, projection.clone())),
            Ok(None) => not_found(id),
            Err(e) => from_store_error("find_by_id", e),
        }
    }

    /// Partial update stamped with `actor`. Soft delete is
    /// `update_by_id(id, SystemRolePatch::soft_delete(), ..)`; restoring with
    /// `isDeleted: false` goes through the same path.
    #[instrument(skip(self, patch, projection), fields(actor = %actor))]
    pub async fn update_by_id(
        &self,
        id: &str,
        patch: SystemRolePatch,
        actor: Uuid,
        projection: &Projection,
    ) -> Outcome<Projected<Model>> {
        let Some(uuid) = parse_id(id) else { return not_found(id) };
        match self.repo.update_by_id(uuid, &patch, actor).await {
            Ok(Some(updated)) => {
                info!(id = %updated.id, is_deleted = updated.is_deleted, version = updated.version, "system_role_updated");
                Outcome::Success(Projected::new(updated, projection.clone()))
            }
            Ok(None) => not_found(id),
            Err(e) => from_store_error("update_by_id", e),
        }
    }
}
