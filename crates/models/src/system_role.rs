use chrono::{SubsecRound, Utc};
use sea_orm::{entity::prelude::*, DatabaseConnection, FromJsonQueryResult, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

pub const NAME_MAX_LEN: usize = 128;

/// Permission keys attached to a role. Stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Permissions(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_role")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub permissions: Permissions,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    /// Revision counter, bumped by every update.
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Attributes accepted when creating a role.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSystemRole {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl NewSystemRole {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRolePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
}

impl SystemRolePatch {
    /// The patch used for deletion: flips `isDeleted` and nothing else.
    pub fn soft_delete() -> Self {
        Self { is_deleted: Some(true), ..Default::default() }
    }
}

/// Current time at the storage precision (microseconds).
pub fn now() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).into()
}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(ModelError::Validation(format!("name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(trimmed.to_string())
}

/// Trims keys, rejects blank ones and drops duplicates keeping first occurrence.
pub fn validate_permissions(keys: &[String]) -> Result<Permissions, ModelError> {
    let mut out: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        let key = key.trim();
        if key.is_empty() {
            return Err(ModelError::Validation("permission keys must not be blank".into()));
        }
        if !out.iter().any(|k| k == key) {
            out.push(key.to_string());
        }
    }
    Ok(Permissions(out))
}

fn normalize_description(description: &str) -> Option<String> {
    let trimmed = description.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Model {
    /// Build a fresh, active record stamped with a new id and the creator.
    pub fn build(input: &NewSystemRole, creator: Uuid, at: DateTimeWithTimeZone) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: validate_name(&input.name)?,
            description: input.description.as_deref().and_then(normalize_description),
            permissions: validate_permissions(&input.permissions)?,
            is_deleted: false,
            created_by: creator,
            updated_by: None,
            created_at: at,
            updated_at: at,
            version: 0,
        })
    }

    /// Apply a partial update in place, always stamping the actor and time.
    pub fn apply_patch(&mut self, patch: &SystemRolePatch, actor: Uuid, at: DateTimeWithTimeZone) -> Result<(), ModelError> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let permissions = patch.permissions.as_deref().map(validate_permissions).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = &patch.description {
            self.description = normalize_description(description);
        }
        if let Some(permissions) = permissions {
            self.permissions = permissions;
        }
        if let Some(flag) = patch.is_deleted {
            self.is_deleted = flag;
        }
        self.updated_by = Some(actor);
        self.updated_at = at;
        self.version += 1;
        Ok(())
    }

    fn into_insert(self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id),
            name: Set(self.name),
            description: Set(self.description),
            permissions: Set(self.permissions),
            is_deleted: Set(self.is_deleted),
            created_by: Set(self.created_by),
            updated_by: Set(self.updated_by),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
            version: Set(self.version),
        }
    }
}

pub async fn insert(db: &DatabaseConnection, record: Model) -> Result<Model, ModelError> {
    Ok(record.into_insert().insert(db).await?)
}

/// All rows, soft-deleted included, oldest first.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    let rows = Entity::find()
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Update by id; `Ok(None)` when no row has that id.
pub async fn update(db: &DatabaseConnection, id: Uuid, patch: &SystemRolePatch, actor: Uuid) -> Result<Option<Model>, ModelError> {
    let Some(existing) = Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    let mut patched = existing.clone();
    patched.apply_patch(patch, actor, now())?;

    let mut am: ActiveModel = existing.into();
    am.name = Set(patched.name);
    am.description = Set(patched.description);
    am.permissions = Set(patched.permissions);
    am.is_deleted = Set(patched.is_deleted);
    am.updated_by = Set(patched.updated_by);
    am.updated_at = Set(patched.updated_at);
    am.version = Set(patched.version);
    match am.update(db).await {
        Ok(updated) => Ok(Some(updated)),
        // Row removed between the read and the write
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
