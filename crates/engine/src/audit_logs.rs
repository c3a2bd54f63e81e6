//! Append-only audit trail of mutations with before/after JSON snapshots.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Role, util::parse_uuid};

/// Who performed a mutation. Every write operation takes one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub actor_id: String,
    pub role: Role,
    pub entity_type: String,
    pub entity_id: String,
    pub action: String,
    pub old_snapshot: Option<serde_json::Value>,
    pub new_snapshot: Option<serde_json::Value>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        actor: &Actor,
        entity_type: &str,
        entity_id: impl ToString,
        action: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id: actor.id.clone(),
            role: actor.role,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            action: action.to_string(),
            old_snapshot: None,
            new_snapshot: None,
            reason: None,
            created_at: now,
        }
    }

    #[must_use]
    pub fn old<T: Serialize>(mut self, snapshot: &T) -> Self {
        self.old_snapshot = serde_json::to_value(snapshot).ok();
        self
    }

    #[must_use]
    pub fn new_state<T: Serialize>(mut self, snapshot: &T) -> Self {
        self.new_snapshot = serde_json::to_value(snapshot).ok();
        self
    }

    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub actor_id: String,
    pub role: String,
    pub entity_type: String,
    pub entity_id: String,
    pub action: String,
    pub old_snapshot: Option<String>,
    pub new_snapshot: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&AuditEntry> for ActiveModel {
    fn from(value: &AuditEntry) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            actor_id: ActiveValue::Set(value.actor_id.clone()),
            role: ActiveValue::Set(value.role.as_str().to_string()),
            entity_type: ActiveValue::Set(value.entity_type.clone()),
            entity_id: ActiveValue::Set(value.entity_id.clone()),
            action: ActiveValue::Set(value.action.clone()),
            old_snapshot: ActiveValue::Set(value.old_snapshot.as_ref().map(|v| v.to_string())),
            new_snapshot: ActiveValue::Set(value.new_snapshot.as_ref().map(|v| v.to_string())),
            reason: ActiveValue::Set(value.reason.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for AuditEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |raw: Option<String>| raw.and_then(|s| serde_json::from_str(&s).ok());
        Ok(Self {
            id: parse_uuid(&model.id, "audit entry")?,
            actor_id: model.actor_id,
            role: Role::try_from(model.role.as_str())?,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            action: model.action,
            old_snapshot: parse(model.old_snapshot),
            new_snapshot: parse(model.new_snapshot),
            reason: model.reason,
            created_at: model.created_at,
        })
    }
}
