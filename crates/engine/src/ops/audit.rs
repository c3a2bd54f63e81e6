use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};

use crate::{AuditEntry, ResultEngine, audit_logs};

use super::Engine;

/// Narrow the audit log listing.
#[derive(Clone, Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub limit: Option<u64>,
}

impl Engine {
    /// Append an audit entry after the primary mutation committed.
    ///
    /// Fire-and-forget: a failure is logged and never reaches the caller.
    pub(super) async fn record(&self, entry: AuditEntry) {
        let action = entry.action.clone();
        let entity_id = entry.entity_id.clone();
        if let Err(err) = audit_logs::ActiveModel::from(&entry)
            .insert(&self.database)
            .await
        {
            tracing::error!(%action, %entity_id, "failed to record audit entry: {err}");
        }
    }

    /// Audit entries, newest first.
    pub async fn audit_log(&self, filter: AuditFilter) -> ResultEngine<Vec<AuditEntry>> {
        let mut query = audit_logs::Entity::find();
        if let Some(entity_type) = filter.entity_type {
            query = query.filter(audit_logs::Column::EntityType.eq(entity_type));
        }
        if let Some(entity_id) = filter.entity_id {
            query = query.filter(audit_logs::Column::EntityId.eq(entity_id));
        }
        let models = query
            .order_by_desc(audit_logs::Column::CreatedAt)
            .limit(filter.limit.unwrap_or(200))
            .all(&self.database)
            .await?;
        models.into_iter().map(AuditEntry::try_from).collect()
    }
}
